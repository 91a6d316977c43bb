//! Wavefront OBJ export of the current lattice.
//!
//! Every cell is baked into world space: morph blend, scale, rotation and
//! translation are applied to its vertices, and its flat material color is
//! written as a vertex color (`v x y z r g b`). Normals are recomputed on
//! the baked geometry. Faces use `v//vn` references.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    config::MorphMode,
    geometry::{compute_vertex_normals, triangles},
    lattice::{Cell, Lattice},
};

pub const EXPORT_PREFIX: &str = "grid-export-";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A serialized OBJ document and its record counts.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjDocument {
    pub text: String,
    pub vertex_count: usize,
    pub normal_count: usize,
    pub face_count: usize,
}

/// Formats a number for the document, writing negative zero as `0`.
pub fn format_number(value: f32) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Running offsets into the vertex and normal lists.
///
/// The two lists are counted separately since a cell may contribute a
/// different number of normals than vertices.
#[derive(Clone, Copy, Debug, Default)]
struct Offsets {
    vertex: usize,
    normal: usize,
}

/// Serializes every cell of `lattice` into one OBJ document.
///
/// ### Parameters
/// - `lattice` - Cells to export, in lattice order.
/// - `mode` - Morph convention used to bake the blend weight.
/// - `timestamp` - Written into the header comment.
///
/// ### Returns
/// `None` for an empty lattice.
pub fn export_obj(lattice: &Lattice, mode: MorphMode, timestamp: &str) -> Option<ObjDocument> {
    if lattice.is_empty() {
        return None;
    }

    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(text, "# Attractor grid export");
    let _ = writeln!(text, "# Generated {timestamp}");
    let _ = writeln!(text, "# Cells {}", lattice.len());

    let mut offsets = Offsets::default();
    let mut face_count = 0;

    for (id, cell) in lattice.cells().iter().enumerate() {
        let _ = writeln!(text, "o cell_{id}");
        let (next, faces) = write_cell(&mut text, lattice, cell, mode, offsets);
        offsets = next;
        face_count += faces;
    }

    Some(ObjDocument {
        text,
        vertex_count: offsets.vertex,
        normal_count: offsets.normal,
        face_count,
    })
}

/// Appends one cell's vertices, normals and faces.
///
/// Returns the offsets after this cell and the number of faces written.
fn write_cell(
    out: &mut String,
    lattice: &Lattice,
    cell: &Cell,
    mode: MorphMode,
    offsets: Offsets,
) -> (Offsets, usize) {
    let shape = lattice.shape();
    let positions = shape.world_positions(&cell.mesh, mode);
    let indices = shape.base.indices.as_deref();
    let normals = compute_vertex_normals(&positions, indices);

    let [r, g, b] = cell.mesh.color.to_array().map(format_number);
    for p in &positions {
        let _ = writeln!(
            out,
            "v {} {} {} {r} {g} {b}",
            format_number(p.x),
            format_number(p.y),
            format_number(p.z)
        );
    }

    for n in &normals {
        let _ = writeln!(
            out,
            "vn {} {} {}",
            format_number(n.x),
            format_number(n.y),
            format_number(n.z)
        );
    }

    let faces = triangles(positions.len(), indices);
    for tri in &faces {
        let _ = write!(out, "f");
        for &i in tri {
            let _ = write!(out, " {}//{}", offsets.vertex + i + 1, offsets.normal + i + 1);
        }
        let _ = writeln!(out);
    }

    let next = Offsets {
        vertex: offsets.vertex + positions.len(),
        normal: offsets.normal + normals.len(),
    };
    (next, faces.len())
}

/// Formats `time` as an ISO 8601 UTC timestamp with milliseconds,
/// e.g. `2024-03-05T07:08:09.123Z`.
pub fn iso_timestamp(time: SystemTime) -> String {
    let since = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = since.as_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let day_secs = secs % 86_400;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60,
        since.subsec_millis()
    )
}

/// Converts days since 1970-01-01 into a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month as u32, day as u32)
}

/// File name for an export generated at `timestamp`.
///
/// `:` and `.` are replaced by `-` so the name is valid on every platform.
pub fn export_file_name(timestamp: &str) -> String {
    let stamp: String = timestamp
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    format!("{EXPORT_PREFIX}{stamp}.obj")
}

/// Writes the current lattice into `dir`.
///
/// ### Returns
/// The path written, or `None` if the lattice is empty and nothing was
/// written.
pub fn write_export(
    dir: &Path,
    lattice: &Lattice,
    mode: MorphMode,
    time: SystemTime,
) -> Result<Option<PathBuf>, ExportError> {
    let timestamp = iso_timestamp(time);
    let Some(doc) = export_obj(lattice, mode, &timestamp) else {
        log::debug!("export skipped: lattice is empty");
        return Ok(None);
    };

    let path = dir.join(export_file_name(&timestamp));
    fs::write(&path, &doc.text).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!(
        "exported {} vertices / {} faces to {}",
        doc.vertex_count,
        doc.face_count,
        path.display()
    );
    Ok(Some(path))
}
