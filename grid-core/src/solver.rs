//! Influence solver: maps the attractor position to per-cell visuals.
//!
//! A solve pass looks like:
//! 1. [`measure_distances`] - horizontal distance from the attractor to
//!    every cell's base position.
//! 2. [`normalize_distances`] - divide by the largest distance so the
//!    farthest cell gets `t = 1`.
//! 3. [`derive_params`] - size, vertical offset, morph weight, rotation and
//!    color from `t`.
//! 4. [`CellParams::apply`] - write the result into the cell's mesh.
//!
//! [`solve_if_dirty`] wraps the pass with the [`DirtyFlag`] check.

use crate::{
    attractor::AttractorState,
    color::Rgb,
    config::GridConfig,
    lattice::{CellMesh, Lattice},
    scheduler::DirtyFlag,
    types::lerp,
};
use glam::{Quat, Vec3};

/// Largest distances below this are treated as `1` to avoid dividing by
/// (almost) zero.
pub const MIN_MAX_DISTANCE: f32 = 1e-4;

/// Visual parameters derived for a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellParams {
    /// Normalized distance, `0` nearest the attractor, `1` farthest.
    pub t: f32,
    pub scale: f32,
    pub y_offset: f32,
    pub blend_weight: f32,
    pub rotation_radians: f32,
    pub color: Rgb,
}

impl CellParams {
    /// Writes transform, color and morph weight into `mesh`.
    ///
    /// ### Parameters
    /// - `mesh` - The cell's mesh; its position is rebuilt from `base`.
    /// - `base` - The cell's resting position on the ground plane.
    pub fn apply(&self, mesh: &mut CellMesh, base: Vec3) {
        mesh.position = base + Vec3::Y * self.y_offset;
        mesh.rotation = Quat::from_rotation_y(self.rotation_radians);
        mesh.scale = Vec3::splat(self.scale);
        mesh.color = self.color;
        mesh.morph_weight = self.blend_weight;
    }
}

/// Stores the horizontal distance to the attractor in every cell.
///
/// ### Returns
/// The largest distance found, or `0` for an empty lattice.
pub fn measure_distances(lattice: &mut Lattice, attractor: &AttractorState) -> f32 {
    let mut max = 0.0f32;
    for cell in lattice.cells_mut() {
        cell.distance = attractor.horizontal_distance(cell.base_position());
        max = max.max(cell.distance);
    }
    max
}

/// Maps a distance into `[0, 1]` relative to the largest distance.
///
/// ### Parameters
/// - `distance` - Distance of one cell.
/// - `max_distance` - Largest distance over all cells. Values below
///   [`MIN_MAX_DISTANCE`] are replaced with `1`.
pub fn normalize_distance(distance: f32, max_distance: f32) -> f32 {
    let denom = if max_distance < MIN_MAX_DISTANCE {
        1.0
    } else {
        max_distance
    };
    (distance / denom).clamp(0.0, 1.0)
}

/// Normalizes a whole set of distances against their own maximum.
pub fn normalize_distances(distances: &[f32]) -> Vec<f32> {
    let max = distances.iter().copied().fold(0.0f32, f32::max);
    distances
        .iter()
        .map(|&d| normalize_distance(d, max))
        .collect()
}

/// Derives every visual parameter from the normalized distance `t`.
///
/// Farther cells grow toward `max_size`; the size mapping is not inverted.
/// The vertical offset is half the size so the unit cuboid rests on the
/// ground. Colors are interpolated channel by channel in HSL.
pub fn derive_params(t: f32, cfg: &GridConfig) -> CellParams {
    let scale = lerp(cfg.min_size, cfg.max_size, t);
    let rotation_degrees = lerp(cfg.min_rotation, cfg.max_rotation, t);
    let hsl = cfg.close_color.to_hsl().lerp(cfg.far_color.to_hsl(), t);

    CellParams {
        t,
        scale,
        y_offset: scale * 0.5,
        blend_weight: t,
        rotation_radians: rotation_degrees.to_radians(),
        color: Rgb::from_hsl(hsl),
    }
}

/// Runs one full solve pass over the lattice.
///
/// Does nothing for an empty lattice.
///
/// ### Parameters
/// - `lattice` - Cells to update; distances and meshes are overwritten.
/// - `attractor` - Current attractor position.
/// - `cfg` - Size, rotation and color ranges.
///
/// ### Returns
/// The number of cells updated.
pub fn solve(lattice: &mut Lattice, attractor: &AttractorState, cfg: &GridConfig) -> usize {
    if lattice.is_empty() {
        return 0;
    }

    let max_distance = measure_distances(lattice, attractor);

    for cell in lattice.cells_mut() {
        let t = normalize_distance(cell.distance, max_distance);
        let base = cell.base_position();
        derive_params(t, cfg).apply(&mut cell.mesh, base);
    }

    log::trace!(
        "solved {} cells (max distance {:.3})",
        lattice.len(),
        max_distance
    );
    lattice.len()
}

/// Solves only when `dirty` is set and there is at least one cell, then
/// clears the flag.
///
/// ### Returns
/// `true` if a solve pass ran.
pub fn solve_if_dirty(
    lattice: &mut Lattice,
    attractor: &AttractorState,
    cfg: &GridConfig,
    dirty: &mut DirtyFlag,
) -> bool {
    if !dirty.is_dirty() || lattice.is_empty() {
        return false;
    }
    solve(lattice, attractor, cfg);
    dirty.clear();
    true
}
