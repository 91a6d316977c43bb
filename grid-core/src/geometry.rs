//! Cell geometry: the deformable unit cuboid and its collapsed cross target.
//!
//! Both shapes share the same vertex count and ordering so they can be
//! blended per vertex with a single scalar weight.

use glam::{UVec3, Vec3};

use crate::{config::MorphMode, lattice::CellMesh};

/// Half of the unit cuboid's edge length.
pub const CELL_HALF_EXTENT: f32 = 0.5;

/// Segments along X, Y and Z of the cell cuboid.
///
/// Two segments on X and Z give every side face a vertical mid-line, which
/// becomes an arm tip of the cross.
pub const CELL_SEGMENTS: UVec3 = UVec3::new(2, 1, 2);

const EXTREME_EPS: f32 = 1e-6;

/// Triangle mesh data: positions, per-vertex normals, optional index buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Three indices per triangle. `None` means consecutive vertex triples.
    pub indices: Option<Vec<u32>>,
}

impl MeshGeometry {
    /// Builds an axis-aligned box centered on the origin.
    ///
    /// Each of the six faces is a grid of quads subdivided by `segments`,
    /// with its own vertices, outward normals and counter-clockwise winding.
    /// Faces are emitted in the order +X, -X, +Y, -Y, +Z, -Z.
    pub fn cuboid(size: Vec3, segments: UVec3) -> Self {
        let segments = segments.max(UVec3::ONE);
        let mut geo = Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Some(Vec::new()),
        };

        let (w, h, d) = (size.x, size.y, size.z);
        let (sx, sy, sz) = (segments.x, segments.y, segments.z);

        geo.push_plane([2, 1, 0], -1.0, -1.0, [d, h, w], [sz, sy]);
        geo.push_plane([2, 1, 0], 1.0, -1.0, [d, h, -w], [sz, sy]);
        geo.push_plane([0, 2, 1], 1.0, 1.0, [w, d, h], [sx, sz]);
        geo.push_plane([0, 2, 1], 1.0, -1.0, [w, d, -h], [sx, sz]);
        geo.push_plane([0, 1, 2], 1.0, -1.0, [w, h, d], [sx, sy]);
        geo.push_plane([0, 1, 2], -1.0, -1.0, [w, h, -d], [sx, sy]);

        geo
    }

    /// Appends one face of a box.
    ///
    /// `axes` names the components spanned by the face (`u`, `v`) and the
    /// component along its normal (`w`). `extent` holds the face width,
    /// height and signed depth; the face sits at `depth / 2` along `w`.
    fn push_plane(
        &mut self,
        axes: [usize; 3],
        u_dir: f32,
        v_dir: f32,
        extent: [f32; 3],
        grid: [u32; 2],
    ) {
        let [u, v, w] = axes;
        let [width, height, depth] = extent;
        let [grid_x, grid_y] = grid;

        let segment_w = width / grid_x as f32;
        let segment_h = height / grid_y as f32;
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let half_d = depth / 2.0;

        let first = self.positions.len() as u32;
        let row = grid_x + 1;

        let mut normal = Vec3::ZERO;
        normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

        for iy in 0..=grid_y {
            let y = iy as f32 * segment_h - half_h;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_w - half_w;
                let mut p = Vec3::ZERO;
                p[u] = x * u_dir;
                p[v] = y * v_dir;
                p[w] = half_d;
                self.positions.push(p);
                self.normals.push(normal);
            }
        }

        let Some(indices) = self.indices.as_mut() else {
            return;
        };
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = first + ix + row * iy;
                let b = first + ix + row * (iy + 1);
                let c = first + (ix + 1) + row * (iy + 1);
                let d = first + (ix + 1) + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Expands the index buffer so every triangle owns its three vertices.
    pub fn to_non_indexed(&self) -> Self {
        let Some(indices) = &self.indices else {
            return self.clone();
        };
        Self {
            positions: indices.iter().map(|&i| self.positions[i as usize]).collect(),
            normals: indices.iter().map(|&i| self.normals[i as usize]).collect(),
            indices: None,
        }
    }

    /// Vertex indices of every triangle, whether indexed or not.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        triangles(self.positions.len(), self.indices.as_deref())
    }
}

/// Triangle corner indices for `vertex_count` vertices and an optional index
/// buffer. Without an index buffer, consecutive triples form triangles and
/// a trailing partial triple is ignored.
pub fn triangles(vertex_count: usize, indices: Option<&[u32]>) -> Vec<[usize; 3]> {
    match indices {
        Some(indices) => indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect(),
        None => (0..vertex_count / 3)
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect(),
    }
}

/// Collapses cuboid positions into a thin cross.
///
/// Y is always preserved. A vertex keeps its X and Z only when it lies on
/// exactly one of the X or Z extremes, i.e. it is the tip of a cross arm;
/// every other vertex is pulled onto the central vertical axis.
pub fn collapse_to_cross(positions: &[Vec3], half_extent: Vec3) -> Vec<Vec3> {
    positions
        .iter()
        .map(|p| {
            let on_x = (p.x.abs() - half_extent.x).abs() < EXTREME_EPS;
            let on_z = (p.z.abs() - half_extent.z).abs() < EXTREME_EPS;
            if on_x != on_z {
                *p
            } else {
                Vec3::new(0.0, p.y, 0.0)
            }
        })
        .collect()
}

/// The shared cell shape: base cuboid plus its morph target.
#[derive(Clone, Debug, PartialEq)]
pub struct CellShape {
    pub base: MeshGeometry,
    /// Absolute target positions, one per base vertex.
    pub morph_target: Vec<Vec3>,
}

/// Builds the unit cuboid and the collapsed cross target for it.
pub fn build_base_and_target() -> CellShape {
    let base = MeshGeometry::cuboid(Vec3::splat(2.0 * CELL_HALF_EXTENT), CELL_SEGMENTS);
    let morph_target = collapse_to_cross(&base.positions, Vec3::splat(CELL_HALF_EXTENT));
    CellShape { base, morph_target }
}

impl CellShape {
    /// Base positions blended toward the morph target by `weight`.
    ///
    /// In [`MorphMode::Relative`] the target is read as an offset and added
    /// on top of the base, so the baked shape differs from the absolute
    /// convention for any non-zero weight.
    pub fn blended_positions(&self, weight: f32, mode: MorphMode) -> Vec<Vec3> {
        if weight == 0.0 {
            return self.base.positions.clone();
        }
        self.base
            .positions
            .iter()
            .zip(&self.morph_target)
            .map(|(&base, &target)| match mode {
                MorphMode::Absolute => base + weight * (target - base),
                MorphMode::Relative => base + weight * target,
            })
            .collect()
    }

    /// World-space vertex positions of a cell using this shape.
    pub fn world_positions(&self, mesh: &CellMesh, mode: MorphMode) -> Vec<Vec3> {
        let world = mesh.world_matrix();
        self.blended_positions(mesh.morph_weight, mode)
            .into_iter()
            .map(|p| world.transform_point3(p))
            .collect()
    }
}

/// Computes smooth per-vertex normals by accumulating face normals.
///
/// Face contributions are weighted by triangle area. Vertices that only
/// touch degenerate triangles get `+Y`.
pub fn compute_vertex_normals(positions: &[Vec3], indices: Option<&[u32]>) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];

    for [a, b, c] in triangles(positions.len(), indices) {
        let (pa, pb, pc) = (positions[a], positions[b], positions[c]);
        let face = (pc - pb).cross(pa - pb);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }

    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn cuboid_has_expected_vertex_and_triangle_counts() {
        let geo = MeshGeometry::cuboid(Vec3::ONE, CELL_SEGMENTS);

        // X faces: 3x2, Y faces: 3x3, Z faces: 3x2 vertices, each twice.
        assert_eq!(geo.vertex_count(), 42);
        assert_eq!(geo.normals.len(), 42);
        // 2 + 4 + 2 quads per side, two triangles each, on both sides.
        assert_eq!(geo.triangle_count(), 32);

        for p in &geo.positions {
            assert!(p.abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn cuboid_winding_matches_outward_normals() {
        let geo = MeshGeometry::cuboid(Vec3::ONE, UVec3::ONE);
        for [a, b, c] in geo.triangles() {
            let (pa, pb, pc) = (geo.positions[a], geo.positions[b], geo.positions[c]);
            let face = (pb - pa).cross(pc - pa).normalize();
            assert!(
                face.dot(geo.normals[a]) > 0.99,
                "triangle {:?} faces {:?}, expected {:?}",
                [a, b, c],
                face,
                geo.normals[a]
            );
        }
    }

    #[test]
    fn collapse_preserves_y_and_length() {
        let shape = build_base_and_target();
        assert_eq!(shape.morph_target.len(), shape.base.positions.len());
        for (base, target) in shape.base.positions.iter().zip(&shape.morph_target) {
            assert_eq!(base.y, target.y);
        }
    }

    #[test]
    fn collapse_keeps_arm_tips_and_pulls_corners_to_axis() {
        let positions = [
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(0.0, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.0, 0.5, 0.0),
        ];
        let out = collapse_to_cross(&positions, Vec3::splat(0.5));
        assert_eq!(out[0], Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(out[1], Vec3::new(0.0, -0.5, -0.5));
        assert_eq!(out[2], Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(out[3], Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(out[4], Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn fully_blended_shape_stays_within_the_cross() {
        let shape = build_base_and_target();
        for p in shape.blended_positions(1.0, MorphMode::Absolute) {
            // Every vertex sits on the X axis arm or the Z axis arm.
            assert!(p.x == 0.0 || p.z == 0.0, "vertex off the cross: {:?}", p);
        }
    }

    #[test]
    fn blend_weight_interpolates_between_shapes() {
        let shape = build_base_and_target();
        assert_eq!(shape.blended_positions(0.0, MorphMode::Absolute), shape.base.positions);

        let half = shape.blended_positions(0.5, MorphMode::Absolute);
        for ((h, b), t) in half.iter().zip(&shape.base.positions).zip(&shape.morph_target) {
            assert!((*h - (*b + *t) * 0.5).length() < 1e-6);
        }

        let relative = shape.blended_positions(0.5, MorphMode::Relative);
        for ((r, b), t) in relative.iter().zip(&shape.base.positions).zip(&shape.morph_target) {
            assert!((*r - (*b + *t * 0.5)).length() < 1e-6);
        }
    }

    #[test]
    fn world_positions_apply_scale_rotation_and_translation() {
        let shape = build_base_and_target();
        let mesh = CellMesh {
            position: Vec3::new(3.0, 1.0, -2.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
            ..CellMesh::default()
        };
        let world = shape.world_positions(&mesh, MorphMode::Absolute);
        let idx = shape
            .base
            .positions
            .iter()
            .position(|p| *p == Vec3::new(0.5, -0.5, 0.0))
            .expect("cuboid has a +X arm tip at the bottom");

        // (0.5, -0.5, 0) scaled by 2, rotated 90 degrees about Y, translated.
        let expected = Vec3::new(3.0, 0.0, -3.0);
        assert!((world[idx] - expected).length() < 1e-5);
    }

    #[test]
    fn computed_normals_of_cuboid_point_outward() {
        let geo = MeshGeometry::cuboid(Vec3::ONE, CELL_SEGMENTS);
        let normals = compute_vertex_normals(&geo.positions, geo.indices.as_deref());
        assert_eq!(normals.len(), geo.normals.len());
        for (computed, expected) in normals.iter().zip(&geo.normals) {
            assert!((*computed - *expected).length() < 1e-5);
        }
    }

    #[test]
    fn non_indexed_normals_and_degenerate_fallback() {
        let positions = [
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
        ];
        let normals = compute_vertex_normals(&positions, None);
        assert_eq!(normals[0], Vec3::Y);
        assert_eq!(normals[1], Vec3::Y);
        assert_eq!(normals[2], Vec3::Y);
        // Degenerate triangle falls back to +Y as well.
        assert_eq!(normals[3], Vec3::Y);
    }

    #[test]
    fn to_non_indexed_expands_triangles() {
        let geo = MeshGeometry::cuboid(Vec3::ONE, UVec3::ONE);
        let flat = geo.to_non_indexed();
        assert!(flat.indices.is_none());
        assert_eq!(flat.vertex_count(), 36);
        assert_eq!(flat.triangle_count(), geo.triangle_count());
    }
}
