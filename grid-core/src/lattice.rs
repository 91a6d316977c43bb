use crate::{
    color::Rgb,
    config::GridConfig,
    geometry::{CellShape, build_base_and_target},
    types::CellId,
};
use glam::{Mat4, Quat, Vec2, Vec3};

/// Render state of one cell: transform, flat material color, morph weight.
#[derive(Clone, Debug, PartialEq)]
pub struct CellMesh {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub color: Rgb,
    /// `0` shows the cuboid, `1` the collapsed cross.
    pub morph_weight: f32,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Default for CellMesh {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            color: Rgb::WHITE,
            morph_weight: 0.0,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

impl CellMesh {
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[derive(Debug)]
pub struct Cell {
    base_position: Vec3,
    pub mesh: CellMesh,
    /// Horizontal distance to the attractor from the last solve.
    pub distance: f32,
}

impl Cell {
    pub fn new(base_position: Vec3) -> Self {
        Self {
            base_position,
            mesh: CellMesh {
                position: base_position,
                ..CellMesh::default()
            },
            distance: 0.0,
        }
    }

    /// Resting position on the ground plane, fixed for the cell's lifetime.
    pub fn base_position(&self) -> Vec3 {
        self.base_position
    }
}

/// The grid of cells plus the shape they all share.
#[derive(Debug)]
pub struct Lattice {
    cells: Vec<Cell>,
    shape: CellShape,
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new()
    }
}

impl Lattice {
    /// An empty lattice with the standard cell shape.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            shape: build_base_and_target(),
        }
    }

    pub fn from_config(cfg: &GridConfig) -> Self {
        let mut lattice = Self::new();
        lattice.rebuild(cfg);
        lattice
    }

    /// Drops every cell and lays out `count_x * count_y` new ones.
    ///
    /// Cells are centered on the origin with `cfg.spacing` between centers,
    /// ordered with X as the outer index. Counts are used as given.
    pub fn rebuild(&mut self, cfg: &GridConfig) {
        let dropped = self.cells.len();
        self.cells.clear();
        self.cells.reserve(cfg.cell_count());

        let origin_x = -((cfg.count_x.saturating_sub(1)) as f32 * cfg.spacing) / 2.0;
        let origin_z = -((cfg.count_y.saturating_sub(1)) as f32 * cfg.spacing) / 2.0;

        for i in 0..cfg.count_x {
            for j in 0..cfg.count_y {
                let x = origin_x + i as f32 * cfg.spacing;
                let z = origin_z + j as f32 * cfg.spacing;
                self.cells.push(Cell::new(Vec3::new(x, 0.0, z)));
            }
        }

        log::debug!(
            "rebuilt lattice {}x{} (dropped {} cells, created {})",
            cfg.count_x,
            cfg.count_y,
            dropped,
            self.cells.len()
        );
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn shape(&self) -> &CellShape {
        &self.shape
    }

    /// Half extents on X and Z of the area covered by cell centers.
    pub fn half_extents(&self) -> Vec2 {
        self.cells
            .iter()
            .fold(Vec2::ZERO, |acc, c| {
                acc.max(Vec2::new(c.base_position.x.abs(), c.base_position.z.abs()))
            })
    }

    pub fn set_shadow_flags(&mut self, cast: bool, receive: bool) {
        for cell in &mut self.cells {
            cell.mesh.cast_shadow = cast;
            cell.mesh.receive_shadow = receive;
        }
    }
}
