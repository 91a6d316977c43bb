use crate::color::Rgb;

/// How a morph target is combined with the base positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MorphMode {
    /// The target holds absolute positions: `base + w * (target - base)`.
    #[default]
    Absolute,
    /// The target holds offsets: `base + w * target`.
    Relative,
}

/// Tunable parameters of the grid.
///
/// Created once at startup and edited in place by the configuration panel.
/// `min_size <= max_size` is not enforced; an inverted range simply inverts
/// the size mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub min_size: f32,
    pub max_size: f32,
    /// Center-to-center distance between neighboring cells.
    pub spacing: f32,
    pub count_x: u32,
    pub count_y: u32,
    /// Color of cells nearest the attractor.
    pub close_color: Rgb,
    /// Color of the farthest cells.
    pub far_color: Rgb,
    /// Y rotation in degrees of the nearest cells.
    pub min_rotation: f32,
    /// Y rotation in degrees of the farthest cells.
    pub max_rotation: f32,
    pub shadows: bool,
    pub morph_mode: MorphMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_size: 0.4,
            max_size: 2.4,
            spacing: 2.5,
            count_x: 12,
            count_y: 12,
            close_color: Rgb::from_hex(0xff4d2e),
            far_color: Rgb::from_hex(0x2e6bff),
            min_rotation: 0.0,
            max_rotation: 90.0,
            shadows: true,
            morph_mode: MorphMode::Absolute,
        }
    }
}

impl GridConfig {
    /// Forces both lattice dimensions to at least one cell.
    pub fn clamp_counts(&mut self) {
        self.count_x = self.count_x.max(1);
        self.count_y = self.count_y.max(1);
    }

    pub fn cell_count(&self) -> usize {
        self.count_x as usize * self.count_y as usize
    }
}

/// A single editable field of [`GridConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    MinSize,
    MaxSize,
    Spacing,
    CountX,
    CountY,
    CloseColor,
    FarColor,
    MinRotation,
    MaxRotation,
    Shadows,
    MorphMode,
}

/// What has to happen after a field changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigChange {
    /// Lattice structure changed; cells must be recreated.
    Rebuild,
    /// Only the per-cell parameters must be solved again.
    Resolve,
    /// Only renderer flags must be re-applied.
    RenderFlags,
}

impl ConfigField {
    pub fn change_kind(self) -> ConfigChange {
        match self {
            ConfigField::Spacing | ConfigField::CountX | ConfigField::CountY => {
                ConfigChange::Rebuild
            }
            ConfigField::Shadows => ConfigChange::RenderFlags,
            ConfigField::MinSize
            | ConfigField::MaxSize
            | ConfigField::CloseColor
            | ConfigField::FarColor
            | ConfigField::MinRotation
            | ConfigField::MaxRotation
            | ConfigField::MorphMode => ConfigChange::Resolve,
        }
    }
}
