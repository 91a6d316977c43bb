//! The grid scene: configuration, lattice, attractor, camera and scheduler
//! bundled into one context object.
//!
//! A frontend drives it with three kinds of events, each run to completion:
//! pointer events ([`GridScene::pointer_down`] and friends), configuration
//! edits ([`GridScene::apply_change`]) and the per-frame tick
//! ([`GridScene::frame`]). Export reads the current state at any time.

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::{
    attractor::{AttractorMarker, AttractorState},
    camera::{OrbitCamera, Viewport, pointer_to_ndc, project_pointer_to_ground},
    config::{ConfigChange, ConfigField, GridConfig},
    drag::{AttractorDrag, DragState},
    export::{ExportError, ObjDocument, export_obj, write_export},
    lattice::Lattice,
    scheduler::DirtyFlag,
    solver::solve_if_dirty,
};

/// Extra ground beyond the outermost cell centers.
const GROUND_MARGIN: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlane {
    /// Half the side length of the square ground patch.
    pub half_extent: f32,
    pub receive_shadow: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in.
    pub direction: Vec3,
    pub cast_shadow: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(-0.5, -1.0, -0.3).normalize(),
            cast_shadow: true,
        }
    }
}

pub struct GridScene {
    pub config: GridConfig,
    lattice: Lattice,
    attractor: AttractorState,
    pub marker: AttractorMarker,
    pub camera: OrbitCamera,
    pub ground: GroundPlane,
    pub light: DirectionalLight,
    drag: AttractorDrag,
    dirty: DirtyFlag,
}

impl Default for GridScene {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridScene {
    /// Builds the lattice for `config` and frames the camera on it.
    ///
    /// The first [`GridScene::frame`] call always solves.
    pub fn new(config: GridConfig) -> Self {
        let mut scene = Self {
            config,
            lattice: Lattice::new(),
            attractor: AttractorState::default(),
            marker: AttractorMarker::default(),
            camera: OrbitCamera::default(),
            ground: GroundPlane {
                half_extent: GROUND_MARGIN,
                receive_shadow: config.shadows,
            },
            light: DirectionalLight::default(),
            drag: AttractorDrag::new(),
            dirty: DirtyFlag::new(),
        };
        scene.rebuild_lattice();
        let extent = scene.ground.half_extent;
        scene.camera.frame_extent(extent);
        scene
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn attractor(&self) -> &AttractorState {
        &self.attractor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Recreates every cell from the current configuration.
    ///
    /// Counts are clamped to at least one first. Marks the scene dirty and
    /// re-applies render flags to the new cells and shared objects.
    pub fn rebuild_lattice(&mut self) {
        self.config.clamp_counts();
        self.lattice.rebuild(&self.config);
        self.ground.half_extent = self.lattice.half_extents().max_element() + GROUND_MARGIN;
        self.dirty.mark();
        self.apply_render_flags();
    }

    /// Pushes the shadow setting to cells, ground, marker and light.
    pub fn apply_render_flags(&mut self) {
        let shadows = self.config.shadows;
        self.lattice.set_shadow_flags(shadows, shadows);
        self.ground.receive_shadow = shadows;
        self.marker.cast_shadow = shadows;
        self.light.cast_shadow = shadows;
    }

    /// Reacts to an edit of a single configuration field.
    pub fn apply_change(&mut self, field: ConfigField) {
        match field.change_kind() {
            ConfigChange::Rebuild => self.rebuild_lattice(),
            ConfigChange::Resolve => self.dirty.mark(),
            ConfigChange::RenderFlags => self.apply_render_flags(),
        }
        log::debug!("config change {:?}", field);
    }

    /// Replaces the whole configuration, rebuilding the lattice.
    pub fn reset_config(&mut self, config: GridConfig) {
        self.config = config;
        self.rebuild_lattice();
    }

    /// Per-frame tick: solves if something changed since the last solve.
    ///
    /// ### Returns
    /// `true` if cells were updated this frame.
    pub fn frame(&mut self) -> bool {
        solve_if_dirty(
            &mut self.lattice,
            &self.attractor,
            &self.config,
            &mut self.dirty,
        )
    }

    /// Moves the attractor directly, bypassing the drag state machine.
    pub fn place_attractor(&mut self, ground: Vec3) {
        self.attractor.set_ground_position(ground);
        self.dirty.mark();
    }

    /// Drops the attractor at a random point over the lattice.
    pub fn scatter_attractor(&mut self, rng: &mut impl Rng) {
        let half = self.lattice.half_extents();
        self.attractor = AttractorState::random_in_rect(half, rng);
        self.dirty.mark();
    }

    /// Pointer pressed at `pointer` (pixels inside `viewport`).
    ///
    /// ### Returns
    /// `true` if the press grabbed the attractor.
    pub fn pointer_down(&mut self, pointer: Vec2, viewport: Viewport) -> bool {
        let ray = self
            .camera
            .ray_from_ndc(pointer_to_ndc(pointer, viewport), viewport.aspect());
        let grabbed = self
            .drag
            .pointer_down(&ray, &self.marker, &self.attractor, &mut self.camera);
        if grabbed {
            log::debug!("attractor grabbed");
        }
        grabbed
    }

    /// Pointer moved; drags the attractor if a drag is active.
    ///
    /// ### Returns
    /// `true` if the attractor moved.
    pub fn pointer_move(&mut self, pointer: Vec2, viewport: Viewport) -> bool {
        if !self.drag.is_dragging() {
            return false;
        }
        let ground = project_pointer_to_ground(pointer, viewport, &self.camera);
        self.drag
            .pointer_move(ground, &mut self.attractor, &mut self.dirty)
    }

    pub fn pointer_up(&mut self) {
        self.drag.release(&mut self.camera);
    }

    pub fn pointer_leave(&mut self) {
        self.drag.release(&mut self.camera);
    }

    /// Serializes the current lattice; `None` if it has no cells.
    pub fn export_obj(&self, timestamp: &str) -> Option<ObjDocument> {
        export_obj(&self.lattice, self.config.morph_mode, timestamp)
    }

    /// Writes the current lattice into `dir`.
    pub fn write_export(
        &self,
        dir: &Path,
        time: SystemTime,
    ) -> Result<Option<PathBuf>, ExportError> {
        write_export(dir, &self.lattice, self.config.morph_mode, time)
    }
}
