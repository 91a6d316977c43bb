//! Attractor dragging.
//!
//! Dragging and camera orbiting consume the same pointer stream. A drag can
//! only start on top of the attractor marker, and while it runs the camera's
//! orbit control is switched off.

use crate::{
    attractor::{AttractorMarker, AttractorState},
    camera::{OrbitControl, Ray},
    scheduler::DirtyFlag,
};
use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Default)]
pub struct AttractorDrag {
    state: DragState,
}

impl AttractorDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Starts a drag if `ray` hits the marker.
    ///
    /// ### Returns
    /// `true` if the drag started; the orbit control is then disabled.
    pub fn pointer_down(
        &mut self,
        ray: &Ray,
        marker: &AttractorMarker,
        attractor: &AttractorState,
        orbit: &mut impl OrbitControl,
    ) -> bool {
        if self.state == DragState::Dragging || !marker.hit_test(ray, attractor) {
            return false;
        }
        self.state = DragState::Dragging;
        orbit.set_enabled(false);
        true
    }

    /// Moves the attractor to the projected ground point while dragging.
    ///
    /// A missing ground point leaves everything unchanged.
    ///
    /// ### Returns
    /// `true` if the attractor moved.
    pub fn pointer_move(
        &mut self,
        ground: Option<Vec3>,
        attractor: &mut AttractorState,
        dirty: &mut DirtyFlag,
    ) -> bool {
        if self.state != DragState::Dragging {
            return false;
        }
        let Some(ground) = ground else {
            return false;
        };
        attractor.set_ground_position(ground);
        dirty.mark();
        true
    }

    /// Ends a drag on pointer-up or pointer-leave.
    pub fn release(&mut self, orbit: &mut impl OrbitControl) {
        if self.state == DragState::Dragging {
            self.state = DragState::Idle;
            orbit.set_enabled(true);
        }
    }
}
