//! Deferred recomputation.
//!
//! Inputs that change per-cell visuals only mark the [`DirtyFlag`]; the
//! solve itself happens at most once per frame, and not at all on frames
//! where nothing changed.

/// Set whenever per-cell visual state is stale.
///
/// Starts set so the first frame always solves. Only a completed solve
/// pass clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyFlag {
    dirty: bool,
}

impl Default for DirtyFlag {
    fn default() -> Self {
        Self { dirty: true }
    }
}

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn clear(&mut self) {
        self.dirty = false;
    }
}
