/// Identifier for a cell in a [`crate::lattice::Lattice`].
///
/// This is an index into the lattice's cell list in lattice order, and is
/// only meaningful until the next rebuild.
pub type CellId = usize;

/// Linear interpolation between `a` and `b`.
///
/// Written as a weighted sum so that `t = 0` yields exactly `a` and
/// `t = 1` yields exactly `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
