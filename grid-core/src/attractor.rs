use crate::camera::Ray;
use glam::{Vec2, Vec3};
use rand::Rng;

/// Fixed height the attractor floats at above the ground plane.
pub const ATTRACTOR_HEIGHT: f32 = 1.0;

/// The single point every cell reacts to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttractorState {
    pub position: Vec3,
}

impl Default for AttractorState {
    fn default() -> Self {
        Self::at_ground(0.0, 0.0)
    }
}

impl AttractorState {
    /// Places the attractor above the ground point `(x, 0, z)`.
    pub fn at_ground(x: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, ATTRACTOR_HEIGHT, z),
        }
    }

    /// Moves the attractor over a ground point, keeping its fixed height.
    pub fn set_ground_position(&mut self, ground: Vec3) {
        self.position.x = ground.x;
        self.position.z = ground.z;
    }

    /// Places the attractor uniformly inside `[-half_extents, half_extents]`
    /// on X and Z.
    pub fn random_in_rect(half_extents: Vec2, rng: &mut impl Rng) -> Self {
        let x = rng.random_range(-half_extents.x..=half_extents.x);
        let z = rng.random_range(-half_extents.y..=half_extents.y);
        Self::at_ground(x, z)
    }

    /// Euclidean distance to `p` ignoring the vertical axis.
    pub fn horizontal_distance(&self, p: Vec3) -> f32 {
        Vec2::new(self.position.x - p.x, self.position.z - p.z).length()
    }
}

/// The visible, grabbable sphere drawn at the attractor position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttractorMarker {
    pub radius: f32,
    pub cast_shadow: bool,
}

impl Default for AttractorMarker {
    fn default() -> Self {
        Self {
            radius: 0.6,
            cast_shadow: true,
        }
    }
}

impl AttractorMarker {
    /// Whether `ray` grabs the marker drawn at `attractor`.
    pub fn hit_test(&self, ray: &Ray, attractor: &AttractorState) -> bool {
        ray.intersect_sphere(attractor.position, self.radius).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn ground_moves_keep_height() {
        let mut a = AttractorState::default();
        a.set_ground_position(Vec3::new(3.0, 0.0, -4.0));
        assert_eq!(a.position, Vec3::new(3.0, ATTRACTOR_HEIGHT, -4.0));
    }

    #[test]
    fn horizontal_distance_ignores_height() {
        let a = AttractorState::at_ground(0.0, 0.0);
        assert_eq!(a.horizontal_distance(Vec3::new(3.0, 0.0, 4.0)), 5.0);
        assert_eq!(a.horizontal_distance(Vec3::new(0.0, 100.0, 0.0)), 0.0);
    }

    #[test]
    fn random_in_rect_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let half = Vec2::new(5.0, 2.0);
        for _ in 0..200 {
            let a = AttractorState::random_in_rect(half, &mut rng);
            assert!(a.position.x.abs() <= half.x);
            assert!(a.position.z.abs() <= half.y);
            assert_eq!(a.position.y, ATTRACTOR_HEIGHT);
        }
    }

    #[test]
    fn marker_hit_test_uses_radius() {
        let marker = AttractorMarker::default();
        let a = AttractorState::at_ground(2.0, 2.0);

        let down = Ray::new(Vec3::new(2.0, 10.0, 2.0), Vec3::NEG_Y);
        assert!(marker.hit_test(&down, &a));

        let beside = Ray::new(Vec3::new(2.0 + marker.radius * 2.0, 10.0, 2.0), Vec3::NEG_Y);
        assert!(!marker.hit_test(&beside, &a));
    }
}
