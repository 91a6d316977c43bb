//! Orbit camera and pointer-to-world ray projection.
//!
//! Pointer coordinates are in pixels relative to the top-left corner of the
//! viewport. Normalized device coordinates run from `-1` to `1` with `+Y`
//! pointing up.

use glam::{Mat4, Vec2, Vec3};

/// Size in pixels of the area the scene is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Converts a pixel coordinate to normalized device coordinates.
pub fn pointer_to_ndc(pointer: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        pointer.x / viewport.width * 2.0 - 1.0,
        -(pointer.y / viewport.height) * 2.0 + 1.0,
    )
}

/// Half-line starting at `origin` along the unit vector `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Plane of points `p` with `normal · p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// The horizontal ground plane `y = 0`.
    pub const GROUND: Plane = Plane {
        normal: Vec3::Y,
        constant: 0.0,
    };
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with `plane`.
    ///
    /// Returns `None` when the ray runs parallel to the plane or the
    /// intersection lies behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        let denom = plane.normal.dot(self.direction);
        if denom == 0.0 {
            return None;
        }
        let t = -(self.origin.dot(plane.normal) + plane.constant) / denom;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }

    /// Distance along the ray to the nearest hit of a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let along = to_center.dot(self.direction);
        let d2 = to_center.length_squared() - along * along;
        let r2 = radius * radius;
        if d2 > r2 {
            return None;
        }
        let half_chord = (r2 - d2).sqrt();
        let near = along - half_chord;
        let far = along + half_chord;
        if far < 0.0 {
            return None;
        }
        Some(if near < 0.0 { far } else { near })
    }
}

/// Lets the attractor drag switch the camera's pointer handling on and off.
pub trait OrbitControl {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Perspective camera orbiting a target point.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
    /// Elevation above the ground plane, radians.
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Whether orbit and zoom input is applied.
    pub enabled: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 40.0,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.75,
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 500.0,
            min_distance: 2.0,
            max_distance: 200.0,
            enabled: true,
        }
    }
}

impl OrbitCamera {
    const MIN_PITCH: f32 = 0.05;
    const MAX_PITCH: f32 = 1.5;
    const ORBIT_SPEED: f32 = 0.008;

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        let (sin_y, cos_y) = self.yaw.sin_cos();
        self.target + Vec3::new(cos_p * sin_y, sin_p, cos_p * cos_y) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    /// Ray from the camera through a point given in normalized device
    /// coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let half_h = (self.fov_y * 0.5).tan();
        let dir_view = Vec3::new(ndc.x * half_h * aspect, ndc.y * half_h, -1.0);
        let dir = self.view_matrix().inverse().transform_vector3(dir_view);
        Ray::new(self.position(), dir)
    }

    /// Projects a world point to pixel coordinates.
    ///
    /// Returns the pixel position and the view-space depth, or `None` for
    /// points behind the camera.
    pub fn world_to_screen(&self, p: Vec3, viewport: Viewport) -> Option<(Vec2, f32)> {
        let view = self.view_matrix().transform_point3(p);
        if view.z >= -self.near {
            return None;
        }
        let ndc = self
            .projection_matrix(viewport.aspect())
            .project_point3(view);
        let x = (ndc.x + 1.0) * 0.5 * viewport.width;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height;
        Some((Vec2::new(x, y), -view.z))
    }

    /// Rotates around the target by a pointer delta in pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        self.yaw -= delta.x * Self::ORBIT_SPEED;
        self.pitch = (self.pitch + delta.y * Self::ORBIT_SPEED)
            .clamp(Self::MIN_PITCH, Self::MAX_PITCH);
    }

    /// Scales the orbit distance; factors below `1` move closer.
    pub fn zoom(&mut self, factor: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Backs the camera off far enough to see a square of the given half
    /// extent around the target.
    pub fn frame_extent(&mut self, half_extent: f32) {
        let radius = half_extent.max(1.0) * std::f32::consts::SQRT_2;
        let distance = radius / (self.fov_y * 0.5).tan() * 1.2;
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }
}

impl OrbitControl for OrbitCamera {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Projects a pointer position onto the ground plane `y = 0`.
///
/// Returns `None` if the view ray misses the plane.
pub fn project_pointer_to_ground(
    pointer: Vec2,
    viewport: Viewport,
    camera: &OrbitCamera,
) -> Option<Vec3> {
    let ndc = pointer_to_ndc(pointer, viewport);
    camera
        .ray_from_ndc(ndc, viewport.aspect())
        .intersect_plane(&Plane::GROUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_close(a: Vec3, b: Vec3, eps: f32) {
        assert!((a - b).length() < eps, "expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn pointer_to_ndc_maps_corners_and_flips_y() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(pointer_to_ndc(Vec2::new(0.0, 0.0), vp), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(800.0, 600.0), vp), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), vp), Vec2::ZERO);
    }

    #[test]
    fn ray_hits_ground_below() {
        let ray = Ray::new(Vec3::new(1.0, 5.0, 2.0), Vec3::NEG_Y);
        assert_eq!(ray.intersect_plane(&Plane::GROUND), Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn parallel_ray_misses_ground() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert_eq!(ray.intersect_plane(&Plane::GROUND), None);
    }

    #[test]
    fn ground_behind_ray_is_a_miss() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(ray.intersect_plane(&Plane::GROUND), None);
    }

    #[test]
    fn sphere_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).expect("ray passes through center");
        assert!((t - 9.0).abs() < 1e-5);

        assert_eq!(ray.intersect_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0), None);
        // Sphere entirely behind the origin.
        assert_eq!(ray.intersect_sphere(Vec3::new(0.0, 0.0, -20.0), 1.0), None);
        // Origin inside the sphere reports the exit point.
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        let t = inside.intersect_sphere(Vec3::ZERO, 2.0).expect("origin is inside");
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn screen_center_projects_to_camera_target() {
        let camera = OrbitCamera::default();
        let vp = Viewport::new(1024.0, 768.0);
        let hit = project_pointer_to_ground(Vec2::new(512.0, 384.0), vp, &camera)
            .expect("camera looks down at the ground");
        assert_vec3_close(hit, camera.target, 1e-3);
    }

    #[test]
    fn world_to_screen_and_pointer_projection_agree() {
        let camera = OrbitCamera {
            yaw: 0.3,
            pitch: 0.9,
            distance: 25.0,
            ..OrbitCamera::default()
        };
        let vp = Viewport::new(800.0, 600.0);

        for p in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, -3.0),
            Vec3::new(-6.5, 0.0, 2.25),
        ] {
            let (screen, depth) = camera.world_to_screen(p, vp).expect("point in front of camera");
            assert!(depth > 0.0);
            let back = project_pointer_to_ground(screen, vp, &camera).expect("hits ground");
            assert_vec3_close(back, p, 1e-2);
        }
    }

    #[test]
    fn pointer_above_horizon_misses_ground() {
        let camera = OrbitCamera {
            pitch: 0.05,
            ..OrbitCamera::default()
        };
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(project_pointer_to_ground(Vec2::new(400.0, 0.0), vp, &camera), None);
    }

    #[test]
    fn disabled_camera_ignores_orbit_and_zoom() {
        let mut camera = OrbitCamera::default();
        camera.set_enabled(false);
        let before = camera.clone();

        camera.orbit(Vec2::new(50.0, 20.0));
        camera.zoom(0.5);
        assert_eq!(camera, before);

        camera.set_enabled(true);
        camera.orbit(Vec2::new(50.0, 0.0));
        assert!(camera.yaw != before.yaw);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1e-6);
        assert_eq!(camera.distance, camera.min_distance);
        camera.zoom(1e6);
        assert_eq!(camera.distance, camera.max_distance);
    }
}
