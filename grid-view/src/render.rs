//! Software rendering of a [`GridScene`] onto an egui painter.
//!
//! Every cell is blended, transformed to world space and cut into flat-shaded
//! triangles. Triangles are sorted back to front and painted as one
//! [`egui::Mesh`], so no depth buffer is needed. Shadows are cell silhouettes
//! flattened onto the ground along the light direction.

use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke};
use glam::Vec3;
use grid_core::{camera::Viewport, color::Rgb, scene::GridScene};

/// Light that reaches faces turned away from the sun.
const AMBIENT: f32 = 0.35;

const GROUND_COLOR: Color32 = Color32::from_rgb(0x2b, 0x2e, 0x36);
const MARKER_COLOR: Color32 = Color32::from_rgb(0xff, 0xe0, 0x66);

/// One projected triangle waiting to be painted.
struct ScreenTriangle {
    points: [Pos2; 3],
    /// Mean view-space depth, larger is farther away.
    depth: f32,
    color: Color32,
}

/// Maps world points into the pixel space of `rect`.
struct Projector<'a> {
    scene: &'a GridScene,
    rect: Rect,
    viewport: Viewport,
}

impl<'a> Projector<'a> {
    fn new(scene: &'a GridScene, rect: Rect) -> Self {
        Self {
            scene,
            rect,
            viewport: Viewport::new(rect.width(), rect.height()),
        }
    }

    fn project(&self, p: Vec3) -> Option<(Pos2, f32)> {
        let (screen, depth) = self.scene.camera.world_to_screen(p, self.viewport)?;
        Some((self.rect.min + egui::vec2(screen.x, screen.y), depth))
    }

    fn project_triangle(&self, tri: [Vec3; 3]) -> Option<([Pos2; 3], f32)> {
        let (a, da) = self.project(tri[0])?;
        let (b, db) = self.project(tri[1])?;
        let (c, dc) = self.project(tri[2])?;
        Some(([a, b, c], (da + db + dc) / 3.0))
    }
}

/// Lambert shading with two-sided faces: the morph target flattens cells into
/// thin sheets that are visible from both sides.
fn shade(color: Rgb, normal: Vec3, to_camera: Vec3, light_dir: Vec3) -> Color32 {
    let n = if normal.dot(to_camera) < 0.0 {
        -normal
    } else {
        normal
    };
    let diffuse = n.dot(-light_dir).max(0.0);
    let intensity = AMBIENT + (1.0 - AMBIENT) * diffuse;
    let [r, g, b] = Rgb::new(color.r * intensity, color.g * intensity, color.b * intensity)
        .to_rgb8();
    Color32::from_rgb(r, g, b)
}

/// Drops `p` onto the ground along the light direction.
///
/// ### Returns
/// `None` if the light runs parallel to the ground.
fn flatten_to_ground(p: Vec3, light_dir: Vec3) -> Option<Vec3> {
    if light_dir.y >= 0.0 {
        return None;
    }
    let t = p.y / -light_dir.y;
    Some(Vec3::new(p.x + light_dir.x * t, 0.0, p.z + light_dir.z * t))
}

fn push_triangle(mesh: &mut Mesh, points: [Pos2; 3], color: Color32) {
    let first = mesh.vertices.len() as u32;
    for p in points {
        mesh.colored_vertex(p, color);
    }
    mesh.add_triangle(first, first + 1, first + 2);
}

/// Paints the ground, shadows, cells and attractor marker into `rect`.
pub fn paint_scene(painter: &Painter, rect: Rect, scene: &GridScene) {
    let projector = Projector::new(scene, rect);

    paint_ground(painter, &projector, scene);
    if scene.light.cast_shadow && scene.ground.receive_shadow {
        paint_shadows(painter, &projector, scene);
    }
    painter.add(Shape::mesh(cell_mesh(&projector, scene)));
    paint_marker(painter, &projector, scene);
}

fn paint_ground(painter: &Painter, projector: &Projector, scene: &GridScene) {
    let h = scene.ground.half_extent;
    let corners = [
        Vec3::new(-h, 0.0, -h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(h, 0.0, h),
        Vec3::new(-h, 0.0, h),
    ];
    let points: Option<Vec<Pos2>> = corners
        .iter()
        .map(|&c| projector.project(c).map(|(p, _)| p))
        .collect();
    if let Some(points) = points {
        painter.add(Shape::convex_polygon(points, GROUND_COLOR, Stroke::NONE));
    }
}

fn paint_shadows(painter: &Painter, projector: &Projector, scene: &GridScene) {
    let light_dir = scene.light.direction;
    let shape = scene.lattice().shape();
    let triangles = shape.base.triangles();
    let color = Color32::from_black_alpha(70);
    let mut mesh = Mesh::default();

    for cell in scene.lattice().cells() {
        if !cell.mesh.cast_shadow {
            continue;
        }
        let world = shape.world_positions(&cell.mesh, scene.config.morph_mode);
        for [a, b, c] in &triangles {
            let flat = [world[*a], world[*b], world[*c]].map(|p| flatten_to_ground(p, light_dir));
            let [Some(fa), Some(fb), Some(fc)] = flat else {
                continue;
            };
            if let Some((points, _)) = projector.project_triangle([fa, fb, fc]) {
                push_triangle(&mut mesh, points, color);
            }
        }
    }
    painter.add(Shape::mesh(mesh));

    if scene.marker.cast_shadow
        && let Some(center) = flatten_to_ground(scene.attractor().position, light_dir)
        && let Some((p, depth)) = projector.project(center)
    {
        let radius = marker_pixel_radius(projector, scene.marker.radius, depth);
        painter.circle_filled(p, radius, color);
    }
}

/// Builds the back-to-front sorted mesh of all cells.
fn cell_mesh(projector: &Projector, scene: &GridScene) -> Mesh {
    let shape = scene.lattice().shape();
    let triangles = shape.base.triangles();
    let eye = scene.camera.position();
    let light_dir = scene.light.direction;

    let mut screen = Vec::with_capacity(scene.lattice().len() * triangles.len());
    for cell in scene.lattice().cells() {
        let world = shape.world_positions(&cell.mesh, scene.config.morph_mode);
        for [a, b, c] in &triangles {
            let tri = [world[*a], world[*b], world[*c]];
            let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
                continue;
            }
            let Some((points, depth)) = projector.project_triangle(tri) else {
                continue;
            };
            screen.push(ScreenTriangle {
                points,
                depth,
                color: shade(cell.mesh.color, normal.normalize(), eye - tri[0], light_dir),
            });
        }
    }

    screen.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let mut mesh = Mesh::default();
    for tri in &screen {
        push_triangle(&mut mesh, tri.points, tri.color);
    }
    mesh
}

/// Screen radius of a sphere of world radius `radius` at view depth `depth`.
fn marker_pixel_radius(projector: &Projector, radius: f32, depth: f32) -> f32 {
    let half_h = (projector.scene.camera.fov_y * 0.5).tan();
    let pixels_per_unit = projector.viewport.height * 0.5 / (half_h * depth.max(1e-3));
    (radius * pixels_per_unit).max(2.0)
}

fn paint_marker(painter: &Painter, projector: &Projector, scene: &GridScene) {
    let Some((p, depth)) = projector.project(scene.attractor().position) else {
        return;
    };
    let radius = marker_pixel_radius(projector, scene.marker.radius, depth);
    let stroke = if scene.is_dragging() {
        Stroke::new(2.0, Color32::WHITE)
    } else {
        Stroke::new(1.0, Color32::BLACK)
    };
    painter.circle(p, radius, MARKER_COLOR, stroke);
}
