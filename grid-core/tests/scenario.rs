use glam::Vec3;
use grid_core::{
    color::Rgb,
    config::{ConfigField, GridConfig},
    scene::GridScene,
    solver::normalize_distances,
};

fn two_cell_scene() -> GridScene {
    GridScene::new(GridConfig {
        count_x: 2,
        count_y: 1,
        spacing: 2.0,
        min_size: 0.4,
        max_size: 2.4,
        ..GridConfig::default()
    })
}

fn scales(scene: &GridScene) -> Vec<f32> {
    scene
        .lattice()
        .cells()
        .iter()
        .map(|c| c.mesh.scale.x)
        .collect()
}

#[test]
fn attractor_on_first_cell_then_midpoint() {
    let mut scene = two_cell_scene();
    let first = scene.lattice().cells()[0].base_position();
    assert_eq!(first, Vec3::new(-1.0, 0.0, 0.0));

    scene.place_attractor(first);
    assert!(scene.frame());
    assert_eq!(scene.lattice().cells()[0].distance, 0.0);
    assert_eq!(scene.lattice().cells()[1].distance, 2.0);
    assert_eq!(scales(&scene), vec![0.4, 2.4]);

    // Both cells are equally far from the midpoint, so both are the maximum.
    scene.place_attractor(Vec3::ZERO);
    assert!(scene.frame());
    assert_eq!(scales(&scene), vec![2.4, 2.4]);
    for cell in scene.lattice().cells() {
        assert_eq!(cell.distance, 1.0);
        assert_eq!(cell.mesh.morph_weight, 1.0);
    }
}

#[test]
fn farthest_cell_always_normalizes_to_one() {
    let mut scene = GridScene::new(GridConfig {
        count_x: 5,
        count_y: 4,
        spacing: 1.5,
        ..GridConfig::default()
    });

    for ground in [
        Vec3::new(0.3, 0.0, -1.2),
        Vec3::new(-3.0, 0.0, 2.0),
        Vec3::new(10.0, 0.0, 10.0),
    ] {
        scene.place_attractor(ground);
        scene.frame();

        let distances: Vec<f32> = scene.lattice().cells().iter().map(|c| c.distance).collect();
        let max = distances.iter().copied().fold(0.0f32, f32::max);
        let ts = normalize_distances(&distances);

        for (cell, (&d, &t)) in scene.lattice().cells().iter().zip(distances.iter().zip(&ts)) {
            assert!((t - d / max).abs() < 1e-6);
            assert_eq!(cell.mesh.morph_weight, t);
        }
        assert!(ts.iter().any(|&t| t == 1.0));
    }
}

#[test]
fn idle_frames_do_not_touch_cells() {
    let mut scene = two_cell_scene();
    scene.frame();
    let before: Vec<_> = scene.lattice().cells().iter().map(|c| c.mesh.clone()).collect();

    for _ in 0..5 {
        assert!(!scene.frame());
    }

    let after: Vec<_> = scene.lattice().cells().iter().map(|c| c.mesh.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn color_edits_apply_on_next_frame() {
    let mut scene = two_cell_scene();
    scene.place_attractor(Vec3::new(-1.0, 0.0, 0.0));
    scene.frame();

    scene.config.close_color = Rgb::from_hex(0x00ff00);
    scene.config.far_color = Rgb::from_hex(0x0000ff);
    scene.apply_change(ConfigField::CloseColor);
    scene.apply_change(ConfigField::FarColor);
    assert!(scene.frame());

    let near = scene.lattice().cells()[0].mesh.color;
    let far = scene.lattice().cells()[1].mesh.color;
    assert!((near.g - 1.0).abs() < 1e-5 && near.r.abs() < 1e-5 && near.b.abs() < 1e-5);
    assert!((far.b - 1.0).abs() < 1e-5 && far.r.abs() < 1e-5 && far.g.abs() < 1e-5);
}

#[test]
fn rebuild_then_export_covers_every_cell() {
    let mut scene = two_cell_scene();
    scene.config.count_x = 3;
    scene.config.count_y = 3;
    scene.apply_change(ConfigField::CountY);
    assert_eq!(scene.lattice().len(), 9);
    assert!(scene.lattice().cells().iter().all(|c| c.base_position().y == 0.0));

    scene.frame();
    let doc = scene.export_obj("2024-01-01T00:00:00.000Z").expect("cells exist");
    let per_cell = scene.lattice().shape().base.vertex_count();
    assert_eq!(doc.vertex_count, 9 * per_cell);

    let max_index = 9 * per_cell;
    for line in doc.text.lines().filter(|l| l.starts_with("f ")) {
        for corner in line.split_whitespace().skip(1) {
            let (v, n) = corner.split_once("//").expect("v//vn");
            let v: usize = v.parse().expect("vertex index");
            let n: usize = n.parse().expect("normal index");
            assert!((1..=max_index).contains(&v));
            assert!((1..=max_index).contains(&n));
        }
    }
}
