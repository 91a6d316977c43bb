//! Interactive attractor grid viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`GridScene`] and implements
//! [`eframe::App`] to edit its configuration, drive the attractor with the
//! pointer and export the lattice as OBJ.

use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::Context;
use eframe::App;
use glam::Vec2;
use grid_core::{
    camera::Viewport,
    color::Rgb,
    config::{ConfigField, GridConfig, MorphMode},
    export::{export_file_name, iso_timestamp},
    scene::GridScene,
};
use rand::rng;

use crate::render;

/// Scroll distance in points that zooms by a factor of `e`.
const ZOOM_SCROLL_SCALE: f32 = 500.0;

/// Main application state for the interactive viewer.
///
/// The per-frame update is:
/// 1. Build the panels; config edits are forwarded to
///    [`GridScene::apply_change`].
/// 2. Feed pointer input to the scene (attractor drag) or the camera (orbit
///    and zoom).
/// 3. Call [`GridScene::frame`], which solves only if something changed.
/// 4. Paint the scene.
///
/// ### Fields
/// - `scene` - Lattice, attractor, camera and scheduler.
/// - `rng` - Random number generator for scattering the attractor.
/// - `gesture_grabbed` - Whether the current pointer gesture started on the
///   marker; such a gesture never orbits, even after the drag was cancelled.
/// - `status` - Last message shown in the status bar.
/// - `last_export` - Path of the most recent successful export.
pub struct Viewer {
    scene: GridScene,
    rng: rand::rngs::ThreadRng,
    gesture_grabbed: bool,
    status: String,
    last_export: Option<PathBuf>,
}

impl Viewer {
    /// Creates a viewer over a default 12x12 grid.
    pub fn new() -> Self {
        Self {
            scene: GridScene::default(),
            rng: rng(),
            gesture_grabbed: false,
            status: String::from("Drag the yellow sphere to move the attractor"),
            last_export: None,
        }
    }

    /// Restores the default configuration and rebuilds the lattice.
    ///
    /// The attractor and camera are left where they are.
    fn reset_config(&mut self) {
        self.scene.reset_config(GridConfig::default());
        self.status = String::from("Configuration reset");
    }

    fn scatter_attractor(&mut self) {
        self.scene.scatter_attractor(&mut self.rng);
        let p = self.scene.attractor().position;
        self.status = format!("Attractor moved to ({:.2}, {:.2})", p.x, p.z);
    }

    /// Asks for a target file and writes the current lattice there.
    fn export_with_dialog(&mut self) {
        let timestamp = iso_timestamp(SystemTime::now());
        let Some(doc) = self.scene.export_obj(&timestamp) else {
            self.report_export(Ok(None));
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(export_file_name(&timestamp))
            .add_filter("Wavefront OBJ", &["obj"])
            .save_file()
        else {
            log::debug!("export cancelled");
            return;
        };

        let result = std::fs::write(&path, &doc.text)
            .with_context(|| format!("failed to write {}", path.display()))
            .map(|()| {
                log::info!(
                    "exported {} vertices / {} faces to {}",
                    doc.vertex_count,
                    doc.face_count,
                    path.display()
                );
                Some(path)
            });
        self.report_export(result);
    }

    /// Writes the current lattice into the working directory without asking.
    fn quick_export(&mut self) {
        let result = self
            .scene
            .write_export(Path::new("."), SystemTime::now())
            .context("failed to export into the working directory");
        self.report_export(result);
    }

    fn report_export(&mut self, result: anyhow::Result<Option<PathBuf>>) {
        match result {
            Ok(Some(path)) => {
                self.status = format!("Exported {}", path.display());
                self.last_export = Some(path);
            }
            Ok(None) => self.status = String::from("Nothing to export"),
            Err(err) => {
                log::error!("{err:#}");
                self.status = format!("Export failed: {err:#}");
            }
        }
    }

    /// Helper to draw a labeled [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: RangeInclusive<N>,
        speed: f64,
    ) -> egui::Response {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
        })
        .inner
    }

    /// Helper to draw a labeled color button; updates `color` in place.
    fn labeled_color(ui: &mut egui::Ui, label: &str, color: &mut Rgb) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            let mut rgb = color.to_array();
            let changed = ui.color_edit_button_rgb(&mut rgb).changed();
            if changed {
                *color = Rgb::from_array(rgb);
            }
            changed
        })
        .inner
    }

    /// Whether an edit of a structural field is complete.
    ///
    /// Drags apply once released; typed or stepped edits apply immediately.
    fn edit_finished(response: &egui::Response) -> bool {
        response.drag_stopped() || (response.changed() && !response.dragged())
    }

    /// Builds the top panel UI (export, attractor, reset).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("💾 Export OBJ…").clicked() {
                    self.export_with_dialog();
                }

                if ui.button("Quick export").clicked() {
                    self.quick_export();
                }

                ui.separator();

                if ui.button("Scatter attractor").clicked() {
                    self.scatter_attractor();
                }

                if ui.button("Frame grid").clicked() {
                    let extent = self.scene.ground.half_extent;
                    self.scene.camera.frame_extent(extent);
                }

                if ui.button("Reset config").clicked() {
                    self.reset_config();
                }
            });
        });
    }

    /// Builds the bottom status bar (cells, attractor, scheduler state).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(path) = &self.last_export {
                        ui.label(format!("last export = {}", path.display()));
                        ui.separator();
                    }
                    ui.label(format!("drag = {:?}", self.scene.drag_state()));
                    ui.label(if self.scene.is_dirty() { "dirty" } else { "idle" });
                    ui.separator();
                    let p = self.scene.attractor().position;
                    ui.label(format!("attractor = ({:.2}, {:.2})", p.x, p.z));
                    ui.label(format!("cells = {}", self.scene.lattice().len()));
                });
            });
        });
    }

    /// Builds the right-hand configuration panel.
    ///
    /// Edits are collected first and forwarded to the scene afterwards.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        let mut changes = Vec::new();

        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                let cfg = &mut self.scene.config;
                ui.heading("Config");

                ui.separator();
                ui.label("Lattice");
                let r = Self::labeled_drag(ui, "count x:", &mut cfg.count_x, 1..=64, 0.2);
                if Self::edit_finished(&r) {
                    changes.push(ConfigField::CountX);
                }
                let r = Self::labeled_drag(ui, "count y:", &mut cfg.count_y, 1..=64, 0.2);
                if Self::edit_finished(&r) {
                    changes.push(ConfigField::CountY);
                }
                let r = Self::labeled_drag(ui, "spacing:", &mut cfg.spacing, 0.1..=20.0, 0.05);
                if Self::edit_finished(&r) {
                    changes.push(ConfigField::Spacing);
                }

                ui.separator();
                ui.label("Size");
                let r = Self::labeled_drag(ui, "min size:", &mut cfg.min_size, 0.0..=10.0, 0.02);
                if r.changed() {
                    changes.push(ConfigField::MinSize);
                }
                let r = Self::labeled_drag(ui, "max size:", &mut cfg.max_size, 0.0..=10.0, 0.02);
                if r.changed() {
                    changes.push(ConfigField::MaxSize);
                }

                ui.separator();
                ui.label("Rotation (degrees)");
                let degrees = -360.0..=360.0;
                let r = Self::labeled_drag(ui, "min:", &mut cfg.min_rotation, degrees.clone(), 1.0);
                if r.changed() {
                    changes.push(ConfigField::MinRotation);
                }
                let r = Self::labeled_drag(ui, "max:", &mut cfg.max_rotation, degrees, 1.0);
                if r.changed() {
                    changes.push(ConfigField::MaxRotation);
                }

                ui.separator();
                ui.label("Color");
                if Self::labeled_color(ui, "close:", &mut cfg.close_color) {
                    changes.push(ConfigField::CloseColor);
                }
                if Self::labeled_color(ui, "far:", &mut cfg.far_color) {
                    changes.push(ConfigField::FarColor);
                }

                ui.separator();
                ui.label("Morph target");
                ui.horizontal(|ui| {
                    let absolute = ui
                        .radio_value(&mut cfg.morph_mode, MorphMode::Absolute, "Absolute")
                        .changed();
                    let relative = ui
                        .radio_value(&mut cfg.morph_mode, MorphMode::Relative, "Relative")
                        .changed();
                    if absolute || relative {
                        changes.push(ConfigField::MorphMode);
                    }
                });

                ui.separator();
                if ui.checkbox(&mut cfg.shadows, "Shadows").changed() {
                    changes.push(ConfigField::Shadows);
                }
            });

        for field in changes {
            self.scene.apply_change(field);
        }
    }

    /// Builds the central panel where the grid is drawn and the pointer is
    /// handled.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_rgb(0x16, 0x18, 0x1d)))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let viewport = Viewport::new(rect.width(), rect.height());
                let local = |p: egui::Pos2| Vec2::new(p.x - rect.min.x, p.y - rect.min.y);

                if response.drag_started() {
                    let origin = ctx
                        .input(|i| i.pointer.press_origin())
                        .or(response.interact_pointer_pos());
                    if let Some(origin) = origin {
                        self.gesture_grabbed = self.scene.pointer_down(local(origin), viewport);
                    }
                }

                if response.dragged() {
                    if self.scene.is_dragging() {
                        match response.interact_pointer_pos() {
                            Some(p) if rect.contains(p) => {
                                self.scene.pointer_move(local(p), viewport);
                            }
                            _ => self.scene.pointer_leave(),
                        }
                    } else if !self.gesture_grabbed {
                        let delta = response.drag_delta();
                        self.scene.camera.orbit(Vec2::new(delta.x, delta.y));
                    }
                }

                if response.drag_stopped() {
                    self.scene.pointer_up();
                    self.gesture_grabbed = false;
                }

                if response.hovered() {
                    let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
                    if scroll != 0.0 {
                        self.scene.camera.zoom((-scroll / ZOOM_SCROLL_SCALE).exp());
                    }
                }

                self.scene.frame();

                let painter = ui.painter_at(rect);
                render::paint_scene(&painter, rect, &self.scene);
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
