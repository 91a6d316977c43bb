//! Application entry point for the attractor grid viewer.
//!
//! This binary sets up logging and eframe/egui, then hands all interaction
//! and drawing to [`Viewer`].

mod render;
mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes through `env_logger`; set `RUST_LOG=debug` to see lattice
/// rebuilds and config changes.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Attractor Grid",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()))),
    )
}
