//! Footway Viewer - Application Library
//!
//! Desktop map showing OSM footways colored by difficulty, built on the
//! loader from `footway-lib`.

mod app;
mod logging;

pub use app::FootwayViewerApp;
pub use app::settings::Settings;
pub use logging::setup_logging;

pub const APP_NAME: &str = "Footway Map";

/// Open the main window and run until it is closed.
///
/// Must be called from within a tokio runtime context: fetches are spawned
/// onto it.
pub fn run_native(settings: Settings) -> eframe::Result {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(APP_NAME),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(FootwayViewerApp::new(cc, settings)?))),
    )
}
