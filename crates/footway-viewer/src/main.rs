#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use footway_viewer::Settings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_cli();
    footway_viewer::setup_logging();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    footway_viewer::run_native(settings)?;
    Ok(())
}
