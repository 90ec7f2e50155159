#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

fn main() -> eframe::Result<()> {
    let settings = projed::Settings::load();
    projed::init_logging(Some(settings.log_level.as_str()));
    tracing::info!(version = projed::core_version(), "starting ProJED");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("ProJED"),
        ..Default::default()
    };

    eframe::run_native(
        "ProJED",
        options,
        Box::new(|cc| Ok(Box::new(app::ProjedApp::new(cc, settings)))),
    )
}
