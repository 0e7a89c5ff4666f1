mod app;
mod color;
mod config;
mod data;
mod page;
mod state;
mod ui;

use app::SoilViewerApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::discover();
    log::info!(
        "Viewing {} (row cap {:?}, {} bins)",
        config.source,
        config.row_cap,
        config.histogram_bins
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NOAA Dataset Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(SoilViewerApp::new(&config)))),
    )
}
