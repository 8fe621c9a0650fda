mod app;
mod config;
mod customer;
mod error;
mod result;
mod upload;
mod utils;

use app::CapturePlatform;
use config::AppConfig;
use eframe::CreationContext;
use log::error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Capture Platform")
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([520.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Capture Platform",
        options,
        Box::new(move |cc: &CreationContext| Box::new(CapturePlatform::new(cc, config))),
    ) {
        error!("Capture Platform exited with an error: {}", e);
    }
}
