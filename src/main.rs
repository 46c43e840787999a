#![cfg_attr(windows, windows_subsystem = "windows")]

use anyhow::anyhow;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod controller;
mod error;
mod models;
mod preview;
mod submission;
mod utils;

use app::ResizeFormApp;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::load();
    tracing::info!(
        unit = config.default_unit.symbol(),
        output_dir = %config.output_dir().display(),
        "starting image resize form"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 640.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Image Resizer",
        options,
        Box::new(move |_| Box::new(ResizeFormApp::new(&config))),
    )
    .map_err(|e| anyhow!("Application error: {}", e))
}
