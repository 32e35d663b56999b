mod app;
mod charts;
mod color;
mod config;
mod dashboard;
mod data;
mod error;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env()?;
    log::info!(
        "Reading census data from {} and coordinates from {}",
        config.census_path.display(),
        config.coordinates_path.display()
    );

    let dataset = data::loader::load_dataset(&config.census_path, &config.coordinates_path)
        .context("loading housing data")
        .inspect_err(|e| log::error!("{e:#}"))?;
    let state = AppState::new(dataset, &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "San Francisco Housing Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the intro image.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("eframe: {e}"))
}
