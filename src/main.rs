mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::TopSongsApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();
    // No window without data: a load failure ends the program here.
    let table = data::loader::load_file(&config.dataset_path)
        .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;
    let state = AppState::new(config, table);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Top 50 Songs of 2020",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the remote png/jpg images.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(TopSongsApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
