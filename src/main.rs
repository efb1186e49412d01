mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::anyhow;
use app::WellLogApp;
use clap::Parser;
use config::{Cli, DashboardConfig};
use data::context::DataContext;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from(Cli::parse());

    // No window without data.
    let context = match DataContext::load(&config.source, config.max_depth) {
        Ok(context) => context,
        Err(e) => {
            log::error!("Startup load failed: {e:#}");
            return Err(e);
        }
    };
    let state = AppState::new(context, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 1000.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Log quality visualisation",
        options,
        Box::new(|_cc| Ok(Box::new(WellLogApp::new(state)))),
    )
    .map_err(|e| anyhow!("running viewer: {e}"))
}
