mod app;
mod color;
mod config;
mod state;
mod ui;

use app::FsnDashboardApp;
use clap::Parser;
use config::Cli;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!(
        "fsn-dashboard v{} (data: {}, cache ttl: {}s)",
        env!("CARGO_PKG_VERSION"),
        cli.data.display(),
        cli.cache_ttl
    );

    let mut state = AppState::new(&cli);
    state.open(&cli.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FSN KPI Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(FsnDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
