mod app;
mod cli;
mod color;
mod data;
mod error;
mod lunar;
mod state;
mod ui;
mod worker;

use anyhow::Result;
use app::NeoDashboardApp;
use clap::Parser;
use cli::{Cli, Command, Config, ExportArgs};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    match &cli.command {
        Some(Command::Export(args)) => export(&config, args),
        None => run_gui(config),
    }
}

fn run_gui(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NEO Dashboard – Close Approaches",
        options,
        Box::new(|cc| Ok(Box::new(NeoDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}

/// Headless pipeline: fetch → derive → filter → CSV.
fn export(config: &Config, args: &ExportArgs) -> Result<()> {
    let dataset = worker::load_dataset(config)?;
    let bounds = args.bounds(dataset.date_range());
    let partition = data::filter::partition(&dataset, &bounds);
    let summary = data::summary::Summary::of(&dataset, &partition);

    log::info!("{} (source: {})", summary.caption(), dataset.source);
    let rows = if args.excluded {
        &partition.excluded
    } else {
        &partition.kept
    };
    data::export::export_csv(&args.out, &dataset, rows)?;
    println!(
        "{}; wrote {} rows to {}",
        summary.caption(),
        rows.len(),
        args.out.display()
    );
    Ok(())
}
