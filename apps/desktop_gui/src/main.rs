use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::load_settings;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{NodeConfigApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Edit cluster node configuration and run the platform script")]
struct Args {
    /// Settings file; defaults to ./node_config.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (mut settings, settings_warnings) = load_settings(args.config.as_deref());
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    for warning in settings_warnings {
        tracing::warn!("{warning}");
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Node Configuration")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    let startup = StartupConfig { settings };
    eframe::run_native(
        "Node Configuration",
        options,
        Box::new(move |_cc| Ok(Box::new(NodeConfigApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run desktop GUI: {err}"))?;

    Ok(())
}
