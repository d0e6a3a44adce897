use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    controller::SAVE_SUCCEEDED_ALERT, load_settings, render_form_html, ConfigBackend,
    ConfigClient, FormController, NodeCredentials, NodeForm, NodeSeed, UiEffect,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Build, submit and run cluster node configurations")]
struct Cli {
    /// Settings file; defaults to ./node_config.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the nodes described in a TOML or JSON file.
    Save {
        #[arg(long)]
        nodes: PathBuf,
        /// Print the payload without sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Run the platform script on the backend.
    Execute,
    /// Print the last saved config.
    ShowConfig,
    /// Print the output of the last platform run.
    Output,
    /// List the PCI devices the backend reports.
    Devices,
    /// Print the form markup for the given nodes (or a fresh form).
    Render {
        #[arg(long)]
        nodes: Option<PathBuf>,
    },
}

#[derive(Debug, Deserialize)]
struct NodesFile {
    #[serde(default)]
    nodes: Vec<NodeSeed>,
}

fn read_nodes_file(path: &Path) -> Result<Vec<NodeSeed>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read nodes file '{}'", path.display()))?;
    let parsed: NodesFile = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON nodes file '{}'", path.display()))?
    } else {
        toml::from_str(&raw)
            .with_context(|| format!("invalid TOML nodes file '{}'", path.display()))?
    };
    Ok(parsed.nodes)
}

fn build_controller(path: Option<&Path>, credentials: NodeCredentials) -> Result<FormController> {
    let form = match path {
        Some(path) => NodeForm::from_seeds(read_nodes_file(path)?, credentials),
        None => NodeForm::with_credentials(credentials),
    };
    Ok(FormController::new(form))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut settings, settings_warnings) = load_settings(cli.config.as_deref());
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    for warning in settings_warnings {
        tracing::warn!("{warning}");
    }

    let client = ConfigClient::new(&settings.server_url)?;

    match cli.command {
        Command::Save { nodes, dry_run } => {
            let controller = build_controller(Some(&nodes), settings.credentials())?;
            println!("{}", serde_json::to_string_pretty(&controller.save_payload())?);
            if dry_run {
                return Ok(());
            }
            match controller.save(&client).await {
                UiEffect::Alert(text) if text == SAVE_SUCCEEDED_ALERT => println!("{text}"),
                UiEffect::Alert(text) | UiEffect::Navigate(text) => bail!(text),
            }
        }
        Command::Execute => match FormController::default().execute(&client).await {
            Some(UiEffect::Navigate(target)) => {
                println!("redirected to {}", client.resolve(&target)?);
                match client.get_output().await {
                    Ok(output) => print!("{output}"),
                    Err(err) => tracing::warn!("output not available yet: {err}"),
                }
            }
            Some(UiEffect::Alert(text)) => bail!(text),
            None => println!("execution requested"),
        },
        Command::ShowConfig => {
            let payload = client.get_config().await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Output => {
            print!("{}", client.get_output().await?);
        }
        Command::Devices => {
            for device in client.list_pci_devices().await? {
                println!(
                    "{}\t{}\t{}",
                    device.device_id, device.vendor_id, device.device_name
                );
            }
        }
        Command::Render { nodes } => {
            let controller = build_controller(nodes.as_deref(), settings.credentials())?;
            print!("{}", render_form_html(controller.form()));
        }
    }

    Ok(())
}
