use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::load_settings, DirectoryApi, JarnClient};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{theme, JarnApp};

#[derive(Parser, Debug)]
#[command(name = "jarn-gui", about = "Desktop lookup for Jarn (instructor) abbreviations")]
struct Args {
    /// TOML file with `base_url` / `request_timeout_secs`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the configured service base URL.
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let client = JarnClient::new(&settings).context("failed to build directory client")?;
    tracing::info!(base_url = %client.base_url(), "starting desktop gui");
    let api: Arc<dyn DirectoryApi> = Arc::new(client);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, api);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Jarn Nai")
            .with_inner_size([640.0, 860.0])
            .with_min_inner_size([440.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Jarn Nai",
        options,
        Box::new(|cc| {
            theme::apply(&cc.egui_ctx);
            Ok(Box::new(JarnApp::new(cmd_tx, ui_rx, &cc.egui_ctx)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}
