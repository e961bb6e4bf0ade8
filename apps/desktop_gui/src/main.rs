use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{load_settings, AssistantClient, HttpAssistantClient};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::events::UiEvent;
use ui::AssistantApp;

const APP_TITLE: &str = "Healthcare Helper";

#[derive(Parser, Debug)]
#[command(about = "Desktop chat for insurance questions and document analysis")]
struct Args {
    /// Overrides the configured assistant service URL.
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let client = HttpAssistantClient::from_settings(&settings)?;
    let service_url = client.base_url().to_string();
    tracing::info!(base_url = %service_url, "assistant client ready");
    let client: Arc<dyn AssistantClient> = Arc::new(client);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    let _worker = runtime::launch(client, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(AssistantApp::new(cmd_tx, ui_rx, service_url)))),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}
