mod action;
mod app;
mod app_state;
mod component;
mod components;
mod http;
mod theme;
mod widgets;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use dop_core::clock::SystemClock;
use dop_core::config::Config;
use dop_core::controller::AcquisitionController;
use dop_core::platform;
use dop_core::source::HttpScheduleSource;
use dop_core::status::StatusClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("dash.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("xrit-dash log: {}", log_path.display());

    tracing::info!("xrit-dash starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("config unreadable, using defaults: {}", e);
            Config::default()
        }
    };

    // ── Acquisition controller ───────────────────────────────────────────────
    let source = HttpScheduleSource::from_config(&config.source)?;
    let controller = AcquisitionController::new(
        source,
        config.source.downlink.clone(),
        config.dashboard.window_size(),
        config.source.acquire_timeout(),
    );
    let status_client = StatusClient::new(config.dashboard.api_url.clone(), config.source.timeout())?;

    // ── Snapshot (App → HTTP) and commands (HTTP → App) ──────────────────────
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.state().clone());
    let (api_tx, api_rx) = mpsc::channel::<http::ApiCommand>(16);

    // ── HTTP server ──────────────────────────────────────────────────────────
    if config.http.enabled {
        http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            http::HttpState {
                snapshot: snapshot_rx,
                window_size: config.dashboard.window_size(),
                clock: Arc::new(SystemClock),
                commands: api_tx,
            },
        );
    }

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(config, controller, status_client, snapshot_tx);
    app.run(api_rx).await?;

    Ok(())
}
