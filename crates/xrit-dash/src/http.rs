//! Read-only schedule API plus a retry trigger.
//!
//! Handlers never touch the controller: they read the latest
//! `AcquisitionState` from a watch channel and send retry requests to the
//! app's event loop.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::{get, post}, Router};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use dop_core::clock::{Clock, ClockReading};
use dop_core::schedule::{time_stamp, AcquisitionState};
use dop_core::window::ScheduleWindow;

/// Requests from the API to the app's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    Retry,
}

#[derive(Clone)]
pub struct HttpState {
    pub snapshot: watch::Receiver<AcquisitionState>,
    pub window_size: usize,
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub commands: mpsc::Sender<ApiCommand>,
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/schedule", get(get_schedule))
        .route("/api/schedule/retry", post(retry))
        .route("/api/clock", get(get_clock))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state: HttpState,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app = router(state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn get_schedule(State(state): State<HttpState>) -> Json<ScheduleWindow> {
    let now = time_stamp(&state.clock.now());
    let window = {
        let current = state.snapshot.borrow();
        ScheduleWindow::from_state(&current, &now, state.window_size)
    };
    Json(window)
}

async fn get_clock(State(state): State<HttpState>) -> Json<ClockReading> {
    Json(ClockReading::at(state.clock.now()))
}

async fn retry(State(state): State<HttpState>) -> StatusCode {
    info!("HTTP API: schedule retry");
    if state.commands.send(ApiCommand::Retry).await.is_err() {
        error!("Failed to forward retry request");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::ACCEPTED
}
