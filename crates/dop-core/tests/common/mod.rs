//! In-process stand-ins for the DOP service, the cached copy and the
//! receiver API. Each server binds 127.0.0.1:0 and lives for the test.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

pub const PLAN: &[&str] = &[
    "GK-2A DAILY OPERATION PLAN",
    "TIME(UTC)\tID\tTYPE\tMODE",
    "000000-001000\tABCFD \tFull Disk\tO",
    "001000-001100\tEGMSG\tMessage\tO",
    "001100-002000\tGK2AENH\tExtended NH\tN",
    "120000-121000\tABCFD \tFull Disk\tO",
    "",
    "ABBREVIATIONS:",
    "FD : Full Disk",
];

pub fn plan_text() -> String {
    PLAN.join("\n")
}

/// What a mock endpoint should answer with.
#[derive(Clone)]
pub enum Reply {
    Json(serde_json::Value),
    Text(String),
    Status(StatusCode),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(v) => Json(v).into_response(),
            Reply::Text(t) => t.into_response(),
            Reply::Status(s) => s.into_response(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Query strings of every request received so far.
    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.seen.lock().unwrap().clone()
    }
}

async fn respond(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    state.seen.lock().unwrap().push(query);
    state.reply.clone()
}

/// Serve `reply` on every path in `paths`.
pub async fn serve(paths: &[&str], reply: Reply) -> MockServer {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        reply,
        seen: seen.clone(),
    };
    let mut app = Router::new();
    for path in paths {
        app = app.route(path, get(respond));
    }
    let app = app.with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockServer { addr, seen }
}

/// Accept connections on `path` but answer only after `delay`.
pub async fn serve_stalled(path: &str, delay: Duration) -> MockServer {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hits = seen.clone();
    let app = Router::new().route(
        path,
        get(move |Query(query): Query<HashMap<String, String>>| {
            let hits = hits.clone();
            async move {
                hits.lock().unwrap().push(query);
                tokio::time::sleep(delay).await;
                StatusCode::OK
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockServer { addr, seen }
}

/// An address nothing is listening on.
pub async fn dead_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, path)
}
