mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{dead_url, serve, Reply};
use dop_core::error::FetchError;
use dop_core::status::StatusClient;

#[tokio::test]
async fn fetches_receiver_info_and_live_status() {
    let info = serve(
        &["/api"],
        Reply::Json(serde_json::json!({
            "spacecraft": "GK-2A",
            "downlink": "HRIT",
            "version": "1.3",
            "interval": 2,
            "images": true,
            "ignored": [4]
        })),
    )
    .await;
    let client = StatusClient::new(info.url("/api"), Duration::from_secs(2)).unwrap();
    let got = client.fetch_info().await.unwrap();
    assert_eq!(got.downlink, "HRIT");
    assert_eq!(got.interval, 2);

    let live = serve(
        &["/api/status"],
        Reply::Json(serde_json::json!({ "vcid": 0, "progress": 250, "image": "IMG_FD_001.jpg" })),
    )
    .await;
    let client = StatusClient::new(live.url("/api"), Duration::from_secs(2)).unwrap();
    let status = client.fetch_live().await.unwrap();
    assert_eq!(status.vcid, 0);
    assert_eq!(status.progress, 100);
    assert_eq!(status.image.as_deref(), Some("IMG_FD_001.jpg"));
}

#[tokio::test]
async fn receiver_errors_are_typed() {
    let down = serve(&["/api/status"], Reply::Status(StatusCode::BAD_GATEWAY)).await;
    let client = StatusClient::new(down.url("/api"), Duration::from_secs(2)).unwrap();
    assert!(matches!(
        client.fetch_live().await,
        Err(FetchError::Status { .. })
    ));

    let client = StatusClient::new(dead_url("/api").await, Duration::from_secs(2)).unwrap();
    let err = client.fetch_info().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert!(err.summary().ends_with("unreachable"));
}
