//! Client for the receiver's own status API (xrit-rx `/api`).

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::FetchError;

/// `GET /api`: static receiver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverInfo {
    pub spacecraft: String,
    pub downlink: String,
    pub version: String,
    /// Suggested poll interval for live status, seconds.
    pub interval: u64,
    pub images: bool,
    #[serde(default)]
    pub ignored: Vec<u32>,
}

/// `GET /api/status`: what the demuxer is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub vcid: i64,
    /// Current product progress, 0–100.
    pub progress: u8,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusClient {
    client: reqwest::Client,
    api_url: String,
}

impl StatusClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Transport {
                url: api_url.clone(),
                source,
            })?;
        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn fetch_info(&self) -> Result<ReceiverInfo, FetchError> {
        self.get_json(&self.api_url).await
    }

    pub async fn fetch_live(&self) -> Result<LiveStatus, FetchError> {
        let mut live: LiveStatus = self.get_json(&format!("{}/status", self.api_url)).await?;
        live.progress = live.progress.min(100);
        Ok(live)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        response.json().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
