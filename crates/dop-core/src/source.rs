//! Schedule source client: primary remote DOP service, one cached fallback.
//!
//! No retry loop and no backoff. A failure on both paths surfaces
//! immediately so the operator can retry by hand.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::schedule::Provenance;

/// Raw DOP lines plus the path that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub lines: Vec<String>,
    pub provenance: Provenance,
}

/// Anything that can produce today's raw DOP text.
#[async_trait]
pub trait ScheduleFetch: Send + Sync {
    async fn acquire(&self, date_stamp: &str, downlink: &str) -> Result<Acquired, FetchError>;
}

/// Primary service response: `{ "data": [line, ...] }`.
#[derive(Debug, Deserialize)]
struct DopResponse {
    data: Vec<String>,
}

/// reqwest-backed source.
///
/// `fallback` may be an `http(s)://` URL or a path to a local text file.
#[derive(Debug, Clone)]
pub struct HttpScheduleSource {
    client: reqwest::Client,
    primary_url: String,
    fallback: String,
}

impl HttpScheduleSource {
    pub fn new(
        primary_url: impl Into<String>,
        fallback: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let primary_url = primary_url.into();
        let client = reqwest::Client::builder()
            .user_agent(concat!("xrit-dash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Transport {
                url: primary_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            primary_url,
            fallback: fallback.into(),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::new(
            config.primary_url.clone(),
            config.fallback_url.clone(),
            config.timeout(),
        )
    }

    async fn fetch_primary(
        &self,
        date_stamp: &str,
        downlink: &str,
    ) -> Result<Vec<String>, FetchError> {
        let url = &self.primary_url;
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(&[("searchDate", date_stamp), ("searchType", downlink)])
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: response.status(),
            });
        }

        let body: DopResponse = response.json().await.map_err(|e| FetchError::Body {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(body.data)
    }

    async fn fetch_fallback(&self) -> Result<Vec<String>, FetchError> {
        let source = &self.fallback;
        let text = if source.starts_with("http://") || source.starts_with("https://") {
            let response = self
                .client
                .get(source)
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    url: source.clone(),
                    source: e,
                })?;
            if !response.status().is_success() {
                return Err(FetchError::Status {
                    url: source.clone(),
                    status: response.status(),
                });
            }
            response.text().await.map_err(|e| FetchError::Body {
                url: source.clone(),
                reason: e.to_string(),
            })?
        } else {
            let path = PathBuf::from(source);
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| FetchError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?
        };
        Ok(text.lines().map(str::to_string).collect())
    }
}

#[async_trait]
impl ScheduleFetch for HttpScheduleSource {
    async fn acquire(&self, date_stamp: &str, downlink: &str) -> Result<Acquired, FetchError> {
        let primary = match self.fetch_primary(date_stamp, downlink).await {
            Ok(lines) => {
                info!(
                    "[dop] primary source returned {} lines for {} {}",
                    lines.len(),
                    date_stamp,
                    downlink
                );
                return Ok(Acquired {
                    lines,
                    provenance: Provenance::Online,
                });
            }
            Err(e) => {
                warn!("[dop] primary source failed: {}", e);
                e
            }
        };

        match self.fetch_fallback().await {
            Ok(lines) => {
                info!(
                    "[dop] cached fallback {} returned {} lines",
                    self.fallback,
                    lines.len()
                );
                Ok(Acquired {
                    lines,
                    provenance: Provenance::Offline,
                })
            }
            Err(fallback) => {
                warn!("[dop] cached fallback failed: {}", fallback);
                Err(FetchError::Exhausted {
                    primary: Box::new(primary),
                    fallback: Box::new(fallback),
                })
            }
        }
    }
}
