use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the daily operation plan is fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Authoritative DOP service, queried with `searchDate`/`searchType`.
    #[serde(default = "default_primary_url")]
    pub primary_url: String,
    /// Cached copy of the plan: an `http(s)://` URL or a local file path.
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
    /// Downlink id sent as `searchType`. Empty = use the receiver's
    /// reported downlink.
    #[serde(default)]
    pub downlink: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// xrit-rx API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Schedule rows shown at once (deployments use 9 or 12).
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    #[serde(default = "default_clock_millis")]
    pub clock_millis: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            fallback_url: default_fallback_url(),
            downlink: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            window_size: default_window_size(),
            refresh_secs: default_refresh_secs(),
            clock_millis: default_clock_millis(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl SourceConfig {
    /// Per-request limit, applied to the primary and the fallback separately.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Upper bound on one whole acquisition. Must outlast a timed-out
    /// primary followed by a full fallback request.
    pub fn acquire_timeout(&self) -> Duration {
        self.timeout() * 2 + Duration::from_secs(1)
    }
}

impl DashboardConfig {
    pub fn window_size(&self) -> usize {
        self.window_size.max(1)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_millis.clamp(50, 1000))
    }
}

fn default_primary_url() -> String {
    "https://nmsc.kma.go.kr/homepage/getDopList.do".to_string()
}

fn default_fallback_url() -> String {
    "http://127.0.0.1:1692/dop.txt".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_api_url() -> String {
    "http://127.0.0.1:1692/api".to_string()
}

fn default_window_size() -> usize {
    12
}

fn default_refresh_secs() -> u64 {
    30
}

fn default_clock_millis() -> u64 {
    500
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path`, writing defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.http.enabled);
        assert_eq!(config.http.port, 8990);
        assert_eq!(config.http.bind_address, "127.0.0.1");
        assert_eq!(config.dashboard.window_size, 12);
        assert!(config.source.primary_url.starts_with("https://"));
        assert!(config.source.downlink.is_empty());
        assert!(Config::config_path().ends_with("xrit-dash/config.toml"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [dashboard]
            window_size = 9

            [source]
            downlink = "LRIT"
            "#,
        )
        .unwrap();
        assert_eq!(config.dashboard.window_size, 9);
        assert_eq!(config.dashboard.refresh_secs, 30);
        assert_eq!(config.source.downlink, "LRIT");
        assert_eq!(config.source.timeout_secs, 10);
        assert!(config.http.enabled);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.dashboard.window_size, 12);

        let mut edited = config.clone();
        edited.dashboard.window_size = 9;
        edited.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().dashboard.window_size, 9);
    }

    #[test]
    fn test_intervals_are_clamped() {
        let d = DashboardConfig {
            window_size: 0,
            refresh_secs: 0,
            clock_millis: 10_000,
            ..DashboardConfig::default()
        };
        assert_eq!(d.window_size(), 1);
        assert_eq!(d.refresh_interval(), Duration::from_secs(1));
        assert_eq!(d.clock_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_acquire_timeout_covers_both_requests() {
        let source = SourceConfig {
            timeout_secs: 1,
            ..SourceConfig::default()
        };
        assert_eq!(source.timeout(), Duration::from_secs(1));
        assert!(source.acquire_timeout() > source.timeout() * 2);
        assert_eq!(SourceConfig::default().acquire_timeout(), Duration::from_secs(21));
    }
}
