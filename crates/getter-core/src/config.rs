use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::downloader::DownloadOptions;
use crate::http::{HttpOptions, DEFAULT_USER_AGENT};
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per chunk (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Configuration loaded from `~/.config/getter/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetterConfig {
    /// Number of concurrent chunk workers (and chunks) per download.
    pub workers: usize,
    /// Work queue capacity; defaults to `workers` when absent.
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// TCP connect timeout in seconds (0 = wait for the OS).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Socket read/write timeout in seconds (0 = block indefinitely).
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_io_timeout_secs() -> u64 {
    30
}

impl Default for GetterConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: None,
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            io_timeout_secs: default_io_timeout_secs(),
            retry: None,
        }
    }
}

fn secs(n: u64) -> Option<Duration> {
    (n > 0).then(|| Duration::from_secs(n))
}

impl GetterConfig {
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: secs(self.connect_timeout_secs),
            io_timeout: secs(self.io_timeout_secs),
        }
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            http: self.http_options(),
            retry: self
                .retry
                .as_ref()
                .map(RetryConfig::to_policy)
                .unwrap_or_default(),
            queue_capacity: self.queue_capacity,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("getter")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GetterConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GetterConfig> {
    if !path.exists() {
        let default_cfg = GetterConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: GetterConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = GetterConfig::default();
        assert_eq!(cfg.workers, 4);
        assert_eq!(cfg.user_agent, "getter");
        assert!(cfg.queue_capacity.is_none());
        let opts = cfg.download_options();
        assert_eq!(opts.http.connect_timeout, Some(Duration::from_secs(15)));
        assert_eq!(opts.http.io_timeout, Some(Duration::from_secs(30)));
        assert_eq!(opts.retry, RetryPolicy::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GetterConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GetterConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.workers, cfg.workers);
        assert_eq!(parsed.user_agent, cfg.user_agent);
        assert_eq!(parsed.io_timeout_secs, cfg.io_timeout_secs);
    }

    #[test]
    fn config_toml_minimal_uses_defaults() {
        let cfg: GetterConfig = toml::from_str("workers = 8").unwrap();
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.user_agent, "getter");
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn zero_timeouts_mean_blocking() {
        let toml = r#"
            workers = 2
            connect_timeout_secs = 0
            io_timeout_secs = 0
        "#;
        let cfg: GetterConfig = toml::from_str(toml).unwrap();
        let http = cfg.http_options();
        assert!(http.connect_timeout.is_none());
        assert!(http.io_timeout.is_none());
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            workers = 3
            queue_capacity = 16
            user_agent = "getter-test"

            [retry]
            max_attempts = 5
            base_delay_secs = 0.5
            max_delay_secs = 10
        "#;
        let cfg: GetterConfig = toml::from_str(toml).unwrap();
        let opts = cfg.download_options();
        assert_eq!(opts.queue_capacity, Some(16));
        assert_eq!(opts.http.user_agent, "getter-test");
        assert_eq!(opts.retry.max_attempts, 5);
        assert_eq!(opts.retry.base_delay, Duration::from_millis(500));
        assert_eq!(opts.retry.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.workers, 4);

        fs::write(&path, "workers = 9\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.workers, 9);
    }
}
