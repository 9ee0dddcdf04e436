// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use crate::store::{ANALYSIS_FILE, SNAPSHOT_FILE};

pub const ENV_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/sentiment.toml";

/// Upper bound for the refresh interval and the artifact cache TTL.
pub const MAX_INTERVAL_SECS: u64 = 86_400;
const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_BACKOFF_MS: u64 = 60_000;

fn default_data_dir() -> PathBuf {
    PathBuf::from("public/data")
}
fn default_key() -> String {
    "ENV".to_string()
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    2_000
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_refresh_interval_secs() -> u64 {
    300
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_cors_proxy() -> String {
    "https://api.allorigins.win/raw?url=".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where `market-data.json` and `sentiment-analysis.json` live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// "ENV" means: read from ALPHA_VANTAGE_KEY (falls back to "demo").
    #[serde(default = "default_key")]
    pub alpha_vantage_key: String,
    /// "ENV" means: read from FRED_API_KEY (falls back to "demo").
    #[serde(default = "default_key")]
    pub fred_api_key: String,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Linear backoff base: attempt i waits `backoff * (i + 1)`.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Freshness window for the served artifact.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Prefix for sources that need a CORS proxy (CNN, Yahoo). Empty disables it.
    #[serde(default = "default_cors_proxy")]
    pub cors_proxy: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut cfg = Self {
            data_dir: default_data_dir(),
            alpha_vantage_key: default_key(),
            fred_api_key: default_key(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cors_proxy: default_cors_proxy(),
        };
        cfg.finish();
        cfg
    }
}

impl AppConfig {
    /// Load from an explicit TOML path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $SENTIMENT_CONFIG_PATH
    /// 2) config/sentiment.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let toml_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        Ok(Self::default())
    }

    pub fn parse(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.finish();
        Ok(cfg)
    }

    /// Resolve "ENV" keys and sanitize out-of-range values.
    fn finish(&mut self) {
        self.alpha_vantage_key = resolve_key(&self.alpha_vantage_key, "ALPHA_VANTAGE_KEY");
        self.fred_api_key = resolve_key(&self.fred_api_key, "FRED_API_KEY");

        if !(1..=10).contains(&self.retry_attempts) {
            self.retry_attempts = default_retry_attempts();
        }
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.retry_backoff_ms > MAX_BACKOFF_MS {
            self.retry_backoff_ms = default_retry_backoff_ms();
        }
        if !(10..=MAX_INTERVAL_SECS).contains(&self.refresh_interval_secs) {
            self.refresh_interval_secs = default_refresh_interval_secs();
        }
        if !(1..=MAX_INTERVAL_SECS).contains(&self.cache_ttl_secs) {
            self.cache_ttl_secs = default_cache_ttl_secs();
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    pub fn analysis_path(&self) -> PathBuf {
        self.data_dir.join(ANALYSIS_FILE)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn cache_ttl(&self) -> TimeDelta {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or_else(|| TimeDelta::seconds(default_cache_ttl_secs() as i64))
    }
}

fn resolve_key(raw: &str, env_name: &str) -> String {
    let t = raw.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("env") {
        return env::var(env_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "demo".to_string());
    }
    t.to_string()
}
