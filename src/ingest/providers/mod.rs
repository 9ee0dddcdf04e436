// src/ingest/providers/mod.rs
pub mod alpha_vantage;
pub mod cnn;
pub mod fred;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageProvider;
pub use cnn::CnnFearGreedProvider;
pub use fred::FredVixProvider;
pub use yahoo::YahooOptionsProvider;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::AppConfig;
use crate::ingest::error::FetchError;
use crate::ingest::retry::{fetch_with_retry, get_json, RetryPolicy};

/// Where a provider reads its payload from.
pub(crate) enum Mode {
    /// Fixed document, used by tests and offline runs.
    Fixture(Value),
    Http {
        url: String,
        client: reqwest::Client,
        policy: RetryPolicy,
    },
}

impl Mode {
    pub(crate) fn http(url: String, client: &reqwest::Client, cfg: &AppConfig) -> Self {
        Mode::Http {
            url,
            client: client.clone(),
            policy: RetryPolicy::from_config(cfg),
        }
    }

    pub(crate) async fn load(&self, name: &'static str) -> Result<Value, FetchError> {
        match self {
            Mode::Fixture(v) => Ok(v.clone()),
            Mode::Http {
                url,
                client,
                policy,
            } => fetch_with_retry(*policy, name, || get_json(client, url)).await,
        }
    }
}

/// Shared client for all live providers.
pub fn http_client(cfg: &AppConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(cfg.request_timeout())
        .user_agent(concat!("market-sentiment-gauge/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")
}

/// Prefix `url` with the configured proxy, if any.
pub(crate) fn proxied(cfg: &AppConfig, url: &str) -> String {
    let proxy = cfg.cors_proxy.trim();
    if proxy.is_empty() {
        url.to_string()
    } else {
        format!("{proxy}{url}")
    }
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Accept both JSON numbers and numeric strings ("12.34").
pub(crate) fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite())
}
