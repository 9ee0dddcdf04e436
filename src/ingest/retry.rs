// src/ingest/retry.rs
//! "First success or exhaust N attempts" with linear backoff.

use std::future::Future;
use std::time::Duration;

use metrics::counter;
use serde_json::Value;

use crate::config::AppConfig;
use crate::ingest::error::FetchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            attempts: cfg.retry_attempts,
            backoff: cfg.retry_backoff(),
        }
    }

    /// Delay after the failed attempt with zero-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt.saturating_add(1))
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
pub async fn fetch_with_retry<T, F, Fut>(
    policy: RetryPolicy,
    what: &'static str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 0u32;
    loop {
        counter!("fetch_attempts_total", "source" => what).increment(1);
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempt += 1;
                tracing::warn!(
                    target: "fetch",
                    source = what,
                    attempt,
                    error = %e,
                    "fetch attempt failed"
                );
                if attempt >= attempts {
                    return Err(FetchError::Exhausted {
                        attempts,
                        last: Box::new(e),
                    });
                }
                tokio::time::sleep(policy.delay_for(attempt - 1)).await;
            }
        }
    }
}

/// GET a JSON document; any non-2xx status is an error.
pub async fn get_json(http: &reqwest::Client, url: &str) -> Result<Value, FetchError> {
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: redact(url),
        });
    }
    Ok(resp.json::<Value>().await?)
}

/// Drop query-string secrets before a URL ends up in logs.
fn redact(url: &str) -> String {
    match url.split_once("api_key=").or_else(|| url.split_once("apikey=")) {
        Some((head, _)) => format!("{head}<redacted>"),
        None => url.to_string(),
    }
}
