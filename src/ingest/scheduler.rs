// src/ingest/scheduler.rs
use std::sync::Arc;

use anyhow::Result;
use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::engine;
use crate::ingest::{fetch_snapshot, Sources};
use crate::report::SentimentResult;
use crate::store;

/// One full cycle: fetch, persist the snapshot, analyze, persist the result.
pub async fn refresh_once(cfg: &AppConfig, sources: &Sources) -> Result<SentimentResult> {
    let report = fetch_snapshot(sources).await;
    store::save_snapshot(&cfg.snapshot_path(), &report.snapshot)?;

    let result = engine::analyze_now(&report.snapshot);
    store::save_result(&cfg.analysis_path(), &result)?;

    counter!("analysis_runs_total").increment(1);
    gauge!("analysis_last_score").set(f64::from(result.overall.score));
    gauge!("analysis_last_run_ts").set(result.last_analyzed.timestamp() as f64);

    tracing::info!(
        target: "fetch",
        score = result.overall.score,
        label = %result.overall.label,
        fallbacks = report.fallbacks.len(),
        "refresh complete"
    );
    Ok(result)
}

/// Spawn the periodic refresh loop. The first tick fires immediately.
pub fn spawn_refresh_task(cfg: Arc<AppConfig>, sources: Arc<Sources>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.refresh_interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = refresh_once(&cfg, &sources).await {
                tracing::warn!(
                    target: "fetch",
                    error = ?e,
                    "refresh failed; keeping previous artifacts"
                );
            }
        }
    })
}
