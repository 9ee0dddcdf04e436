// src/bin/fetch_data.rs
//! Fetch every source once and write `market-data.json`.

use anyhow::{Context, Result};

use market_sentiment::{config::AppConfig, ingest, logging, store};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cfg = AppConfig::load_default().context("loading config")?;
    let sources = ingest::Sources::live(&cfg)?;

    let report = ingest::fetch_snapshot(&sources).await;
    let path = cfg.snapshot_path();
    store::save_snapshot(&path, &report.snapshot)?;

    if report.all_live() {
        tracing::info!(path = %path.display(), "market data saved");
    } else {
        tracing::warn!(
            path = %path.display(),
            placeholders = ?report.fallbacks,
            "market data saved with substituted sources"
        );
    }
    Ok(())
}
