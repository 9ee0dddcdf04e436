//! Market Sentiment Gauge: server entrypoint.
//! Boots the Axum HTTP server, the periodic refresh task, and `/metrics`.

use std::sync::Arc;

use market_sentiment::{
    api::{self, AppState},
    config::AppConfig,
    ingest::{scheduler, Sources},
    logging,
    metrics::Metrics,
};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cfg = Arc::new(AppConfig::load_default()?);
    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        refresh_secs = cfg.refresh_interval_secs,
        "config loaded"
    );

    let metrics = Metrics::init(&cfg)?;
    let sources = Arc::new(Sources::live(&cfg)?);
    scheduler::spawn_refresh_task(cfg.clone(), sources);

    let router = api::router(AppState::new(cfg)).merge(metrics.router());
    Ok(router.into())
}
