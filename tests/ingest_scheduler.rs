// tests/ingest_scheduler.rs
//
// One refresh cycle end to end: sources -> snapshot artifact -> analysis
// artifact, plus the metrics it leaves behind on /metrics.

use async_trait::async_trait;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use tower::ServiceExt as _;

use market_sentiment::ingest::error::FetchError;
use market_sentiment::ingest::scheduler::refresh_once;
use market_sentiment::ingest::types::SourceProvider;
use market_sentiment::ingest::Sources;
use market_sentiment::metrics::Metrics;
use market_sentiment::model::{IndicatorSeries, OptionsRatio};
use market_sentiment::{store, AppConfig};

struct Offline;

#[async_trait]
impl SourceProvider for Offline {
    type Output = IndicatorSeries;
    async fn fetch_latest(&self) -> Result<IndicatorSeries, FetchError> {
        Err(FetchError::Empty("offline"))
    }
    fn name(&self) -> &'static str {
        "offline"
    }
}

struct OfflineOptions;

#[async_trait]
impl SourceProvider for OfflineOptions {
    type Output = OptionsRatio;
    async fn fetch_latest(&self) -> Result<OptionsRatio, FetchError> {
        Err(FetchError::Empty("offline"))
    }
    fn name(&self) -> &'static str {
        "offline_options"
    }
}

fn offline_sources() -> Sources {
    Sources {
        fear_greed: Box::new(Offline),
        spy: Box::new(Offline),
        qqq: Box::new(Offline),
        iwm: Box::new(Offline),
        vix: Box::new(Offline),
        spy_options: Box::new(OfflineOptions),
        qqq_options: Box::new(OfflineOptions),
        iwm_options: Box::new(OfflineOptions),
    }
}

#[tokio::test]
async fn refresh_writes_both_artifacts_and_records_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = AppConfig::default();
    cfg.data_dir = dir.path().join("public/data");

    let metrics = Metrics::init(&cfg).expect("metrics recorder");

    let result = refresh_once(&cfg, &offline_sources())
        .await
        .expect("refresh cycle");

    let snap = store::load_snapshot(&cfg.snapshot_path()).unwrap();
    assert!(snap.generated_at.is_some());
    assert_eq!(snap.options.missing_count(), 3);

    let saved = store::load_result(&cfg.analysis_path()).unwrap();
    assert_eq!(saved, result);
    assert_eq!(saved.overall.confidence, 70);

    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = metrics.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    for name in [
        "analysis_runs_total",
        "analysis_last_score",
        "fetch_source_fallback_total",
        "artifact_cache_ttl_secs",
    ] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
}
