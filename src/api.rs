use std::sync::{Arc, RwLock};

use chrono::Utc;
use metrics::counter;
use serde::Deserialize;
use shuttle_axum::axum::{
    extract::{Query, State},
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::analyze::Timeframe;
use crate::config::AppConfig;
use crate::engine;
use crate::model::MarketSnapshot;
use crate::present::{cache, CacheStatus, CachedArtifact, GaugeView};
use crate::report::SentimentResult;

pub const CACHE_HEADER: &str = "x-artifact-cache";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    cache: Arc<RwLock<Option<CachedArtifact>>>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    fn cached(&self) -> Option<CachedArtifact> {
        match self.cache.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, entry: Option<CachedArtifact>) {
        match self.cache.write() {
            Ok(mut g) => *g = entry,
            Err(poisoned) => *poisoned.into_inner() = entry,
        }
    }

    /// Current analysis document: cached while fresh, else read from disk,
    /// else the neutral fallback. Disk reads run on the blocking pool.
    pub async fn current(&self) -> (SentimentResult, CacheStatus) {
        let now = Utc::now();
        let ttl = self.config.cache_ttl();
        let cached = self.cached();

        if let Some(c) = cached.as_ref().filter(|c| c.is_fresh(now, ttl)) {
            counter!("artifact_cache_hits_total").increment(1);
            return (c.data.clone(), CacheStatus::Hit);
        }

        let path = self.config.analysis_path();
        let (doc, entry, status) =
            tokio::task::spawn_blocking(move || cache::resolve(cached.as_ref(), &path, now, ttl))
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(target: "api", error = %e, "artifact read task failed");
                    (SentimentResult::neutral_fallback(now), None, CacheStatus::Fallback)
                });

        counter!("artifact_cache_misses_total").increment(1);
        self.store(entry);
        (doc, status)
    }
}

#[derive(Debug, Deserialize)]
struct GaugeQuery {
    tf: Option<String>,
}

pub fn router(state: AppState) -> Router {
    // Raw artifacts for the static dashboard.
    let data = ServeDir::new(&state.config.data_dir);
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/sentiment", get(sentiment))
        .route("/api/gauge", get(gauge))
        .route("/api/analyze", post(analyze))
        .nest_service("/data", data)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn with_cache_header(status: CacheStatus, body: impl IntoResponse) -> Response {
    let mut resp = body.into_response();
    resp.headers_mut().insert(
        HeaderName::from_static(CACHE_HEADER),
        HeaderValue::from_static(status.as_str()),
    );
    resp
}

async fn sentiment(State(state): State<AppState>) -> Response {
    let (doc, status) = state.current().await;
    with_cache_header(status, Json(doc))
}

/// Overall gauge, or one timeframe's with `?tf=1d|5d|1m`.
async fn gauge(State(state): State<AppState>, Query(q): Query<GaugeQuery>) -> Response {
    let tf = match q.tf.as_deref().map(|raw| (raw, Timeframe::parse(raw))) {
        None => None,
        Some((_, Some(tf))) => Some(tf),
        Some((raw, None)) => {
            let msg = format!("unknown timeframe {raw:?}, expected 1d, 5d or 1m");
            return (StatusCode::BAD_REQUEST, msg).into_response();
        }
    };

    let (doc, status) = state.current().await;
    let now = Utc::now();
    let view = match tf {
        Some(tf) => GaugeView::for_timeframe(&doc, tf, now),
        None => GaugeView::from_result(&doc, now),
    };
    with_cache_header(status, Json(view))
}

/// Score a snapshot posted by the caller. Nothing is persisted.
async fn analyze(body: String) -> Result<Json<SentimentResult>, (StatusCode, String)> {
    let snapshot = MarketSnapshot::from_json_str(&body).map_err(|e| {
        tracing::debug!(target: "api", error = ?e, "rejected snapshot body");
        (StatusCode::BAD_REQUEST, format!("{e:#}"))
    })?;
    let result = engine::analyze_now(&snapshot);
    Ok(Json(result))
}
