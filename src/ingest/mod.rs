// src/ingest/mod.rs
//! Data acquisition: eight independent sources fetched concurrently, each
//! failure replaced locally so the result is always a complete snapshot.

pub mod error;
pub mod placeholder;
pub mod providers;
pub mod retry;
pub mod scheduler;
pub mod types;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AppConfig;
use crate::ingest::error::FetchError;
use crate::ingest::providers::{
    http_client, AlphaVantageProvider, CnnFearGreedProvider, FredVixProvider, YahooOptionsProvider,
};
use crate::ingest::types::{OptionsProvider, SeriesProvider, SourceOutcome};
use crate::model::{IndicatorSeries, MarketSnapshot, OptionsRatio, OptionsSnapshot, Symbol};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_attempts_total", "HTTP attempts made against upstream sources.");
        describe_counter!(
            "fetch_source_fallback_total",
            "Sources replaced by a placeholder (or dropped, for options) after failing."
        );
        describe_counter!("analysis_runs_total", "Completed fetch + analyze cycles.");
        describe_gauge!("analysis_last_score", "Overall score of the latest analysis.");
        describe_gauge!("analysis_last_run_ts", "Unix ts of the latest analysis.");
        describe_counter!("artifact_cache_hits_total", "Sentiment requests served from cache.");
        describe_counter!(
            "artifact_cache_misses_total",
            "Sentiment requests that had to read the artifact."
        );
    });
}

/// The full set of upstream sources.
pub struct Sources {
    pub fear_greed: Box<SeriesProvider>,
    pub spy: Box<SeriesProvider>,
    pub qqq: Box<SeriesProvider>,
    pub iwm: Box<SeriesProvider>,
    pub vix: Box<SeriesProvider>,
    pub spy_options: Box<OptionsProvider>,
    pub qqq_options: Box<OptionsProvider>,
    pub iwm_options: Box<OptionsProvider>,
}

impl Sources {
    /// Live HTTP providers configured from `cfg`.
    pub fn live(cfg: &AppConfig) -> Result<Self> {
        let http = http_client(cfg)?;
        Ok(Self {
            fear_greed: Box::new(CnnFearGreedProvider::new(cfg, &http)),
            spy: Box::new(AlphaVantageProvider::new(Symbol::Spy, cfg, &http)),
            qqq: Box::new(AlphaVantageProvider::new(Symbol::Qqq, cfg, &http)),
            iwm: Box::new(AlphaVantageProvider::new(Symbol::Iwm, cfg, &http)),
            vix: Box::new(FredVixProvider::new(cfg, &http)),
            spy_options: Box::new(YahooOptionsProvider::new(Symbol::Spy, cfg, &http)),
            qqq_options: Box::new(YahooOptionsProvider::new(Symbol::Qqq, cfg, &http)),
            iwm_options: Box::new(YahooOptionsProvider::new(Symbol::Iwm, cfg, &http)),
        })
    }
}

/// Raw per-branch results, before any substitution.
#[derive(Debug)]
pub struct RawFetch {
    pub fear_greed: Result<IndicatorSeries, FetchError>,
    pub spy: Result<IndicatorSeries, FetchError>,
    pub qqq: Result<IndicatorSeries, FetchError>,
    pub iwm: Result<IndicatorSeries, FetchError>,
    pub vix: Result<IndicatorSeries, FetchError>,
    pub spy_options: Result<OptionsRatio, FetchError>,
    pub qqq_options: Result<OptionsRatio, FetchError>,
    pub iwm_options: Result<OptionsRatio, FetchError>,
}

/// A complete snapshot plus the names of the sources that were substituted.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub snapshot: MarketSnapshot,
    pub fallbacks: Vec<&'static str>,
}

impl FetchReport {
    pub fn all_live(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Run every branch concurrently. Never short-circuits.
pub async fn fetch_all(sources: &Sources) -> RawFetch {
    let (fear_greed, spy, qqq, iwm, vix, spy_options, qqq_options, iwm_options) = tokio::join!(
        sources.fear_greed.fetch_latest(),
        sources.spy.fetch_latest(),
        sources.qqq.fetch_latest(),
        sources.iwm.fetch_latest(),
        sources.vix.fetch_latest(),
        sources.spy_options.fetch_latest(),
        sources.qqq_options.fetch_latest(),
        sources.iwm_options.fetch_latest(),
    );
    RawFetch {
        fear_greed,
        spy,
        qqq,
        iwm,
        vix,
        spy_options,
        qqq_options,
        iwm_options,
    }
}

fn settle<T>(
    name: &'static str,
    res: Result<T, FetchError>,
    fallback: impl FnOnce() -> T,
) -> SourceOutcome<T> {
    match res {
        Ok(v) => SourceOutcome::Fetched(v),
        Err(e) => {
            tracing::warn!(
                target: "fetch",
                source = name,
                error = %e,
                "source failed, substituting"
            );
            counter!("fetch_source_fallback_total", "source" => name).increment(1);
            SourceOutcome::Placeholder(fallback())
        }
    }
}

/// Substitute placeholders for failed series and `None` for failed options.
pub fn assemble<R: Rng>(raw: RawFetch, now: DateTime<Utc>, rng: &mut R) -> FetchReport {
    ensure_metrics_described();
    let mut fallbacks = Vec::new();
    let mut take = |name: &'static str, outcome: SourceOutcome<_>| {
        if outcome.is_fallback() {
            fallbacks.push(name);
        }
        outcome.into_inner()
    };

    let fear_greed: IndicatorSeries = take(
        "fear_greed",
        settle("fear_greed", raw.fear_greed, || placeholder::fear_greed(now, &mut *rng)),
    );
    let spy = take(
        "spy",
        settle("spy", raw.spy, || placeholder::equity(Symbol::Spy, now, &mut *rng)),
    );
    let qqq = take(
        "qqq",
        settle("qqq", raw.qqq, || placeholder::equity(Symbol::Qqq, now, &mut *rng)),
    );
    let iwm = take(
        "iwm",
        settle("iwm", raw.iwm, || placeholder::equity(Symbol::Iwm, now, &mut *rng)),
    );
    let vix = take("vix", settle("vix", raw.vix, || placeholder::vix(now, &mut *rng)));

    let mut options = OptionsSnapshot::default();
    for (symbol, name, res) in [
        (Symbol::Spy, "spy_options", raw.spy_options),
        (Symbol::Qqq, "qqq_options", raw.qqq_options),
        (Symbol::Iwm, "iwm_options", raw.iwm_options),
    ] {
        let outcome = settle(name, res.map(Some), || None);
        if outcome.is_fallback() {
            fallbacks.push(name);
        }
        options.set(symbol, outcome.into_inner());
    }

    FetchReport {
        snapshot: MarketSnapshot {
            fear_greed,
            spy,
            qqq,
            iwm,
            vix,
            options,
            last_updated: now,
            generated_at: Some(now),
        },
        fallbacks,
    }
}

/// Fetch everything and build a complete snapshot.
pub async fn fetch_snapshot(sources: &Sources) -> FetchReport {
    let raw = fetch_all(sources).await;
    let mut rng = StdRng::from_os_rng();
    let report = assemble(raw, Utc::now(), &mut rng);
    tracing::info!(
        target: "fetch",
        fallbacks = ?report.fallbacks,
        "snapshot assembled"
    );
    report
}
