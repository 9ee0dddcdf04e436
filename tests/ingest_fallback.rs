// tests/ingest_fallback.rs
//
// Fan-out behaviour with mock and fixture providers: failures never abort
// the run, series are substituted, options become absent.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use market_sentiment::engine;
use market_sentiment::ingest::error::FetchError;
use market_sentiment::ingest::providers::{
    AlphaVantageProvider, CnnFearGreedProvider, FredVixProvider, YahooOptionsProvider,
};
use market_sentiment::ingest::types::SourceProvider;
use market_sentiment::ingest::{assemble, fetch_all, Sources};
use market_sentiment::model::{IndicatorSeries, OptionsRatio, Symbol, MAX_HISTORY};

struct Down(&'static str);

#[async_trait]
impl SourceProvider for Down {
    type Output = IndicatorSeries;
    async fn fetch_latest(&self) -> Result<IndicatorSeries, FetchError> {
        Err(FetchError::Status {
            status: 503,
            url: format!("https://{}.test", self.0),
        })
    }
    fn name(&self) -> &'static str {
        self.0
    }
}

struct DownOptions(&'static str);

#[async_trait]
impl SourceProvider for DownOptions {
    type Output = OptionsRatio;
    async fn fetch_latest(&self) -> Result<OptionsRatio, FetchError> {
        Err(FetchError::Empty(self.0))
    }
    fn name(&self) -> &'static str {
        self.0
    }
}

fn all_down() -> Sources {
    Sources {
        fear_greed: Box::new(Down("fear_greed")),
        spy: Box::new(Down("spy")),
        qqq: Box::new(Down("qqq")),
        iwm: Box::new(Down("iwm")),
        vix: Box::new(Down("vix")),
        spy_options: Box::new(DownOptions("spy_options")),
        qqq_options: Box::new(DownOptions("qqq_options")),
        iwm_options: Box::new(DownOptions("iwm_options")),
    }
}

fn daily(closes: &[(&str, &str)]) -> serde_json::Value {
    let mut series = serde_json::Map::new();
    for (date, close) in closes {
        series.insert(
            date.to_string(),
            json!({ "1. open": "100.0", "4. close": close, "5. volume": "1000" }),
        );
    }
    json!({ "Time Series (Daily)": series })
}

fn chain(calls: u64, puts: u64) -> serde_json::Value {
    json!({ "optionChain": { "result": [{ "options": [{
        "calls": [{ "volume": calls }],
        "puts": [{ "volume": puts }]
    }]}]}})
}

fn all_fixtures() -> Sources {
    let fg = json!({ "fear_and_greed_historical": { "data": [
        { "x": 1_751_328_000_000_u64, "y": 63.0, "rating": "greed" },
        { "x": 1_751_241_600_000_u64, "y": 58.0, "rating": "greed" }
    ]}});
    let vix = json!({ "observations": [
        { "date": "2025-07-01", "value": "16.5" },
        { "date": "2025-06-30", "value": "." }
    ]});
    Sources {
        fear_greed: Box::new(CnnFearGreedProvider::from_fixture(fg)),
        spy: Box::new(AlphaVantageProvider::from_fixture(
            Symbol::Spy,
            daily(&[("2025-07-01", "606.0"), ("2025-06-30", "600.0")]),
        )),
        qqq: Box::new(AlphaVantageProvider::from_fixture(
            Symbol::Qqq,
            daily(&[("2025-07-01", "505.0"), ("2025-06-30", "500.0")]),
        )),
        iwm: Box::new(AlphaVantageProvider::from_fixture(
            Symbol::Iwm,
            daily(&[("2025-07-01", "202.0"), ("2025-06-30", "200.0")]),
        )),
        vix: Box::new(FredVixProvider::from_fixture(vix)),
        spy_options: Box::new(YahooOptionsProvider::from_fixture(Symbol::Spy, chain(1000, 800))),
        qqq_options: Box::new(YahooOptionsProvider::from_fixture(Symbol::Qqq, chain(1000, 900))),
        // Malformed payload for IWM.
        iwm_options: Box::new(YahooOptionsProvider::from_fixture(Symbol::Iwm, json!({}))),
    }
}

#[tokio::test]
async fn every_source_down_still_yields_complete_snapshot() {
    let raw = fetch_all(&all_down()).await;
    let mut rng = StdRng::seed_from_u64(1);
    let report = assemble(raw, Utc::now(), &mut rng);

    assert_eq!(report.fallbacks.len(), 8);
    let s = &report.snapshot;
    for series in [&s.fear_greed, &s.spy, &s.qqq, &s.iwm, &s.vix] {
        assert_eq!(series.historical.len(), MAX_HISTORY);
        assert_eq!(series.current, series.historical[0]);
    }
    assert_eq!(s.options.missing_count(), 3);

    let r = engine::analyze(s, s.last_updated);
    assert!(r.overall.score <= 100);
    assert_eq!(r.overall.confidence, 70);
}

#[tokio::test]
async fn placeholders_are_reproducible_with_a_seed() {
    let now = Utc::now();
    let a = assemble(fetch_all(&all_down()).await, now, &mut StdRng::seed_from_u64(9));
    let b = assemble(fetch_all(&all_down()).await, now, &mut StdRng::seed_from_u64(9));
    assert_eq!(a.snapshot, b.snapshot);
}

#[tokio::test]
async fn fixture_sources_flow_through_unchanged() {
    let raw = fetch_all(&all_fixtures()).await;
    let report = assemble(raw, Utc::now(), &mut StdRng::seed_from_u64(3));
    assert_eq!(report.fallbacks, vec!["iwm_options"]);

    let s = &report.snapshot;
    assert_eq!(s.fear_greed.current.value, 63.0);
    assert_eq!(s.spy.current.change_percent, Some(1.0));
    assert_eq!(s.qqq.current.change_percent, Some(1.0));
    assert_eq!(s.iwm.current.change_percent, Some(1.0));
    assert_eq!(s.vix.historical.len(), 1);
    assert_eq!(s.options.spy.as_ref().map(|o| o.put_call_ratio), Some(0.8));
    assert!(s.options.iwm.is_none());

    // fg 63, market 60, VIX 16.5 -> 74, options avg(0.8, 0.9, 1.0) -> 73
    let r = engine::analyze(s, s.last_updated);
    assert_eq!(r.overall.score, 66);
    assert_eq!(r.overall.confidence, 90);
}
