//! # Sentiment Engine
//! Pure, testable logic that maps `MarketSnapshot` → `SentimentResult`.
//! No I/O, suitable for unit tests and offline re-analysis of saved snapshots.
//!
//! Order: normalize current values → weighted composite → timeframe windows
//! → confidence → display cards. `now` is injected so staleness is
//! reproducible.

use chrono::{DateTime, Utc};

use crate::analyze::{self, confidence, timeframe, Components, OVERALL_WEIGHTS};
use crate::model::MarketSnapshot;
use crate::present::indicators::Indicators;
use crate::report::{Overall, SentimentResult};

/// Analyze one snapshot as of `now`.
pub fn analyze(snapshot: &MarketSnapshot, now: DateTime<Utc>) -> SentimentResult {
    let inputs = analyze::current_inputs(snapshot);
    let score = analyze::composite_score(&inputs, &OVERALL_WEIGHTS);
    let components = Components::new(&inputs, &OVERALL_WEIGHTS);
    let confidence = confidence::confidence_for(snapshot, now);

    let result = SentimentResult {
        overall: Overall::new(score, confidence, components),
        timeframes: timeframe::analyze_timeframes(snapshot),
        indicators: Indicators::from_snapshot(snapshot),
        last_analyzed: now,
    };

    tracing::info!(
        target: "analyze",
        score,
        label = %result.overall.label,
        confidence,
        fear_greed = components.fear_greed.score,
        market = components.market.score,
        volatility = components.volatility.score,
        options = components.options.score,
        "sentiment analyzed"
    );

    result
}

/// Same as [`analyze`] evaluated at the current wall clock.
pub fn analyze_now(snapshot: &MarketSnapshot) -> SentimentResult {
    analyze(snapshot, Utc::now())
}
