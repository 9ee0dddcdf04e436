//! Timeframe aggregator: re-score the snapshot from historical windows.
//!
//! For a window of `days`:
//! - fear & greed: mean of the first `min(days, len)` values
//! - market: % change of SPY between index `min(days-1, len-1)` and index 0
//! - volatility: mean of the first `min(days, len)` VIX values through the curve
//!
//! then `0.4*fearGreed + 0.4*market + 0.2*volatility`, rounded. The trend is
//! the fear & greed move from the oldest to the newest value in the window.
//!
//! `days` must be ≥ 1; zero is a caller error but still yields a defined
//! (neutral-ish) report rather than a panic.

use serde::{Deserialize, Serialize};

use super::normalize::{market_curve, mean, round_score, volatility_curve};
use super::scoring::{composite_score, ScoreInputs, SentimentLabel};
use super::weights::TIMEFRAME_WEIGHTS;
use crate::model::{IndicatorSeries, MarketSnapshot};

/// Fear & greed move (points) beyond which a window is trending.
pub const TREND_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1m")]
    OneMonth,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::OneDay, Timeframe::FiveDays, Timeframe::OneMonth];

    pub fn days(self) -> usize {
        match self {
            Timeframe::OneDay => 1,
            Timeframe::FiveDays => 5,
            Timeframe::OneMonth => 30,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::FiveDays => "5d",
            Timeframe::OneMonth => "1m",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Deteriorating,
    /// Fewer than two points in the window.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeReport {
    pub score: u8,
    #[serde(alias = "sentiment")]
    pub label: SentimentLabel,
    pub message: String,
    pub trend: Trend,
}

impl TimeframeReport {
    pub fn from_score(score: u8, trend: Trend) -> Self {
        let label = SentimentLabel::from_score(score);
        Self {
            score,
            label,
            message: label.message().to_string(),
            trend,
        }
    }
}

/// Fixed `1d`/`5d`/`1m` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeframes {
    #[serde(rename = "1d")]
    pub one_day: TimeframeReport,
    #[serde(rename = "5d")]
    pub five_days: TimeframeReport,
    #[serde(rename = "1m")]
    pub one_month: TimeframeReport,
}

impl Timeframes {
    pub fn get(&self, tf: Timeframe) -> &TimeframeReport {
        match tf {
            Timeframe::OneDay => &self.one_day,
            Timeframe::FiveDays => &self.five_days,
            Timeframe::OneMonth => &self.one_month,
        }
    }
}

/// Mean of the first `min(days, len)` historical values; 0 when empty.
pub fn window_mean(series: &IndicatorSeries, days: usize) -> f64 {
    let vals: Vec<f64> = series.window(days).collect();
    mean(&vals)
}

/// % change from the value `days-1` samples back (capped at the oldest) to
/// the newest. 0 with fewer than two samples or a zero base.
pub fn window_percent_change(series: &IndicatorSeries, days: usize) -> f64 {
    let hist = &series.historical;
    if hist.len() < 2 {
        return 0.0;
    }
    let idx = days.saturating_sub(1).min(hist.len() - 1);
    let past = hist[idx].value;
    let latest = hist[0].value;
    if past == 0.0 || !past.is_finite() {
        return 0.0;
    }
    (latest - past) / past * 100.0
}

/// Newest minus oldest fear & greed value within the window.
pub fn trend(series: &IndicatorSeries, days: usize) -> Trend {
    let vals: Vec<f64> = series.window(days).collect();
    if vals.len() < 2 {
        return Trend::Neutral;
    }
    let change = vals[0] - vals[vals.len() - 1];
    if change > TREND_THRESHOLD {
        Trend::Improving
    } else if change < -TREND_THRESHOLD {
        Trend::Deteriorating
    } else {
        Trend::Stable
    }
}

/// Score one window of `days`.
pub fn analyze_window(snapshot: &MarketSnapshot, days: usize) -> TimeframeReport {
    let fear_greed = f64::from(round_score(window_mean(&snapshot.fear_greed, days)));
    let market = market_curve(window_percent_change(&snapshot.spy, days));
    let volatility = volatility_curve(window_mean(&snapshot.vix, days));

    let inputs = ScoreInputs::new(fear_greed, market, volatility, 0.0);
    let score = composite_score(&inputs, &TIMEFRAME_WEIGHTS);

    tracing::debug!(
        target: "analyze",
        days,
        fear_greed,
        market,
        volatility,
        score,
        "timeframe window scored"
    );

    TimeframeReport::from_score(score, trend(&snapshot.fear_greed, days))
}

pub fn analyze_timeframe(snapshot: &MarketSnapshot, tf: Timeframe) -> TimeframeReport {
    analyze_window(snapshot, tf.days())
}

pub fn analyze_timeframes(snapshot: &MarketSnapshot) -> Timeframes {
    Timeframes {
        one_day: analyze_timeframe(snapshot, Timeframe::OneDay),
        five_days: analyze_timeframe(snapshot, Timeframe::FiveDays),
        one_month: analyze_timeframe(snapshot, Timeframe::OneMonth),
    }
}
