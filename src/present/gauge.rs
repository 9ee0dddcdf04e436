//! Gauge geometry for the dashboard needle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyze::{SentimentLabel, Timeframe};
use crate::present::format::last_update_text;
use crate::report::SentimentResult;

/// Needle angle in degrees: 0 → −90°, 50 → 0°, 100 → +90°.
pub fn needle_angle(score: u8) -> f64 {
    (f64::from(score.min(100)) - 50.0) / 50.0 * 90.0
}

/// Arc band color for a label, extreme fear (red) to extreme greed (green).
pub fn band_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::ExtremeFear => "#dc2626",
        SentimentLabel::Fear => "#ea580c",
        SentimentLabel::MildFear => "#d97706",
        SentimentLabel::Neutral => "#65a30d",
        SentimentLabel::MildGreed => "#16a34a",
        SentimentLabel::Greed => "#059669",
        SentimentLabel::ExtremeGreed => "#047857",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeView {
    pub score: u8,
    pub label: SentimentLabel,
    pub message: String,
    pub angle_deg: f64,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

impl GaugeView {
    pub fn new(score: u8, label: SentimentLabel, message: impl Into<String>) -> Self {
        Self {
            score,
            label,
            message: message.into(),
            angle_deg: needle_angle(score),
            color: band_color(label),
            timeframe: None,
            confidence: None,
            last_update: None,
        }
    }

    /// Gauge for a full analysis, with "last updated" text relative to `now`.
    pub fn from_result(result: &SentimentResult, now: DateTime<Utc>) -> Self {
        let o = &result.overall;
        Self {
            confidence: Some(o.confidence),
            last_update: Some(last_update_text(result.last_analyzed, now)),
            ..Self::new(o.score, o.label, o.message.clone())
        }
    }

    /// Gauge for one timeframe of an analysis.
    pub fn for_timeframe(result: &SentimentResult, tf: Timeframe, now: DateTime<Utc>) -> Self {
        let r = result.timeframes.get(tf);
        Self {
            timeframe: Some(tf),
            last_update: Some(last_update_text(result.last_analyzed, now)),
            ..Self::new(r.score, r.label, r.message.clone())
        }
    }
}
