//! report.rs: shape of the analysis artifact (`sentiment-analysis.json`).
//!
//! Produced fresh on every run and never mutated afterwards. The
//! presentation layer reads it as-is; `SentimentResult::neutral_fallback`
//! is what it shows when the artifact is missing or unreadable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyze::{
    Components, ScoreInputs, SentimentLabel, TimeframeReport, Timeframes, Trend, OVERALL_WEIGHTS,
};
use crate::present::indicators::Indicators;

/// Headline figure plus its component breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overall {
    pub score: u8,
    /// Serialized as `label`; older artifacts call it `sentiment`.
    #[serde(alias = "sentiment")]
    pub label: SentimentLabel,
    pub message: String,
    /// 50..=100.
    pub confidence: u8,
    pub components: Components,
}

impl Overall {
    pub fn new(score: u8, confidence: u8, components: Components) -> Self {
        let label = SentimentLabel::from_score(score);
        Self {
            score,
            label,
            message: label.message().to_string(),
            confidence,
            components,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    pub overall: Overall,
    pub timeframes: Timeframes,
    pub indicators: Indicators,
    pub last_analyzed: DateTime<Utc>,
}

impl SentimentResult {
    /// Neutral document: score 50, every sub-score 50, confidence 50.
    pub fn neutral_fallback(now: DateTime<Utc>) -> Self {
        let neutral = ScoreInputs::new(50.0, 50.0, 50.0, 50.0);
        let components = Components::new(&neutral, &OVERALL_WEIGHTS);
        let tf = || TimeframeReport::from_score(50, Trend::Stable);
        Self {
            overall: Overall::new(50, 50, components),
            timeframes: Timeframes {
                one_day: tf(),
                five_days: tf(),
                one_month: tf(),
            },
            indicators: Indicators::neutral(),
            last_analyzed: now,
        }
    }

    /// One-line summary for logs and CLI output.
    pub fn headline(&self) -> String {
        format!(
            "{}/100 ({}), confidence {}%",
            self.overall.score, self.overall.label, self.overall.confidence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_shape_matches_dashboard_contract() {
        let r = SentimentResult::neutral_fallback(Utc::now());
        let v = serde_json::to_value(&r).unwrap();

        assert_eq!(v["overall"]["score"], json!(50));
        assert_eq!(v["overall"]["label"], json!("NEUTRAL"));
        assert_eq!(v["overall"]["message"], json!("Markets are balanced"));
        assert_eq!(v["overall"]["confidence"], json!(50));
        for key in ["fearGreed", "market", "volatility", "options"] {
            assert_eq!(v["overall"]["components"][key]["score"], json!(50), "{key}");
        }
        for key in ["1d", "5d", "1m"] {
            assert_eq!(v["timeframes"][key]["trend"], json!("stable"));
        }
        assert_eq!(v["indicators"]["spy"]["price"], json!(450.0));
        assert_eq!(v["indicators"]["options"]["iwm"], json!("IWM options data unavailable"));
        assert!(v["lastAnalyzed"].is_string());
    }

    #[test]
    fn legacy_sentiment_key_is_accepted() {
        let r = SentimentResult::neutral_fallback(Utc::now());
        let mut v = serde_json::to_value(&r).unwrap();
        let label = v["overall"]
            .as_object_mut()
            .unwrap()
            .remove("label")
            .unwrap();
        v["overall"]["sentiment"] = label;
        let back: SentimentResult = serde_json::from_value(v).unwrap();
        assert_eq!(back.overall.label, SentimentLabel::Neutral);
    }
}
