//! Composite scorer: weighted sum of sub-scores plus the label/message table.
//!
//! Labels use inclusive lower bounds:
//! ≥80 EXTREME GREED, ≥65 GREED, ≥55 MILD GREED, ≥45 NEUTRAL,
//! ≥35 MILD FEAR, ≥20 FEAR, else EXTREME FEAR.

use serde::{Deserialize, Serialize};

use super::normalize::round_score;
use super::weights::{Component, Weights};

/// Raw per-component scores in [0, 100]. Unrounded values are allowed so
/// the timeframe view can weigh curve outputs directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreInputs {
    pub fear_greed: f64,
    pub market: f64,
    pub volatility: f64,
    pub options: f64,
}

impl ScoreInputs {
    /// Safe constructor with clamping.
    pub fn new(fear_greed: f64, market: f64, volatility: f64, options: f64) -> Self {
        fn c(x: f64) -> f64 {
            if x.is_finite() {
                x.clamp(0.0, 100.0)
            } else {
                0.0
            }
        }
        Self {
            fear_greed: c(fear_greed),
            market: c(market),
            volatility: c(volatility),
            options: c(options),
        }
    }

    pub fn get(&self, c: Component) -> f64 {
        match c {
            Component::FearGreed => self.fear_greed,
            Component::Market => self.market,
            Component::Volatility => self.volatility,
            Component::Options => self.options,
        }
    }
}

/// `round(Σ score_i * weight_i)`, always within [0, 100].
pub fn composite_score(inputs: &ScoreInputs, w: &Weights) -> u8 {
    let raw: f64 = Component::ALL
        .iter()
        .map(|c| inputs.get(*c) * w.weight(*c))
        .sum();
    round_score(raw)
}

/// One component's contribution as reported in the result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub score: u8,
    pub weight: f64,
}

/// Fixed-field component breakdown (`overall.components`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    pub fear_greed: SubScore,
    pub market: SubScore,
    pub volatility: SubScore,
    pub options: SubScore,
}

impl Components {
    pub fn new(inputs: &ScoreInputs, w: &Weights) -> Self {
        let sub = |c: Component| SubScore {
            score: round_score(inputs.get(c)),
            weight: w.weight(c),
        };
        Self {
            fear_greed: sub(Component::FearGreed),
            market: sub(Component::Market),
            volatility: sub(Component::Volatility),
            options: sub(Component::Options),
        }
    }

    pub fn get(&self, c: Component) -> SubScore {
        match c {
            Component::FearGreed => self.fear_greed,
            Component::Market => self.market,
            Component::Volatility => self.volatility,
            Component::Options => self.options,
        }
    }
}

/// Seven-bucket sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "EXTREME FEAR")]
    ExtremeFear,
    #[serde(rename = "FEAR")]
    Fear,
    #[serde(rename = "MILD FEAR")]
    MildFear,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "MILD GREED")]
    MildGreed,
    #[serde(rename = "GREED")]
    Greed,
    #[serde(rename = "EXTREME GREED")]
    ExtremeGreed,
}

impl SentimentLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::ExtremeGreed,
            65..=79 => Self::Greed,
            55..=64 => Self::MildGreed,
            45..=54 => Self::Neutral,
            35..=44 => Self::MildFear,
            20..=34 => Self::Fear,
            _ => Self::ExtremeFear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeGreed => "EXTREME GREED",
            Self::Greed => "GREED",
            Self::MildGreed => "MILD GREED",
            Self::Neutral => "NEUTRAL",
            Self::MildFear => "MILD FEAR",
            Self::Fear => "FEAR",
            Self::ExtremeFear => "EXTREME FEAR",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::ExtremeGreed => "Markets are extremely optimistic",
            Self::Greed => "Investors are greedy",
            Self::MildGreed => "Markets are slightly bullish",
            Self::Neutral => "Markets are balanced",
            Self::MildFear => "Markets are slightly bearish",
            Self::Fear => "Investors are fearful",
            Self::ExtremeFear => "Markets are extremely pessimistic",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::weights::{OVERALL_WEIGHTS, TIMEFRAME_WEIGHTS};

    #[test]
    fn label_boundaries_are_inclusive_lower_bounds() {
        let cases = [
            (100, SentimentLabel::ExtremeGreed),
            (80, SentimentLabel::ExtremeGreed),
            (79, SentimentLabel::Greed),
            (65, SentimentLabel::Greed),
            (64, SentimentLabel::MildGreed),
            (55, SentimentLabel::MildGreed),
            (54, SentimentLabel::Neutral),
            (45, SentimentLabel::Neutral),
            (44, SentimentLabel::MildFear),
            (35, SentimentLabel::MildFear),
            (34, SentimentLabel::Fear),
            (20, SentimentLabel::Fear),
            (19, SentimentLabel::ExtremeFear),
            (0, SentimentLabel::ExtremeFear),
        ];
        for (score, want) in cases {
            assert_eq!(SentimentLabel::from_score(score), want, "score {score}");
        }
    }

    #[test]
    fn composite_matches_worked_example() {
        let inputs = ScoreInputs::new(70.0, 70.0, 68.0, 80.0);
        let score = composite_score(&inputs, &OVERALL_WEIGHTS);
        assert_eq!(score, 72);
        assert_eq!(SentimentLabel::from_score(score), SentimentLabel::Greed);
    }

    #[test]
    fn composite_stays_in_range_for_extremes() {
        for v in [0.0, 100.0] {
            let i = ScoreInputs::new(v, v, v, v);
            assert_eq!(composite_score(&i, &OVERALL_WEIGHTS), v as u8);
            assert_eq!(composite_score(&i, &TIMEFRAME_WEIGHTS), v as u8);
        }
        let wild = ScoreInputs::new(250.0, -40.0, f64::NAN, 100.0);
        assert!(composite_score(&wild, &OVERALL_WEIGHTS) <= 100);
    }

    #[test]
    fn components_carry_weights() {
        let c = Components::new(&ScoreInputs::new(50.0, 50.0, 50.0, 50.0), &OVERALL_WEIGHTS);
        assert_eq!(c.fear_greed, SubScore { score: 50, weight: 0.35 });
        assert_eq!(c.get(Component::Options).weight, 0.20);
        let v = serde_json::to_value(c).unwrap();
        assert!(v.get("fearGreed").is_some());
    }

    #[test]
    fn label_serializes_with_space() {
        let v = serde_json::to_value(SentimentLabel::MildGreed).unwrap();
        assert_eq!(v, serde_json::json!("MILD GREED"));
        assert_eq!(SentimentLabel::Fear.to_string(), "FEAR");
    }
}
