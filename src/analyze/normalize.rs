//! Indicator normalizers: raw metric → 0..=100 sub-score.
//!
//! Each indicator has a fixed curve. The `*_curve` functions return the
//! unrounded, clamped value (the timeframe view weights those directly);
//! the `*_score` functions round to the nearest integer.
//!
//! | indicator    | curve                                                    |
//! |--------------|----------------------------------------------------------|
//! | fear & greed | identity                                                 |
//! | market move  | `50 + avg% * 10`  (−5% → 0, 0% → 50, +5% → 100)          |
//! | volatility   | inverted piecewise: ≤15 → 80..100, ≤25 → 40..80, else 0..40 |
//! | put/call     | `100 − (avg − 0.5) * 66.67` (0.5 → 100, 2.0 → 0)         |

/// Put/call ratio assumed for a symbol whose options data is unavailable.
pub const NEUTRAL_PUT_CALL: f64 = 1.0;

/// Clamp to [0, 100] and round half away from zero. Non-finite input is 0.
pub fn round_score(x: f64) -> u8 {
    if !x.is_finite() {
        return 0;
    }
    x.clamp(0.0, 100.0).round() as u8
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fear & greed is already on the 0..=100 scale.
pub fn fear_greed_score(value: f64) -> u8 {
    round_score(value)
}

pub fn market_curve(avg_change_pct: f64) -> f64 {
    (50.0 + avg_change_pct * 10.0).clamp(0.0, 100.0)
}

/// Average % change across the tracked indices, mapped linearly.
pub fn market_score(changes_pct: &[f64]) -> u8 {
    round_score(market_curve(mean(changes_pct)))
}

/// Lower volatility ⇒ higher score. Continuous at 15 (80) and 25 (40).
pub fn volatility_curve(vix: f64) -> f64 {
    let score = if vix <= 15.0 {
        80.0 + (15.0 - vix) / 5.0 * 20.0
    } else if vix <= 25.0 {
        40.0 + (25.0 - vix) / 10.0 * 40.0
    } else {
        40.0 - (vix - 25.0) / 15.0 * 40.0
    };
    score.clamp(0.0, 100.0)
}

pub fn volatility_score(vix: f64) -> u8 {
    round_score(volatility_curve(vix))
}

pub fn options_curve(avg_ratio: f64) -> f64 {
    (100.0 - (avg_ratio - 0.5) * 66.67).clamp(0.0, 100.0)
}

/// Average put/call ratio across symbols; unavailable symbols count as
/// [`NEUTRAL_PUT_CALL`].
pub fn options_score(ratios: &[Option<f64>]) -> u8 {
    let filled: Vec<f64> = ratios
        .iter()
        .map(|r| r.unwrap_or(NEUTRAL_PUT_CALL))
        .collect();
    round_score(options_curve(mean(&filled)))
}
