// tests/scoring_props.rs
//
// Properties of the public scoring API over coarse input grids.

use market_sentiment::analyze::normalize::{market_score, options_score, volatility_score};
use market_sentiment::analyze::{
    composite_score, ScoreInputs, SentimentLabel, OVERALL_WEIGHTS, TIMEFRAME_WEIGHTS,
};

#[test]
fn weights_sum_to_one() {
    assert!((OVERALL_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    assert!((TIMEFRAME_WEIGHTS.sum() - 1.0).abs() < 1e-9);
}

#[test]
fn composite_stays_in_range_and_equal_inputs_are_fixed_points() {
    let grid = [0.0, 20.0, 33.0, 50.0, 65.0, 80.0, 100.0];
    for &a in &grid {
        for &b in &grid {
            for &c in &grid {
                let s = composite_score(&ScoreInputs::new(a, b, c, a), &OVERALL_WEIGHTS);
                assert!(s <= 100);
            }
        }
        let s = composite_score(&ScoreInputs::new(a, a, a, a), &OVERALL_WEIGHTS);
        assert_eq!(f64::from(s), a);
    }
}

#[test]
fn labels_never_decrease_with_score() {
    let mut prev = SentimentLabel::from_score(0);
    for s in 1..=100u8 {
        let l = SentimentLabel::from_score(s);
        assert!(l >= prev, "label went down at {s}");
        prev = l;
    }
    assert_eq!(SentimentLabel::from_score(0), SentimentLabel::ExtremeFear);
    assert_eq!(SentimentLabel::from_score(100), SentimentLabel::ExtremeGreed);
}

#[test]
fn normalizers_are_monotone() {
    let mut last = 0;
    for pct in [-10.0, -5.0, -1.0, 0.0, 1.0, 5.0] {
        let s = market_score(&[pct]);
        assert!(s >= last);
        last = s;
    }
    let mut last = 100;
    for vix in [5.0, 12.0, 15.0, 20.0, 25.0, 33.0, 60.0] {
        let s = volatility_score(vix);
        assert!(s <= last, "VIX {vix} scored {s} after {last}");
        last = s;
    }
    assert!(options_score(&[Some(0.6)]) > options_score(&[Some(1.4)]));
    assert_eq!(options_score(&[None, None, None]), options_score(&[Some(1.0)]));
}
