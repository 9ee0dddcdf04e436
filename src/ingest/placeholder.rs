// src/ingest/placeholder.rs
//! Locally generated substitutes for failed series. Plausible, clearly
//! synthetic, and reproducible when the caller seeds the RNG.

use chrono::{DateTime, Days, Utc};
use rand::Rng;

use crate::ingest::providers::round2;
use crate::model::{IndicatorSample, IndicatorSeries, Symbol, MAX_HISTORY};

pub const PRICE_SPREAD: f64 = 10.0;

/// Anchor price for a symbol's placeholder series.
pub fn base_price(symbol: Symbol) -> f64 {
    match symbol {
        Symbol::Spy => 450.0,
        Symbol::Qqq => 400.0,
        Symbol::Iwm => 230.0,
    }
}

fn build<R, F>(now: DateTime<Utc>, rng: &mut R, mut sample: F) -> IndicatorSeries
where
    R: Rng,
    F: FnMut(&mut R, IndicatorSample) -> IndicatorSample,
{
    let today = now.date_naive();
    let historical: Vec<IndicatorSample> = (0..MAX_HISTORY as u64)
        .map(|i| {
            let date = today.checked_sub_days(Days::new(i)).unwrap_or(today);
            sample(rng, IndicatorSample::new(date, 0.0))
        })
        .collect();
    let current = historical[0].clone();
    IndicatorSeries {
        current,
        historical,
        last_updated: now,
    }
}

pub fn fear_greed<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> IndicatorSeries {
    build(now, rng, |rng, mut s| {
        s.value = round2(rng.random_range(30.0..70.0));
        s.rated("Neutral")
    })
}

pub fn equity<R: Rng>(symbol: Symbol, now: DateTime<Utc>, rng: &mut R) -> IndicatorSeries {
    let base = base_price(symbol);
    let mut series = build(now, rng, |rng, mut s| {
        s.value = round2(base + rng.random_range(-PRICE_SPREAD..PRICE_SPREAD));
        s.with_volume(rng.random_range(50_000_000..100_000_000))
            .with_change(round2(rng.random_range(-5.0..5.0)))
    });
    series.set_change_percent(round2(rng.random_range(-2.0..2.0)));
    series
}

pub fn vix<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> IndicatorSeries {
    build(now, rng, |rng, mut s| {
        s.value = round2(rng.random_range(15.0..40.0));
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ranges_and_shape() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(7);

        let fg = fear_greed(now, &mut rng);
        assert_eq!(fg.historical.len(), MAX_HISTORY);
        assert_eq!(fg.current, fg.historical[0]);
        assert!(fg.historical.iter().all(|s| (30.0..=70.0).contains(&s.value)));
        assert_eq!(fg.historical[1].date, now.date_naive().pred_opt().unwrap());

        let iwm = equity(Symbol::Iwm, now, &mut rng);
        assert!(iwm.historical.iter().all(|s| (220.0..=240.0).contains(&s.value)));
        let pct = iwm.current.change_percent.unwrap();
        assert!((-2.0..=2.0).contains(&pct));
        assert_eq!(iwm.current, iwm.historical[0]);
        assert!(iwm.historical[1].change_percent.is_none());

        let v = vix(now, &mut rng);
        assert!(v.historical.iter().all(|s| (15.0..=40.0).contains(&s.value)));
    }

    #[test]
    fn same_seed_same_series() {
        let now = Utc::now();
        let a = vix(now, &mut StdRng::seed_from_u64(42));
        let b = vix(now, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
