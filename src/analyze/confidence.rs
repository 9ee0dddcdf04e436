//! Confidence estimator: how much to trust one analysis run.
//!
//! Starts at 100, loses 10 per absent options source and 20 when the
//! snapshot is older than 24h, never reported below 50.

use chrono::{DateTime, Duration, Utc};

use crate::model::{MarketSnapshot, OptionsSnapshot};

pub const FULL_CONFIDENCE: u8 = 100;
pub const MISSING_OPTIONS_PENALTY: u8 = 10;
pub const STALE_PENALTY: u8 = 20;
pub const CONFIDENCE_FLOOR: u8 = 50;

/// Snapshot age beyond which the stale penalty applies.
pub fn stale_after() -> Duration {
    Duration::hours(24)
}

pub fn is_stale(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_updated > stale_after()
}

pub fn estimate(options: &OptionsSnapshot, last_updated: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let mut confidence = FULL_CONFIDENCE;

    let missing = options.missing_count().min(3) as u8;
    confidence = confidence.saturating_sub(missing * MISSING_OPTIONS_PENALTY);

    if is_stale(last_updated, now) {
        confidence = confidence.saturating_sub(STALE_PENALTY);
    }

    confidence.max(CONFIDENCE_FLOOR)
}

/// Confidence of a whole snapshot evaluated at `now`.
pub fn confidence_for(snapshot: &MarketSnapshot, now: DateTime<Utc>) -> u8 {
    estimate(&snapshot.options, snapshot.last_updated, now)
}
