//! Artifact cache as a plain value.
//!
//! The server keeps at most one `CachedArtifact` in its state; whoever holds
//! it checks `is_fresh` and decides whether to reload. Expiry is absolute
//! (no sliding refresh on reads).

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::report::SentimentResult;
use crate::store;

/// Where the served document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
    Fallback,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Fallback => "FALLBACK",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedArtifact {
    pub data: SentimentResult,
    pub fetched_at: DateTime<Utc>,
}

impl CachedArtifact {
    pub fn new(data: SentimentResult, fetched_at: DateTime<Utc>) -> Self {
        Self { data, fetched_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Serve from `cached` while fresh, otherwise read the artifact at `path`.
///
/// Returns the document, the cache entry to keep (unchanged on a hit, new on
/// a successful read, `None` after a fallback), and how it was produced.
/// A fallback is never cached, so the next call retries the file.
pub fn resolve(
    cached: Option<&CachedArtifact>,
    path: &Path,
    now: DateTime<Utc>,
    ttl: Duration,
) -> (SentimentResult, Option<CachedArtifact>, CacheStatus) {
    if let Some(c) = cached.filter(|c| c.is_fresh(now, ttl)) {
        return (c.data.clone(), Some(c.clone()), CacheStatus::Hit);
    }

    match load_or_fallback(path, now) {
        (data, CacheStatus::Miss) => {
            let entry = CachedArtifact::new(data.clone(), now);
            (data, Some(entry), CacheStatus::Miss)
        }
        (data, status) => (data, None, status),
    }
}

/// Read the artifact at `path`; on any error, the neutral fallback document.
/// The status is `Miss` for a successful read and `Fallback` otherwise.
pub fn load_or_fallback(path: &Path, now: DateTime<Utc>) -> (SentimentResult, CacheStatus) {
    match store::load_result(path) {
        Ok(data) => (data, CacheStatus::Miss),
        Err(e) => {
            tracing::warn!(
                target: "api",
                error = %e,
                path = %path.display(),
                "analysis artifact unavailable, serving neutral fallback"
            );
            (SentimentResult::neutral_fallback(now), CacheStatus::Fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_is_absolute() {
        let t0 = Utc::now();
        let c = CachedArtifact::new(SentimentResult::neutral_fallback(t0), t0);
        let ttl = Duration::minutes(5);
        assert!(c.is_fresh(t0 + Duration::minutes(4), ttl));
        assert!(!c.is_fresh(t0 + Duration::minutes(5), ttl));
    }

    #[test]
    fn missing_file_falls_back_and_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let (doc, entry, status) = resolve(None, &path, Utc::now(), Duration::minutes(5));
        assert_eq!(status, CacheStatus::Fallback);
        assert!(entry.is_none());
        assert_eq!(doc.overall.score, 50);
    }

    #[test]
    fn corrupt_artifact_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment-analysis.json");
        std::fs::write(&path, "{\"overall\": 3}").unwrap();
        let (doc, status) = load_or_fallback(&path, Utc::now());
        assert_eq!(status, CacheStatus::Fallback);
        assert_eq!(doc.overall.confidence, 50);
    }

    #[test]
    fn miss_then_hit_then_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentiment-analysis.json");
        let t0 = Utc::now();
        let mut doc = SentimentResult::neutral_fallback(t0);
        doc.overall.score = 61;
        store::save_result(&path, &doc).unwrap();

        let ttl = Duration::minutes(5);
        let (d1, e1, s1) = resolve(None, &path, t0, ttl);
        assert_eq!(s1, CacheStatus::Miss);
        assert_eq!(d1.overall.score, 61);

        let (_, e2, s2) = resolve(e1.as_ref(), &path, t0 + Duration::minutes(1), ttl);
        assert_eq!(s2, CacheStatus::Hit);

        let (_, _, s3) = resolve(e2.as_ref(), &path, t0 + Duration::minutes(6), ttl);
        assert_eq!(s3, CacheStatus::Miss);
    }
}
