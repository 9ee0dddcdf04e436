// src/ingest/error.rs
//! Fetch layer errors. Never reach the scorer: every failure is turned into
//! a placeholder (or an absent options entry) before the snapshot is built.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx response.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Payload parsed but did not have the expected shape.
    #[error("malformed payload from {source_name}: {detail}")]
    Malformed {
        source_name: &'static str,
        detail: String,
    },

    #[error("{0} returned no usable samples")]
    Empty(&'static str),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    pub fn malformed(source_name: &'static str, detail: impl Into<String>) -> Self {
        FetchError::Malformed {
            source_name,
            detail: detail.into(),
        }
    }
}
