// src/logging.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_FILTER: &str = "market_sentiment=info,fetch=info,analyze=info,api=info,warn";

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops (tests and binaries share this).
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// structured output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}
