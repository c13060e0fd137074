//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `level` is an `EnvFilter` directive such as
/// `info` or `walkin_core=debug,sqlx=warn`; an unparsable directive falls back
/// to `info`.
///
/// Returns `false` when a subscriber was already installed (tests, embedding).
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
