//! Logging initialization.
//!
//! - `DAYSIGNAL_LOG_FORMAT=json`: structured JSON logs for log aggregation
//! - otherwise: human-readable logs
//!
//! Logs go to stderr; stdout is reserved for the message text.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "DAYSIGNAL_LOG_FORMAT";

pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // try_init: a subscriber may already be installed (tests, embedding)
    let result = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "logging already initialized");
    }
}
