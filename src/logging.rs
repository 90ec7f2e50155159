//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `PROJED_LOG` environment variable (e.g. "info", "debug")
//! 2. `log_level` from the settings file
//! 3. default to `info`

use tracing_subscriber::fmt;

pub const LOG_ENV_VAR: &str = "PROJED_LOG";

/// Initialise the global logging subscriber.
///
/// Returns `false` if a subscriber was already installed (tests, repeated
/// calls); the existing one stays in place.
pub fn init_logging(configured: Option<&str>) -> bool {
    let level = resolve_level(std::env::var(LOG_ENV_VAR).ok().as_deref(), configured);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}

/// Pick the effective level from the env var and the configured value.
pub fn resolve_level(env: Option<&str>, configured: Option<&str>) -> tracing::Level {
    env.and_then(parse_level_str)
        .or_else(|| configured.and_then(parse_level_str))
        .unwrap_or(tracing::Level::INFO)
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
