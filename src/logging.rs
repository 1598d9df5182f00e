//! Structured logging setup.

use tracing::Level;

use crate::config::LoggingSettings;

/// Parse the configured level, falling back to `INFO` for unknown values.
pub fn max_level(settings: &LoggingSettings) -> Level {
    settings.level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Install a `fmt` subscriber at the configured level.
///
/// Returns `false` when a global subscriber was already installed, which is
/// the normal case when the host application set up its own logging.
pub fn init(settings: &LoggingSettings) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(max_level(settings))
        .try_init()
        .is_ok()
}
