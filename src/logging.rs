//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! Logs are written to stderr so that the console tables on stdout stay
//! clean. `RUST_LOG` overrides the level chosen on the command line.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: absorbed irregularities (duplicate stages, transfers without a
//!   `created` event, invalid batch settings)
//! - `info`: pipeline stage counts, report locations
//! - `debug`: per-stage and per-batch details
//! - `trace`: everything else

use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for logging behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Log level filter for this crate.
    pub level: Level,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity count.
    ///
    /// - 0 (no `-v`): warn level
    /// - 1 (`-v`): info level
    /// - 2 (`-vv`): debug level
    /// - 3+ (`-vvv`): trace level
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Initialize the global tracing subscriber, writing to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    init_logging_with_writer(config, io::stderr)
}

/// Initialize logging with a custom writer (useful for testing).
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> io::Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .compact()
        .with_writer(writer)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()
        .map_err(io::Error::other)
}

/// Build an `EnvFilter` from the given level, respecting `RUST_LOG` env var.
fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();

    // Dependencies stay at warn
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,rust_transfer_reconciler={level},transfer_reconciler={level}",
            level = level_str
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::quiet(0, Level::WARN)]
    #[case::verbose(1, Level::INFO)]
    #[case::debug(2, Level::DEBUG)]
    #[case::trace(3, Level::TRACE)]
    #[case::saturates(9, Level::TRACE)]
    fn test_from_verbosity(#[case] verbosity: u8, #[case] expected: Level) {
        assert_eq!(LogConfig::from_verbosity(verbosity).level, expected);
    }

    #[test]
    fn test_builders() {
        let config = LogConfig::default().with_ansi(false).with_target(true);
        assert!(!config.with_ansi);
        assert!(config.with_target);
    }
}
