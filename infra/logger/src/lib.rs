//! # Logger
//!
//! Console and file logging for the joinery tools.
//!
//! Console output goes to stderr so that `--json` output on stdout stays machine-readable.
//! File output rotates and is written through a non-blocking worker whose guard lives in
//! the returned [`Logger`]. `RUST_LOG` overrides the configured level; use
//! [`LoggerBuilder::env_filter`] for a programmatic default such as `"joinery_merge=debug"`.
//!
//! ## Example
//!
//! ```rust
//! # use joinery_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("joinery")
//!     .level(LevelFilter::INFO)
//!     .verbosity(1)
//!     .init()
//!     .unwrap();
//! ```

mod builder;
mod error;
mod layers;

pub use crate::builder::{LoggerBuilder, NoFile, NoName, WithFile, WithName};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;

/// A handle to the initialized logging system.
///
/// Holds the file writer's worker guard; pending file logs are flushed when it drops.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`]; the name prefixes rolling log files
    /// (e.g. `joinery.2026-10-19.log`).
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// The file writer's guard, present when file logging is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing file buffers");
        }
    }
}

/// Parses a configured level name (`"info"`, `"DEBUG"`, `"off"`, ...).
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("unknown log level `{level}`").into(),
        context: Some("expected one of off, error, warn, info, debug, trace".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level(" off ").unwrap(), LevelFilter::OFF);
    }

    #[test]
    fn unknown_level_names_are_rejected() {
        let err = parse_level("loud").unwrap_err();
        assert!(err.to_string().contains("unknown log level `loud`"), "{err}");
    }
}
