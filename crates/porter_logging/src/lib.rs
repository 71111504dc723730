#![deny(missing_docs)]
//! Shared logging utilities for the porter workspace.
//!
//! This crate provides the `porter_*` logging macros used across the codebase,
//! the `PORTER_LOG` level override and a minimal test initializer for the
//! global logger.

use std::str::FromStr;

use log::LevelFilter;

/// Environment variable consulted for the log level (`trace`, `debug`, `info`, ...).
pub const LEVEL_ENV_VAR: &str = "PORTER_LOG";

/// Parses a level name, falling back to `default` when the name is unknown.
pub fn parse_level(raw: Option<&str>, default: LevelFilter) -> LevelFilter {
    raw.map(str::trim)
        .and_then(|name| LevelFilter::from_str(name).ok())
        .unwrap_or(default)
}

/// Reads the log level from `PORTER_LOG`, or returns `default` when unset or invalid.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    let raw = std::env::var(LEVEL_ENV_VAR).ok();
    parse_level(raw.as_deref(), default)
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! porter_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! porter_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! porter_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! porter_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! porter_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let fallback = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level_from_env(fallback),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_known_names() {
        assert_eq!(parse_level(Some("debug"), LevelFilter::Info), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" WARN "), LevelFilter::Info), LevelFilter::Warn);
        assert_eq!(parse_level(Some("off"), LevelFilter::Info), LevelFilter::Off);
    }

    #[test]
    fn parse_level_falls_back_on_garbage() {
        assert_eq!(parse_level(Some("loud"), LevelFilter::Info), LevelFilter::Info);
        assert_eq!(parse_level(None, LevelFilter::Error), LevelFilter::Error);
    }
}
