//! User-facing diagnostics for programs built on confschema.
//!
//! Library internals report through the [`log`] facade (`log::debug!`); the
//! [`Logger`] here is what a command-line front end uses to talk to its user
//! on stderr, gated by a [`LogLevel`] picked from flags or the
//! `CONFSCHEMA_LOG_MODE` environment variable.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`init_logger`].
pub const LOG_MODE_ENV: &str = "CONFSCHEMA_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// # Examples
///
/// ```
/// use confschema::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Only the final result is printed.
    Quiet,
    /// Errors, warnings and the program banner.
    #[default]
    Normal,
    /// Everything, including per-setting progress.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Quiet => "quiet",
            Self::Normal => "normal",
            Self::Verbose => "verbose",
        };
        f.write_str(name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Recognizes "quiet", "normal" and "verbose", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }
}

/// A stderr logger that drops messages above its level.
///
/// # Examples
///
/// ```
/// use confschema::{LogLevel, Logger};
///
/// let logger = Logger::new(LogLevel::Normal);
/// logger.warn("setting 'threads' uses its default");
/// logger.info("not printed below Verbose");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether messages at `level` are printed.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Logs an error message (suppressed when quiet).
    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Normal, "ERROR", message);
    }

    /// Logs a warning message (suppressed when quiet).
    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Normal, "WARNING", message);
    }

    /// Logs an informational message, shown only when verbose.
    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Verbose, "INFO", message);
    }

    /// Logs a debug message, shown only when verbose.
    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Verbose, "DEBUG", message);
    }

    /// Writes text to stderr as is, unless quiet.
    ///
    /// Used for banners and other framing that carries no level prefix.
    pub fn raw(&self, text: &str) {
        if self.enabled(LogLevel::Normal) {
            eprintln!("{text}");
        }
    }

    fn emit(&self, level: LogLevel, label: &str, message: &str) {
        if self.enabled(level) {
            eprintln!("{label}: {message}");
        }
    }
}

/// Picks a logger from CLI flags, then `CONFSCHEMA_LOG_MODE`, then the default.
///
/// `verbose` wins over `quiet` when both are set. An unparsable environment
/// value is ignored.
///
/// # Examples
///
/// ```
/// use confschema::{init_logger, LogLevel};
///
/// assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
/// assert_eq!(init_logger(false, true).level(), LogLevel::Quiet);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    let level = env::var(LOG_MODE_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default();
    Logger::new(level)
}
