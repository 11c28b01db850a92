//! Error types for the confschema library.
//!
//! Schema problems, configuration problems and command-line override problems
//! are kept apart so callers can decide which ones are the user's fault.
//! Failures raised by individual converters live in
//! [`ConvertError`](crate::converter::ConvertError) and are folded into
//! [`Error::Config`] by the validator.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a confschema error.
///
/// # Examples
///
/// ```
/// use confschema::{Error, Result};
///
/// fn require_threads(threads: i64) -> Result<i64> {
///     if threads < 1 {
///         return Err(Error::config(format!("Bad value ('{threads}') for option 'threads'.")));
///     }
///     Ok(threads)
/// }
///
/// assert!(require_threads(0).unwrap_err().is_config());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the confschema library.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema specification itself is malformed.
    ///
    /// Raised while a schema is being built: wrong entry arity, unknown
    /// converter names, unusable converter fields, duplicate keys or
    /// unparsable schema text.
    #[error("schema specification error: {message}")]
    Schema {
        /// A description of the problem.
        message: String,
    },

    /// A configuration does not satisfy an otherwise valid schema.
    #[error("configuration error: {message}")]
    Config {
        /// A description naming the offending setting and/or value.
        message: String,
    },

    /// A command-line override could not be interpreted.
    #[error("option error: {message}")]
    Option {
        /// A description of the problem.
        message: String,
    },

    /// Packing or unpacking a scaffolding archive failed.
    #[error("archive error for {}: {reason}", path.display())]
    Archive {
        /// The archive or directory involved.
        path: PathBuf,
        /// The reason the operation failed.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering a value as YAML failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Builds a [`Error::Schema`] from a message.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Builds a [`Error::Config`] from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Builds a [`Error::Option`] from a message.
    pub fn option(message: impl Into<String>) -> Self {
        Self::Option {
            message: message.into(),
        }
    }

    /// Check if error is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use confschema::Error;
    ///
    /// let err = Error::config("Unknown setting: 'bogus'");
    /// assert!(err.is_config());
    /// ```
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Check if error is a schema specification error.
    ///
    /// # Examples
    ///
    /// ```
    /// use confschema::Error;
    ///
    /// let err = Error::schema("No such converter: 'nope'");
    /// assert!(err.is_schema());
    /// ```
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}
