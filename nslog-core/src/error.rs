//! Typed error handling for nslog.
//!
//! Validation failures are raised synchronously at the call that caused them
//! (logger construction or a level change) so callers can match on them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for nslog operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggerError {
    /// Namespace was empty or whitespace-only
    #[error("\"Namespace\" parameter cannot be empty.")]
    EmptyNamespace,

    /// String level not among the six recognized names
    #[error("'{name}' is not a valid logging level.")]
    UnknownLevelName {
        /// The offending name, lowercased
        name: String,
    },

    /// Level argument was neither a name nor a finite number
    #[error("Parameter \"level\" must be a string or number.")]
    InvalidLevelType,

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl LoggerError {
    /// Create an unknown-level error, lowercasing the name.
    pub fn unknown_level(name: impl AsRef<str>) -> Self {
        Self::UnknownLevelName {
            name: name.as_ref().to_lowercase(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error came from level validation.
    pub fn is_level_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownLevelName { .. } | Self::InvalidLevelType
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for nslog results.
pub type LoggerResult<T> = Result<T, LoggerError>;
