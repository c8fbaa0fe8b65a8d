//! Error types.

use thiserror::Error;

/// Errors surfaced by environment store reads.
///
/// Writes and deletes never fail from the caller's point of view, so this
/// only covers the conversion of platform strings back into script strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Cannot create a string longer than {limit} wide characters (got {units})")]
    StringTooLong { units: usize, limit: usize },
}

impl EnvError {
    /// Stable error code, as seen by scripts.
    pub fn code(&self) -> &'static str {
        match self {
            EnvError::StringTooLong { .. } => "ERR_STRING_TOO_LONG",
        }
    }
}

/// A deprecation warning could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{code}] DeprecationWarning: {message}")]
pub struct DeprecationError {
    pub code: String,
    pub message: String,
}
