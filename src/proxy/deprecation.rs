//! Deprecation warnings
//!
//! The `ENV` object warns once per script context when a value that is not
//! a string, number or boolean is assigned to it. Delivery is pluggable:
//! hosts provide a [`DeprecationSink`].

use crate::error::DeprecationError;
use crate::output;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};

/// Code of the non-primitive assignment warning.
pub const DEP0104_CODE: &str = "DEP0104";

/// Text of the non-primitive assignment warning.
pub const DEP0104_MESSAGE: &str = "Assigning any value other than a string, number, or boolean to \
     an ENV property is deprecated. Please make sure to convert the value to a string before \
     setting ENV with it.";

/// Receives deprecation warnings.
///
/// An `Err` means the warning turned into a failure (for example in throw
/// mode); the operation that triggered it is abandoned.
pub trait DeprecationSink: Send + Sync {
    fn emit(&self, message: &str, code: &str) -> Result<(), DeprecationError>;
}

/// What to do with a deprecation warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningMode {
    /// Print to stderr.
    #[default]
    Print,
    /// Drop silently.
    Silent,
    /// Fail the emission.
    Throw,
}

/// Sink writing warnings to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrWarnings {
    mode: WarningMode,
}

impl StderrWarnings {
    pub fn new(mode: WarningMode) -> Self {
        Self { mode }
    }
}

impl DeprecationSink for StderrWarnings {
    fn emit(&self, message: &str, code: &str) -> Result<(), DeprecationError> {
        match self.mode {
            WarningMode::Print => {
                output::warning(&format!("[{code}] DeprecationWarning: {message}"));
                Ok(())
            }
            WarningMode::Silent => Ok(()),
            WarningMode::Throw => Err(DeprecationError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Sink that remembers the codes it was given.
#[derive(Debug, Default)]
pub struct RecordingWarnings {
    codes: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose emissions fail after being recorded.
    pub fn failing() -> Self {
        Self {
            codes: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn codes(&self) -> Vec<String> {
        self.codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DeprecationSink for RecordingWarnings {
    fn emit(&self, message: &str, code: &str) -> Result<(), DeprecationError> {
        self.codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(code.to_string());
        if self.fail {
            return Err(DeprecationError {
                code: code.to_string(),
                message: message.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_modes() {
        assert!(StderrWarnings::new(WarningMode::Print).emit("m", DEP0104_CODE).is_ok());
        assert!(StderrWarnings::new(WarningMode::Silent).emit("m", DEP0104_CODE).is_ok());

        let err = StderrWarnings::new(WarningMode::Throw)
            .emit("m", DEP0104_CODE)
            .unwrap_err();
        assert_eq!(err.code, "DEP0104");
    }

    #[test]
    fn test_recording() {
        let sink = RecordingWarnings::new();
        sink.emit("a", "X1").unwrap();
        sink.emit("b", "X2").unwrap();
        assert_eq!(sink.codes(), vec!["X1", "X2"]);

        let failing = RecordingWarnings::failing();
        assert!(failing.emit("a", "X1").is_err());
        assert_eq!(failing.codes(), vec!["X1"]);
    }

    #[test]
    fn test_warning_mode_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: WarningMode,
        }
        let w: Wrapper = toml::from_str(r#"mode = "throw""#).unwrap();
        assert_eq!(w.mode, WarningMode::Throw);
    }
}
