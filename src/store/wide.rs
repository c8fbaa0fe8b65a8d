//! Wide-string conversion
//!
//! Windows keeps the environment as UTF-16. A single variable may hold at
//! most 32767 wide units including the terminating NUL, so anything of that
//! length or longer cannot have come back intact from the OS and is refused
//! rather than truncated.

use crate::error::EnvError;

/// Buffer size, in wide units, the OS allows for one variable.
pub const MAX_VALUE_UNITS: usize = 32767;

/// Convert a UTF-16 name or value into a script string.
///
/// Unpaired surrogates are replaced with U+FFFD. Fails with
/// [`EnvError::StringTooLong`] once `units` no longer fits the OS buffer.
pub fn to_external(units: &[u16]) -> Result<String, EnvError> {
    check_len(units.len())?;
    Ok(String::from_utf16_lossy(units))
}

/// Fail if a wide string of `units` length exceeds the OS limit.
pub fn check_len(units: usize) -> Result<(), EnvError> {
    if units >= MAX_VALUE_UNITS {
        return Err(EnvError::StringTooLong {
            units,
            limit: MAX_VALUE_UNITS,
        });
    }
    Ok(())
}

/// UTF-16 length of a string.
pub fn wide_len(s: &str) -> usize {
    s.encode_utf16().count()
}
