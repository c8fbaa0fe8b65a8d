//! Process environment store
//!
//! [`ProcessEnvStore`] reads and writes the real environment of the running
//! process. The environment block is global state shared with every thread
//! and with native code we do not control, so all access goes through one
//! process-wide lock ([`env_lock`]) held only for the duration of the OS
//! calls.

use super::{Descriptor, EnvStore, is_hidden};
use crate::error::EnvError;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::trace;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Acquire the process-wide environment lock.
///
/// Anything in the process that touches the environment outside of
/// [`ProcessEnvStore`] should hold this guard while doing so. A panic while
/// the lock was held does not poison it for later callers.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Store backed by the live process environment.
///
/// There is exactly one per process, obtained with [`ProcessEnvStore::shared`].
#[derive(Debug)]
pub struct ProcessEnvStore {
    _private: (),
}

impl ProcessEnvStore {
    /// The process-wide instance. Created on first use, never dropped.
    pub fn shared() -> Arc<ProcessEnvStore> {
        static STORE: OnceLock<Arc<ProcessEnvStore>> = OnceLock::new();
        STORE
            .get_or_init(|| Arc::new(ProcessEnvStore { _private: () }))
            .clone()
    }
}

/// Whether the OS can look up or store a variable called `name`.
///
/// `=` is only legal as the first character (hidden names); anything else
/// would be parsed as the name/value separator.
fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('\0') && !name.bytes().skip(1).any(|b| b == b'=')
}

/// Whether the OS can store `value`. Refused values are dropped silently.
fn valid_value(value: &str) -> bool {
    if value.contains('\0') {
        return false;
    }
    !(cfg!(windows) && super::wide::check_len(super::wide::wide_len(value)).is_err())
}

#[cfg(not(windows))]
fn to_external(os: OsString) -> Result<String, EnvError> {
    Ok(os
        .into_string()
        .unwrap_or_else(|raw| raw.to_string_lossy().into_owned()))
}

#[cfg(windows)]
fn to_external(os: OsString) -> Result<String, EnvError> {
    use std::os::windows::ffi::OsStrExt;

    let units: Vec<u16> = os.encode_wide().collect();
    super::wide::to_external(&units)
}

impl EnvStore for ProcessEnvStore {
    fn get(&self, name: &str) -> Result<Option<String>, EnvError> {
        trace!(name, "env get");
        if !valid_name(name) {
            return Ok(None);
        }

        let _guard = env_lock();
        std::env::var_os(name).map(to_external).transpose()
    }

    fn set(&self, name: &str, value: &str) {
        trace!(name, "env set");
        if is_hidden(name) || !valid_name(name) || !valid_value(value) {
            return;
        }

        let _guard = env_lock();
        // SAFETY: every environment access made through this crate holds
        // ENV_LOCK, and std serializes its own getenv/setenv calls.
        unsafe { std::env::set_var(name, value) };
    }

    fn query(&self, name: &str) -> Descriptor {
        trace!(name, "env query");
        if !valid_name(name) {
            return Descriptor::NotFound;
        }

        let _guard = env_lock();
        match std::env::var_os(name) {
            Some(_) => Descriptor::for_existing(name),
            None => Descriptor::NotFound,
        }
    }

    fn delete(&self, name: &str) {
        trace!(name, "env delete");
        if is_hidden(name) || !valid_name(name) {
            return;
        }

        let _guard = env_lock();
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(name) };
    }

    fn enumerate(&self) -> Result<Vec<String>, EnvError> {
        trace!("env enumerate");
        let _guard = env_lock();

        let mut names = Vec::new();
        for (name, _) in std::env::vars_os() {
            let name = to_external(name)?;
            if is_hidden(&name) {
                continue;
            }
            names.push(name);
        }
        Ok(names)
    }
}
