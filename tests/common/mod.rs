//! Common test utilities.

#![allow(dead_code)]

use procenv::{EnvOptions, MemoryEnvStore, RecordingWarnings, ScriptHost, WarningMode};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Serializes tests that read the whole process environment.
pub fn test_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Options with warnings silenced.
pub fn quiet() -> EnvOptions {
    EnvOptions {
        warnings: WarningMode::Silent,
        ..EnvOptions::default()
    }
}

/// Host over an empty in-memory store.
pub fn memory_host(options: EnvOptions) -> (Arc<MemoryEnvStore>, Arc<RecordingWarnings>, ScriptHost) {
    host_over(MemoryEnvStore::new(), options)
}

/// Host over a given in-memory store, recording warnings.
pub fn host_over(
    store: MemoryEnvStore,
    options: EnvOptions,
) -> (Arc<MemoryEnvStore>, Arc<RecordingWarnings>, ScriptHost) {
    let store = Arc::new(store);
    let warnings = Arc::new(RecordingWarnings::new());
    let host = ScriptHost::with_store(store.clone(), options, warnings.clone());
    (store, warnings, host)
}
