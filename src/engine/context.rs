//! Per-script execution context
//!
//! Holds what the `ENV` object needs while a script runs: the bound store,
//! host options, and the warning sink together with the warned-once flag.

use crate::config::EnvOptions;
use crate::proxy::deprecation::DeprecationSink;
use crate::store::EnvStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Execution context shared by every `ENV` handle of one script host.
pub struct ScriptContext {
    store: Arc<dyn EnvStore>,
    options: EnvOptions,
    warnings: Arc<dyn DeprecationSink>,
    env_warning_emitted: AtomicBool,
}

impl ScriptContext {
    pub fn new(
        store: Arc<dyn EnvStore>,
        options: EnvOptions,
        warnings: Arc<dyn DeprecationSink>,
    ) -> Self {
        Self {
            store,
            options,
            warnings,
            env_warning_emitted: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &dyn EnvStore {
        self.store.as_ref()
    }

    pub fn options(&self) -> &EnvOptions {
        &self.options
    }

    pub fn warnings(&self) -> &dyn DeprecationSink {
        self.warnings.as_ref()
    }

    /// Claim the one `ENV` deprecation warning of this context.
    ///
    /// Returns true the first time only; callers emit the warning when it
    /// does.
    pub fn emit_process_env_warning(&self) -> bool {
        !self.env_warning_emitted.swap(true, Ordering::SeqCst)
    }

    pub fn env_warning_emitted(&self) -> bool {
        self.env_warning_emitted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::deprecation::RecordingWarnings;
    use crate::store::MemoryEnvStore;

    #[test]
    fn test_warning_claimed_once() {
        let ctx = ScriptContext::new(
            Arc::new(MemoryEnvStore::new()),
            EnvOptions::default(),
            Arc::new(RecordingWarnings::new()),
        );
        assert!(!ctx.env_warning_emitted());
        assert!(ctx.emit_process_env_warning());
        assert!(!ctx.emit_process_env_warning());
        assert!(ctx.env_warning_emitted());
    }

    #[test]
    fn test_claim_across_threads() {
        let ctx = Arc::new(ScriptContext::new(
            Arc::new(MemoryEnvStore::new()),
            EnvOptions::default(),
            Arc::new(RecordingWarnings::new()),
        ));
        let winners: usize = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                std::thread::spawn(move || ctx.emit_process_env_warning())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();
        assert_eq!(winners, 1);
    }
}
