//! Rhai script host
//!
//! Provides the execution environment for scripts that use `ENV`.

mod context;

pub use context::ScriptContext;

use crate::config::EnvOptions;
use crate::helpers;
use crate::proxy::EnvProxy;
use crate::proxy::deprecation::{DeprecationSink, StderrWarnings};
use crate::store::{EnvStore, MemoryEnvStore, ProcessEnvStore};
use anyhow::{Context, Result, anyhow};
use rhai::{Dynamic, Engine, Scope};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Name of the global variable bound to the environment object.
pub const ENV_VAR: &str = "ENV";

/// Script engine with the environment object installed
pub struct ScriptHost {
    engine: Engine,
    proxy: EnvProxy,
}

impl ScriptHost {
    /// Create a host bound to the process environment, or to a snapshot of
    /// it when `options.sandbox` is set
    pub fn new(options: EnvOptions) -> Self {
        let store: Arc<dyn EnvStore> = if options.sandbox {
            Arc::new(MemoryEnvStore::snapshot())
        } else {
            ProcessEnvStore::shared()
        };
        let warnings = Arc::new(StderrWarnings::new(options.warnings));
        Self::with_store(store, options, warnings)
    }

    /// Create a host bound to an explicit store and warning sink
    pub fn with_store(
        store: Arc<dyn EnvStore>,
        options: EnvOptions,
        warnings: Arc<dyn DeprecationSink>,
    ) -> Self {
        debug!(?options, "creating script host");
        let proxy = EnvProxy::new(Arc::new(ScriptContext::new(store, options, warnings)));

        let mut engine = Engine::new();
        helpers::register_all(&mut engine, &proxy);

        Self { engine, proxy }
    }

    /// The environment object scripts see as `ENV`
    pub fn proxy(&self) -> &EnvProxy {
        &self.proxy
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Fresh scope per run. `ENV` is a plain variable rather than a constant
    /// because constants reject indexer setters; a script that rebinds it
    /// only loses the binding for the rest of that run.
    fn scope(&self) -> Scope<'static> {
        let mut scope = Scope::new();
        scope.push(ENV_VAR, self.proxy.clone());
        scope
    }

    /// Evaluate a script and return its result
    pub fn eval<T: Any + Clone + Send + Sync>(&self, script: &str) -> Result<T> {
        let mut scope = self.scope();
        self.engine
            .eval_with_scope::<T>(&mut scope, script)
            .map_err(|e| anyhow!("Script failed: {}", e))
    }

    /// Evaluate a script and return its result as a dynamic value
    pub fn eval_dynamic(&self, script: &str) -> Result<Dynamic> {
        self.eval::<Dynamic>(script)
    }

    /// Run a script for its side effects
    pub fn run(&self, script: &str) -> Result<()> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| anyhow!("Failed to compile script: {}", e))?;

        let mut scope = self.scope();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| anyhow!("Script failed: {}", e))
    }

    /// Run a script file
    pub fn run_file(&self, path: &Path) -> Result<()> {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        debug!(path = %path.display(), "running script");
        self.run(&script)
            .with_context(|| format!("Error in {}", path.display()))
    }
}
