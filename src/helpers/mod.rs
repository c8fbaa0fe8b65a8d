//! Script helper functions
//!
//! Everything registered on the Rhai engine for scripts lives here.
//!
//! ## Categories
//!
//! - **env**: the `ENV` object (`Env` type), `process_env()`, `env`, `set_env`

pub mod env;

use crate::proxy::EnvProxy;
use rhai::Engine;

/// Register all helper functions with the Rhai engine
pub fn register_all(engine: &mut Engine, proxy: &EnvProxy) {
    env::register(engine, proxy);
}
