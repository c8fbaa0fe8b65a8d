//! Live process environment object for Rhai scripts
//!
//! Scripts see the environment of the running process as `ENV`. Reads,
//! writes, existence checks, deletions and enumeration go straight to the
//! real environment table, so changes are visible to child processes and to
//! native code in the same process.
//!
//! # Example Script
//!
//! ```rhai
//! ENV.BUILD_MODE = "release";
//! ENV.JOBS = 8;                    // stored as "8"
//!
//! if "CI" in ENV {
//!     print(`running under CI: ${ENV.CI}`);
//! }
//!
//! ENV.remove("TMP_FLAG");          // always true
//!
//! for name in ENV.keys() {
//!     print(`${name}=${ENV[name]}`);
//! }
//! ```
//!
//! # Hidden Variables
//!
//! Names starting with `=` (Windows per-drive directories such as `=C:`)
//! are readable but never listed by `ENV.keys()`, never written and never
//! deleted. `ENV.query("=C:")` reports them as not writable, not enumerable
//! and not configurable.
//!
//! # Embedding
//!
//! [`ScriptHost`] owns a Rhai engine with `ENV` installed. Stores are
//! pluggable through [`EnvStore`]: [`ProcessEnvStore`] is the real
//! environment, [`MemoryEnvStore`] an in-memory copy.

pub mod config;
mod engine;
pub mod error;
mod helpers;
pub mod output;
pub mod proxy;
pub mod store;

pub use config::EnvOptions;
pub use engine::{ENV_VAR, ScriptContext, ScriptHost};
pub use error::{DeprecationError, EnvError};
pub use proxy::deprecation::{DeprecationSink, RecordingWarnings, StderrWarnings, WarningMode};
pub use proxy::{EnvProxy, PropertyFlags};
pub use store::{Descriptor, EnvStore, MemoryEnvStore, NameCase, ProcessEnvStore, env_lock};
