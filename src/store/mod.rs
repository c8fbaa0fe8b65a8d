//! Environment stores
//!
//! An [`EnvStore`] is the capability the `ENV` object delegates to. The
//! production implementation is [`ProcessEnvStore`], which talks to the real
//! process environment; [`MemoryEnvStore`] keeps pairs in memory and backs
//! sandboxed runs and tests.
//!
//! ## Hidden variables
//!
//! A name starting with `=` is hidden (Windows keeps per-drive working
//! directories as `=C:=C:\...`). Hidden names are never enumerated, never
//! written and never deleted through a store, on every platform.

pub mod memory;
pub mod process;
pub mod wide;

pub use memory::{MemoryEnvStore, NameCase};
pub use process::{ProcessEnvStore, env_lock};

use crate::error::EnvError;

/// First character of a hidden variable name.
pub const HIDDEN_MARKER: char = '=';

/// Returns true if `name` is a hidden variable name.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Existence and access rights of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// Not set.
    NotFound,
    /// Set; writable, deletable and enumerable.
    Normal,
    /// Set but hidden: not writable, not deletable, not enumerable.
    HiddenReadOnly,
}

impl Descriptor {
    /// Classify a name known to exist.
    pub fn for_existing(name: &str) -> Self {
        if is_hidden(name) {
            Descriptor::HiddenReadOnly
        } else {
            Descriptor::Normal
        }
    }

    pub fn is_found(self) -> bool {
        self != Descriptor::NotFound
    }
}

/// Backing store for the `ENV` object.
///
/// Every method reads or writes the live table; implementations keep no
/// cached view. `set` and `delete` have no failure channel: refused writes
/// are silently dropped.
pub trait EnvStore: Send + Sync {
    /// Current value of `name`, or `None` if unset.
    fn get(&self, name: &str) -> Result<Option<String>, EnvError>;

    /// Create or overwrite `name`. No-op for hidden names.
    fn set(&self, name: &str, value: &str);

    /// Classify `name` without reading its value.
    fn query(&self, name: &str) -> Descriptor;

    /// Remove `name` if present. No-op for hidden or missing names.
    fn delete(&self, name: &str);

    /// Visible names in table order.
    fn enumerate(&self) -> Result<Vec<String>, EnvError>;
}
