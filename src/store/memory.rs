//! In-memory environment store
//!
//! Same contract as the process store, over a private list of pairs. Used
//! for sandboxed script runs (`procenv --sandbox`) and as a test double.

use super::wide::{MAX_VALUE_UNITS, wide_len};
use super::{Descriptor, EnvStore, env_lock, is_hidden};
use crate::error::EnvError;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How variable names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCase {
    #[default]
    Sensitive,
    /// ASCII case-insensitive, as on Windows.
    Insensitive,
}

impl NameCase {
    /// The convention of the platform we are running on.
    pub fn platform() -> Self {
        if cfg!(windows) {
            NameCase::Insensitive
        } else {
            NameCase::Sensitive
        }
    }

    fn eq(self, a: &str, b: &str) -> bool {
        match self {
            NameCase::Sensitive => a == b,
            NameCase::Insensitive => a.eq_ignore_ascii_case(b),
        }
    }
}

/// Store that keeps variables in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryEnvStore {
    vars: Mutex<Vec<(String, String)>>,
    case: NameCase,
    value_limit: Option<usize>,
}

impl MemoryEnvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current process environment, hidden entries included.
    pub fn snapshot() -> Self {
        let vars = {
            let _guard = env_lock();
            std::env::vars_os()
                .map(|(k, v)| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
                .collect()
        };

        Self {
            vars: Mutex::new(vars),
            case: NameCase::platform(),
            value_limit: None,
        }
    }

    pub fn with_case(mut self, case: NameCase) -> Self {
        self.case = case;
        self
    }

    /// Refuse reads of values whose UTF-16 length reaches `units`, the way
    /// a wide-string platform does.
    pub fn with_value_limit(mut self, units: usize) -> Self {
        self.value_limit = Some(units);
        self
    }

    /// Emulate the Windows limit of [`MAX_VALUE_UNITS`].
    pub fn with_wide_limit(self) -> Self {
        self.with_value_limit(MAX_VALUE_UNITS)
    }

    /// Insert a variable bypassing the hidden-name guard, to model state
    /// the platform created on its own.
    pub fn insert_raw(&self, name: &str, value: &str) {
        self.put(name, value);
    }

    /// Number of stored entries, hidden ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, String)>> {
        self.vars.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn put(&self, name: &str, value: &str) {
        let mut vars = self.lock();
        match vars.iter_mut().find(|(k, _)| self.case.eq(k, name)) {
            Some((_, v)) => *v = value.to_string(),
            None => vars.push((name.to_string(), value.to_string())),
        }
    }

    fn check_value(&self, value: &str) -> Result<(), EnvError> {
        match self.value_limit {
            Some(limit) => {
                let units = wide_len(value);
                if units >= limit {
                    return Err(EnvError::StringTooLong { units, limit });
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl EnvStore for MemoryEnvStore {
    fn get(&self, name: &str) -> Result<Option<String>, EnvError> {
        let vars = self.lock();
        match vars.iter().find(|(k, _)| self.case.eq(k, name)) {
            Some((_, v)) => {
                self.check_value(v)?;
                Ok(Some(v.clone()))
            }
            None => Ok(None),
        }
    }

    fn set(&self, name: &str, value: &str) {
        if is_hidden(name) || name.is_empty() {
            return;
        }
        self.put(name, value);
    }

    fn query(&self, name: &str) -> Descriptor {
        let vars = self.lock();
        match vars.iter().find(|(k, _)| self.case.eq(k, name)) {
            Some(_) => Descriptor::for_existing(name),
            None => Descriptor::NotFound,
        }
    }

    fn delete(&self, name: &str) {
        if is_hidden(name) {
            return;
        }
        self.lock().retain(|(k, _)| !self.case.eq(k, name));
    }

    fn enumerate(&self) -> Result<Vec<String>, EnvError> {
        Ok(self
            .lock()
            .iter()
            .filter(|(k, _)| !is_hidden(k))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProcessEnvStore;

    #[test]
    fn test_scenario_set_query_delete() {
        let store = MemoryEnvStore::new();
        store.set("FOO", "bar");
        assert_eq!(store.get("FOO").unwrap().as_deref(), Some("bar"));
        assert_eq!(store.query("FOO"), Descriptor::Normal);

        store.delete("FOO");
        assert_eq!(store.get("FOO").unwrap(), None);
        assert_eq!(store.query("FOO"), Descriptor::NotFound);
        assert!(store.enumerate().unwrap().is_empty());
    }

    #[test]
    fn test_enumerate_keeps_insertion_order() {
        let store = MemoryEnvStore::new();
        store.set("ZED", "1");
        store.set("ALPHA", "2");
        store.set("MID", "3");
        store.set("ZED", "4");
        assert_eq!(store.enumerate().unwrap(), vec!["ZED", "ALPHA", "MID"]);
    }

    #[test]
    fn test_hidden_entries() {
        let store = MemoryEnvStore::new();
        store.insert_raw("=C:", "C:\\work");
        store.set("=C:", "D:\\elsewhere");
        store.delete("=C:");
        store.set("=X", "v");

        assert_eq!(store.get("=C:").unwrap().as_deref(), Some("C:\\work"));
        assert_eq!(store.query("=C:"), Descriptor::HiddenReadOnly);
        assert_eq!(store.query("=X"), Descriptor::NotFound);
        assert!(store.enumerate().unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_case_insensitive_names() {
        let store = MemoryEnvStore::new().with_case(NameCase::Insensitive);
        store.set("Path", "a");
        store.set("PATH", "b");
        assert_eq!(store.get("path").unwrap().as_deref(), Some("b"));
        assert_eq!(store.enumerate().unwrap(), vec!["Path"]);

        store.delete("pAtH");
        assert!(store.is_empty());
    }

    #[test]
    fn test_case_sensitive_names() {
        let store = MemoryEnvStore::new();
        store.set("Path", "a");
        store.set("PATH", "b");
        assert_eq!(store.get("Path").unwrap().as_deref(), Some("a"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_wide_limit() {
        let store = MemoryEnvStore::new().with_wide_limit();
        store.set("BIG", &"x".repeat(MAX_VALUE_UNITS));
        store.set("SMALL", "ok");

        assert_eq!(
            store.get("BIG").unwrap_err(),
            EnvError::StringTooLong {
                units: MAX_VALUE_UNITS,
                limit: MAX_VALUE_UNITS
            }
        );
        assert_eq!(store.query("BIG"), Descriptor::Normal);
        assert_eq!(store.get("SMALL").unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn test_custom_value_limit() {
        let store = MemoryEnvStore::new().with_value_limit(4);
        store.set("A", "abc");
        store.set("B", "abcd");
        assert!(store.get("A").is_ok());
        assert_eq!(
            store.get("B").unwrap_err(),
            EnvError::StringTooLong { units: 4, limit: 4 }
        );
    }

    #[test]
    fn test_snapshot_matches_process() {
        let name = "PROCENV_TEST_MEMORY_SNAPSHOT";
        ProcessEnvStore::shared().set(name, "seen");
        let snapshot = MemoryEnvStore::snapshot();
        ProcessEnvStore::shared().delete(name);

        assert_eq!(snapshot.get(name).unwrap().as_deref(), Some("seen"));
        snapshot.set(name, "changed");
        assert_eq!(ProcessEnvStore::shared().get(name).unwrap(), None);
    }
}
