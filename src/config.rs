//! Host options
//!
//! Options come from, lowest precedence first: defaults, a TOML config file,
//! the `PROCENV_PENDING_DEPRECATION` environment variable, and finally the
//! command line (applied by the caller).
//!
//! ```toml
//! pending_deprecation = true
//! warnings = "throw"    # print | silent | throw
//! sandbox = false
//! ```

use crate::proxy::deprecation::WarningMode;
use crate::store::{EnvStore, ProcessEnvStore};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that turns on pending deprecation warnings.
pub const PENDING_DEPRECATION_VAR: &str = "PROCENV_PENDING_DEPRECATION";

/// Options of a script host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvOptions {
    /// Warn when non-primitive values are assigned to `ENV`.
    pub pending_deprecation: bool,
    /// How deprecation warnings are delivered.
    pub warnings: WarningMode,
    /// Run against an in-memory copy of the environment.
    pub sandbox: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigToml {
    pending_deprecation: Option<bool>,
    warnings: Option<WarningMode>,
    sandbox: Option<bool>,
}

impl ConfigToml {
    fn apply(&self, options: &mut EnvOptions) {
        if let Some(pending) = self.pending_deprecation {
            options.pending_deprecation = pending;
        }
        if let Some(mode) = self.warnings {
            options.warnings = mode;
        }
        if let Some(sandbox) = self.sandbox {
            options.sandbox = sandbox;
        }
    }
}

/// `$XDG_CONFIG_HOME/procenv/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("procenv").join("config.toml"))
}

/// Parse config file contents on top of `options`.
pub fn apply_toml(options: &mut EnvOptions, text: &str) -> Result<()> {
    let parsed: ConfigToml = toml::from_str(text).context("Invalid config")?;
    parsed.apply(options);
    Ok(())
}

/// Interpret a flag-style environment value.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Apply environment variable overrides read through `store`.
pub fn apply_env(options: &mut EnvOptions, store: &dyn EnvStore) {
    if let Ok(Some(value)) = store.get(PENDING_DEPRECATION_VAR)
        && let Some(flag) = parse_flag(&value)
    {
        options.pending_deprecation = flag;
    }
}

/// Resolve options from the config file and the process environment.
///
/// An explicit `config_path` must exist; the default location is optional.
pub fn load(config_path: Option<&Path>) -> Result<EnvOptions> {
    let mut options = EnvOptions::default();

    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };
    if let Some(path) = path {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        apply_toml(&mut options, &text).with_context(|| format!("In {}", path.display()))?;
    }

    apply_env(&mut options, ProcessEnvStore::shared().as_ref());
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEnvStore;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = EnvOptions::default();
        assert!(!options.pending_deprecation);
        assert_eq!(options.warnings, WarningMode::Print);
        assert!(!options.sandbox);
    }

    #[test]
    fn test_toml_overrides_only_given_fields() {
        let mut options = EnvOptions {
            sandbox: true,
            ..EnvOptions::default()
        };
        apply_toml(&mut options, "pending_deprecation = true\nwarnings = \"silent\"\n").unwrap();
        assert!(options.pending_deprecation);
        assert_eq!(options.warnings, WarningMode::Silent);
        assert!(options.sandbox);
    }

    #[test]
    fn test_bad_toml() {
        let mut options = EnvOptions::default();
        assert!(apply_toml(&mut options, "warnings = \"loud\"").is_err());
        assert!(apply_toml(&mut options, "sandbox = ").is_err());
    }

    #[test]
    fn test_env_flag() {
        let store = MemoryEnvStore::new();
        let mut options = EnvOptions::default();

        apply_env(&mut options, &store);
        assert!(!options.pending_deprecation);

        store.set(PENDING_DEPRECATION_VAR, "1");
        apply_env(&mut options, &store);
        assert!(options.pending_deprecation);

        store.set(PENDING_DEPRECATION_VAR, "bogus");
        apply_env(&mut options, &store);
        assert!(options.pending_deprecation);

        store.set(PENDING_DEPRECATION_VAR, "off");
        apply_env(&mut options, &store);
        assert!(!options.pending_deprecation);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "warnings = \"throw\"\nsandbox = true\n").unwrap();

        let options = load(Some(&path)).unwrap();
        assert_eq!(options.warnings, WarningMode::Throw);
        assert!(options.sandbox);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = load(Some(Path::new("/nonexistent/procenv.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
