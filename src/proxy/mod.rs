//! The `ENV` object
//!
//! [`EnvProxy`] turns the generic property operations a script performs on
//! `ENV` (get, set, query, delete, enumerate) into [`EnvStore`] calls and
//! applies the rules that belong to the script-facing object rather than to
//! the store:
//!
//! - only string keys are looked up; other keys read as `()`
//! - assignments coerce the key and value to strings and always evaluate to
//!   the assigned value, whether or not the write took
//! - deletes always report success
//! - non-primitive assignments warn once per context when pending
//!   deprecation is on
//!
//! [`EnvStore`]: crate::store::EnvStore

pub mod deprecation;

use crate::engine::ScriptContext;
use crate::error::EnvError;
use crate::store::Descriptor;
use bitflags::bitflags;
use deprecation::{DEP0104_CODE, DEP0104_MESSAGE};
use rhai::{Array, Dynamic, Map};
use std::sync::Arc;
use tracing::debug;

bitflags! {
    /// Attribute bits of an `ENV` property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u32 {
        const READ_ONLY = 1;
        const DONT_ENUM = 2;
        const DONT_DELETE = 4;
    }
}

impl PropertyFlags {
    /// Host attributes for a store classification; `None` if not found.
    pub fn from_descriptor(descriptor: Descriptor) -> Option<Self> {
        match descriptor {
            Descriptor::NotFound => None,
            Descriptor::Normal => Some(PropertyFlags::empty()),
            Descriptor::HiddenReadOnly => Some(
                PropertyFlags::READ_ONLY | PropertyFlags::DONT_DELETE | PropertyFlags::DONT_ENUM,
            ),
        }
    }

    /// Script view: `#{ writable, enumerable, configurable }`.
    pub fn to_map(self) -> Map {
        let mut map = Map::new();
        map.insert("writable".into(), (!self.contains(Self::READ_ONLY)).into());
        map.insert("enumerable".into(), (!self.contains(Self::DONT_ENUM)).into());
        map.insert("configurable".into(), (!self.contains(Self::DONT_DELETE)).into());
        map
    }
}

/// Property name of a key, if it is a string.
fn property_name(key: &Dynamic) -> Option<String> {
    if key.is_string() {
        key.clone().into_string().ok()
    } else if key.is_char() {
        key.as_char().ok().map(String::from)
    } else {
        None
    }
}

/// Values that assign without a deprecation warning.
fn is_primitive(value: &Dynamic) -> bool {
    value.is_string() || value.is_char() || value.is_int() || value.is_float() || value.is_bool()
}

/// Coercion used outside of a running script: the value's display form.
pub fn display_string(value: &Dynamic) -> Option<String> {
    Some(value.to_string())
}

/// Script-facing handle on the environment of one script context.
#[derive(Clone)]
pub struct EnvProxy {
    ctx: Arc<ScriptContext>,
}

impl EnvProxy {
    pub fn new(ctx: Arc<ScriptContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ScriptContext {
        &self.ctx
    }

    /// Value of `key`, `()` if unset or if the key is not a string.
    pub fn get(&self, key: &Dynamic) -> Result<Dynamic, EnvError> {
        let Some(name) = property_name(key) else {
            return Ok(Dynamic::UNIT);
        };
        Ok(self
            .ctx
            .store()
            .get(&name)?
            .map(Dynamic::from)
            .unwrap_or(Dynamic::UNIT))
    }

    /// Assign `value` to `key` using [`display_string`] coercion.
    pub fn set(&self, key: &Dynamic, value: Dynamic) -> Dynamic {
        self.set_with(key, value, display_string)
    }

    /// Assign `value` to `key`, converting non-string keys and values with
    /// `coerce`.
    ///
    /// Always returns `value`. A failed coercion or a failed deprecation
    /// warning leaves the environment untouched.
    pub fn set_with<F>(&self, key: &Dynamic, value: Dynamic, coerce: F) -> Dynamic
    where
        F: Fn(&Dynamic) -> Option<String>,
    {
        // The warned flag is flipped last, once every other condition holds.
        if self.ctx.options().pending_deprecation
            && !is_primitive(&value)
            && self.ctx.emit_process_env_warning()
            && let Err(err) = self.ctx.warnings().emit(DEP0104_MESSAGE, DEP0104_CODE)
        {
            debug!(%err, "ENV assignment abandoned");
            return value;
        }

        let Some(name) = property_name(key).or_else(|| coerce(key)) else {
            debug!(key = %key.type_name(), "ENV key is not convertible to a string");
            return value;
        };
        let text = if value.is_string() {
            value.clone().into_string().ok()
        } else {
            coerce(&value)
        };
        let Some(text) = text else {
            debug!(name, "ENV value is not convertible to a string");
            return value;
        };

        self.ctx.store().set(&name, &text);
        value
    }

    /// Attributes of `key`; `None` if it does not exist or is not a string.
    pub fn query(&self, key: &Dynamic) -> Option<PropertyFlags> {
        let name = property_name(key)?;
        PropertyFlags::from_descriptor(self.ctx.store().query(&name))
    }

    /// Whether `name` exists, hidden variables included.
    pub fn contains(&self, name: &str) -> bool {
        self.ctx.store().query(name).is_found()
    }

    /// Delete `key`. Always true, whatever happened.
    pub fn delete(&self, key: &Dynamic) -> bool {
        if let Some(name) = property_name(key) {
            self.ctx.store().delete(&name);
        }
        true
    }

    /// Visible variable names in environment order.
    pub fn enumerate(&self) -> Result<Array, EnvError> {
        Ok(self
            .ctx
            .store()
            .enumerate()?
            .into_iter()
            .map(Dynamic::from)
            .collect())
    }
}

impl std::fmt::Debug for EnvProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Env")
    }
}
