//! `ENV` object bindings
//!
//! Maps Rhai property, index and method syntax on `ENV` onto [`EnvProxy`]:
//!
//! ```rhai
//! ENV.PATH                      // get; () when unset
//! ENV["MY VAR"] = 42;           // set; stored as "42"
//! if "HOME" in ENV { ... }      // existence
//! ENV.query("=C:")              // () or #{ writable, enumerable, configurable }
//! ENV.remove("TMP_FLAG");       // always true
//! for name in ENV.keys() { ... }
//! ```

use crate::error::EnvError;
use crate::proxy::EnvProxy;
use rhai::{Array, Dynamic, Engine, EvalAltResult, ImmutableString, NativeCallContext};

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

fn script_error(e: EnvError) -> Box<EvalAltResult> {
    format!("{} ({})", e, e.code()).into()
}

/// Convert a value with the engine's own `to_string`, so conversions a
/// script defines are honoured. A conversion that throws yields `None`.
fn script_string(ctx: &NativeCallContext, value: &Dynamic) -> Option<String> {
    ctx.call_fn::<ImmutableString>("to_string", (value.clone(),))
        .ok()
        .map(|s| s.to_string())
}

fn index_get(env: &mut EnvProxy, key: Dynamic) -> ScriptResult<Dynamic> {
    env.get(&key).map_err(script_error)
}

fn index_set(ctx: NativeCallContext, env: &mut EnvProxy, key: Dynamic, value: Dynamic) {
    env.set_with(&key, value, |v| script_string(&ctx, v));
}

fn set(ctx: NativeCallContext, env: &mut EnvProxy, key: Dynamic, value: Dynamic) -> Dynamic {
    env.set_with(&key, value, |v| script_string(&ctx, v))
}

fn query(env: &mut EnvProxy, key: Dynamic) -> Dynamic {
    env.query(&key)
        .map(|flags| Dynamic::from(flags.to_map()))
        .unwrap_or(Dynamic::UNIT)
}

fn keys(env: &mut EnvProxy) -> ScriptResult<Array> {
    env.enumerate().map_err(script_error)
}

/// Register the `Env` type and its operations.
pub fn register(engine: &mut Engine, proxy: &EnvProxy) {
    engine.register_type_with_name::<EnvProxy>("Env");

    // String keys also serve `ENV.NAME` property syntax.
    engine.register_indexer_get(|env: &mut EnvProxy, name: ImmutableString| {
        index_get(env, name.into())
    });
    engine.register_indexer_set(
        |ctx: NativeCallContext, env: &mut EnvProxy, name: ImmutableString, value: Dynamic| {
            index_set(ctx, env, name.into(), value)
        },
    );
    engine.register_indexer_get(index_get);
    engine.register_indexer_set(index_set);

    engine.register_fn("set", set);
    engine.register_fn("query", query);
    engine.register_fn("keys", keys);
    engine.register_fn("remove", |env: &mut EnvProxy, key: Dynamic| env.delete(&key));
    // Also backs `key in ENV`; non-string keys are never present.
    engine.register_fn("contains", |env: &mut EnvProxy, key: Dynamic| {
        env.query(&key).is_some()
    });
    engine.register_fn("to_string", |_: &mut EnvProxy| "[object Env]".to_string());
    engine.register_fn("to_debug", |_: &mut EnvProxy| "[object Env]".to_string());

    // Script functions cannot see the global scope; this hands them `ENV`.
    let handle = proxy.clone();
    engine.register_fn("process_env", move || handle.clone());

    // Function-style helpers
    let getter = proxy.clone();
    engine.register_fn("env", move |name: &str| -> ScriptResult<String> {
        let value = getter
            .get(&Dynamic::from(name.to_string()))
            .map_err(script_error)?;
        Ok(value.into_string().unwrap_or_default())
    });
    let setter = proxy.clone();
    engine.register_fn("set_env", move |name: &str, value: &str| {
        setter.set(
            &Dynamic::from(name.to_string()),
            Dynamic::from(value.to_string()),
        );
    });
}
