//! Typed access to bound arguments.
//!
//! The marshaling layer has already applied defaults and coerced values to
//! the declared type, so these helpers mostly unpack; the error paths cover
//! functions invoked outside the adapters.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::handler::ArgMap;

/// Required string argument.
pub fn str_arg<'a>(args: &'a ArgMap, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_params(format!("`{}` must be a string", name)))
}

/// Optional string argument.
pub fn opt_str_arg<'a>(args: &'a ArgMap, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

/// Required integer argument.
pub fn int_arg(args: &ArgMap, name: &str) -> Result<i64> {
    args.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::invalid_params(format!("`{}` must be an integer", name)))
}

/// Optional integer argument; present but ill-typed is an error.
pub fn opt_int_arg(args: &ArgMap, name: &str) -> Result<Option<i64>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::invalid_params(format!("`{}` must be an integer", name))),
    }
}

/// Boolean argument; absent means false.
pub fn bool_arg(args: &ArgMap, name: &str) -> bool {
    args.get(name).and_then(Value::as_bool).unwrap_or(false)
}
