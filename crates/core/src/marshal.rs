//! Descriptor-driven argument binding.
//!
//! All three adapters marshal raw input through the same path: filter to the
//! declared parameter set, apply defaults, enforce requiredness and choices,
//! and coerce values to the declared type. No per-function input types are
//! generated; the descriptor list is the schema.

use serde_json::Value;

use crate::descriptor::{FunctionSpec, ParamSpec, TypeSpec};
use crate::error::{Error, Result};
use crate::handler::ArgMap;

/// How raw values arrive.
///
/// `Text` inputs (CLI options, query strings) carry everything as strings
/// and are coerced to the declared type; `Json` inputs are already typed and
/// only checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    Text,
    Json,
}

/// Bind raw input against a function's parameter list.
///
/// Unknown keys are dropped, absent optional parameters fall back to their
/// descriptor default, and a missing required parameter is a client-class
/// error.
pub fn bind_args(spec: &FunctionSpec, input: &ArgMap, mode: ValueMode) -> Result<ArgMap> {
    let mut bound = ArgMap::new();
    for param in &spec.params {
        let supplied = input.get(&param.name).filter(|v| !v.is_null());
        let value = match supplied {
            Some(raw) => Some(coerce(param, raw, mode)?),
            None => param.default.clone(),
        };
        match value {
            Some(value) => {
                check_choices(param, &value)?;
                bound.insert(param.name.clone(), value);
            }
            None if param.required => {
                return Err(Error::invalid_params(format!(
                    "missing required parameter `{}`",
                    param.name
                )));
            }
            None => {}
        }
    }
    Ok(bound)
}

fn coerce(param: &ParamSpec, value: &Value, mode: ValueMode) -> Result<Value> {
    match mode {
        ValueMode::Text => coerce_text(&param.name, param.ty.unwrap_optional(), value),
        ValueMode::Json => check_json(&param.name, param.ty.unwrap_optional(), value),
    }
}

fn coerce_text(name: &str, ty: &TypeSpec, value: &Value) -> Result<Value> {
    let Value::String(s) = value else {
        // already typed (e.g. CLI integer parsers hand over numbers)
        return check_json(name, ty, value);
    };
    match ty {
        TypeSpec::Str | TypeSpec::Any | TypeSpec::Union(_) | TypeSpec::Choice(_) => {
            Ok(value.clone())
        }
        TypeSpec::Int => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| type_err(name, "an integer")),
        TypeSpec::Float => s
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| type_err(name, "a number")),
        TypeSpec::Bool => match s.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(type_err(name, "a boolean")),
        },
        TypeSpec::List(_) | TypeSpec::Dict(_, _) | TypeSpec::Tuple(_) => {
            let parsed: Value =
                serde_json::from_str(s).map_err(|_| type_err(name, "a JSON value"))?;
            check_json(name, ty, &parsed)
        }
        TypeSpec::Optional(inner) => coerce_text(name, inner, value),
    }
}

fn check_json(name: &str, ty: &TypeSpec, value: &Value) -> Result<Value> {
    let ok = match ty {
        TypeSpec::Any | TypeSpec::Union(_) | TypeSpec::Choice(_) => true,
        TypeSpec::Str => value.is_string(),
        TypeSpec::Int => value.is_i64() || value.is_u64(),
        TypeSpec::Float => value.is_number(),
        TypeSpec::Bool => value.is_boolean(),
        TypeSpec::List(_) | TypeSpec::Tuple(_) => value.is_array(),
        TypeSpec::Dict(_, _) => value.is_object(),
        TypeSpec::Optional(inner) => return check_json(name, inner, value),
    };
    if ok {
        Ok(value.clone())
    } else {
        Err(type_err(name, &format!("of type {}", ty)))
    }
}

fn check_choices(param: &ParamSpec, value: &Value) -> Result<()> {
    if let Some(choices) = &param.choices {
        if !choices.contains(value) {
            let rendered: Vec<String> = choices.iter().map(Value::to_string).collect();
            return Err(Error::invalid_params(format!(
                "parameter `{}` must be one of [{}]",
                param.name,
                rendered.join(", ")
            )));
        }
    }
    Ok(())
}

fn type_err(name: &str, expected: &str) -> Error {
    Error::invalid_params(format!("parameter `{}` must be {}", name, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FunctionBuilder;
    use serde_json::json;

    fn greet_spec() -> FunctionSpec {
        FunctionBuilder::new("greet")
            .param_default("name", TypeSpec::Str, json!("World"))
            .returns_structured()
            .build()
            .unwrap()
    }

    fn add_spec() -> FunctionSpec {
        FunctionBuilder::new("add")
            .param("a", TypeSpec::Int)
            .param("b", TypeSpec::Int)
            .returns_structured()
            .build()
            .unwrap()
    }

    #[test]
    fn defaults_fill_absent_optionals() {
        let bound = bind_args(&greet_spec(), &ArgMap::new(), ValueMode::Json).unwrap();
        assert_eq!(bound["name"], json!("World"));
    }

    #[test]
    fn missing_required_is_a_client_error() {
        let mut input = ArgMap::new();
        input.insert("a".into(), json!(2));
        let err = bind_args(&add_spec(), &input, ValueMode::Json).unwrap_err();
        assert!(err.is_client());
        assert!(err.to_string().contains("`b`"));
    }

    #[test]
    fn text_mode_coerces_strings() {
        let mut input = ArgMap::new();
        input.insert("a".into(), json!("2"));
        input.insert("b".into(), json!("3"));
        let bound = bind_args(&add_spec(), &input, ValueMode::Text).unwrap();
        assert_eq!(bound["a"], json!(2));
        assert_eq!(bound["b"], json!(3));
    }

    #[test]
    fn text_mode_rejects_non_numeric_strings() {
        let mut input = ArgMap::new();
        input.insert("a".into(), json!("two"));
        input.insert("b".into(), json!("3"));
        let err = bind_args(&add_spec(), &input, ValueMode::Text).unwrap_err();
        assert!(err.is_client());
    }

    #[test]
    fn json_mode_rejects_type_mismatches() {
        let mut input = ArgMap::new();
        input.insert("a".into(), json!("2"));
        input.insert("b".into(), json!(3));
        let err = bind_args(&add_spec(), &input, ValueMode::Json).unwrap_err();
        assert!(err.is_client());
        assert!(err.to_string().contains("`a`"));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let mut input = ArgMap::new();
        input.insert("name".into(), json!("Ada"));
        input.insert("shoe_size".into(), json!(42));
        let bound = bind_args(&greet_spec(), &input, ValueMode::Json).unwrap();
        assert_eq!(bound.len(), 1);
        assert_eq!(bound["name"], json!("Ada"));
    }

    #[test]
    fn container_params_accept_json_text() {
        let spec = FunctionBuilder::new("tag")
            .param("labels", TypeSpec::list(TypeSpec::Str))
            .returns_structured()
            .build()
            .unwrap();
        let mut input = ArgMap::new();
        input.insert("labels".into(), json!("[\"a\", \"b\"]"));
        let bound = bind_args(&spec, &input, ValueMode::Text).unwrap();
        assert_eq!(bound["labels"], json!(["a", "b"]));
    }

    #[test]
    fn choices_are_enforced() {
        let spec = FunctionBuilder::new("render")
            .param_choices(
                "format",
                vec![json!("mermaid"), json!("dot")],
                Some(json!("mermaid")),
            )
            .returns_structured()
            .build()
            .unwrap();

        let mut input = ArgMap::new();
        input.insert("format".into(), json!("png"));
        let err = bind_args(&spec, &input, ValueMode::Json).unwrap_err();
        assert!(err.is_client());
        assert!(err.to_string().contains("format"));

        let bound = bind_args(&spec, &ArgMap::new(), ValueMode::Json).unwrap();
        assert_eq!(bound["format"], json!("mermaid"));
    }

    #[test]
    fn optional_param_absent_stays_absent() {
        let spec = FunctionBuilder::new("probe")
            .param("limit", TypeSpec::optional(TypeSpec::Int))
            .returns_structured()
            .build()
            .unwrap();
        let bound = bind_args(&spec, &ArgMap::new(), ValueMode::Json).unwrap();
        assert!(!bound.contains_key("limit"));
    }

    #[test]
    fn null_counts_as_absent() {
        let spec = greet_spec();
        let mut input = ArgMap::new();
        input.insert("name".into(), Value::Null);
        let bound = bind_args(&spec, &input, ValueMode::Json).unwrap();
        assert_eq!(bound["name"], json!("World"));
    }
}
