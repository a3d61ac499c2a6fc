//! JSON-schema synthesis from descriptors.

use serde_json::{json, Map, Value};

use crate::descriptor::FunctionSpec;

/// Build the object schema describing a function's input payload.
///
/// The same shape serves the body-bearing HTTP methods, the query-parameter
/// methods, and the agent-tool surface; only where the adapter reads the
/// values from differs.
pub fn input_schema(spec: &FunctionSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for param in &spec.params {
        let mut property = match param.ty.json_schema() {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("type".into(), other);
                map
            }
        };
        property.insert("description".into(), json!(param.description));
        if let Some(default) = &param.default {
            property.insert("default".into(), default.clone());
        }
        properties.insert(param.name.clone(), Value::Object(property));
        if param.required {
            required.push(json!(param.name));
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
