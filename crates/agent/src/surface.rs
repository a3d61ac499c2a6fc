//! Tool surface implementation.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use toolspan_core::descriptor::{FunctionSpec, Interface};
use toolspan_core::marshal::{bind_args, ValueMode};
use toolspan_core::schema::input_schema;
use toolspan_core::CallOutcome;
use toolspan_registry::Registry;

/// Tool description handed to a reasoning agent.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Projects tool-targeted registry entries onto an agent-callable surface.
pub struct ToolSurface {
    registry: Arc<Registry>,
}

impl ToolSurface {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// One definition per tool-targeted function, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .for_interface(Interface::Tool)
            .iter()
            .map(|entry| ToolDefinition {
                name: entry.spec.name.clone(),
                description: describe(&entry.spec),
                input_schema: input_schema(&entry.spec),
            })
            .collect()
    }

    /// Invoke a tool.
    ///
    /// Never fails at the protocol level: unknown tools, bad arguments and
    /// handler errors all come back as an error envelope carrying the tool
    /// name.
    pub async fn call(&self, name: &str, arguments: Value) -> CallOutcome {
        let Some(entry) = self.registry.get(name) else {
            return CallOutcome::error(format!("unknown tool: {}", name));
        };
        if !entry.spec.targets(Interface::Tool) {
            return CallOutcome::error(format!("{}: not exposed as a tool", name));
        }

        let raw = match arguments {
            Value::Object(map) => unwrap_nested(&entry.spec, map),
            Value::Null => Map::new(),
            _ => {
                return CallOutcome::error(format!("{}: arguments must be an object", name));
            }
        };

        tracing::debug!(tool = %name, "invoking tool");

        let bound = match bind_args(&entry.spec, &raw, ValueMode::Json) {
            Ok(bound) => bound,
            Err(e) => return CallOutcome::error(format!("{}: {}", name, e)),
        };
        match (entry.handler)(bound).await {
            Ok(value) => CallOutcome::from_return(value),
            Err(e) => CallOutcome::error(format!("{}: {}", name, e)),
        }
    }
}

/// Some agent runtimes wrap call arguments in an extra container. When the
/// top-level object contains none of the declared parameter names and holds
/// exactly one object-valued entry, descend into it; otherwise use the
/// object as-is.
fn unwrap_nested(spec: &FunctionSpec, map: Map<String, Value>) -> Map<String, Value> {
    if spec.params.iter().any(|p| map.contains_key(&p.name)) {
        return map;
    }
    if map.len() == 1 {
        if let Some(Value::Object(inner)) = map.values().next() {
            return inner.clone();
        }
    }
    map
}

/// Natural-language usage description: the summary plus a per-parameter
/// listing (name, type, requiredness, choices, description).
pub fn describe(spec: &FunctionSpec) -> String {
    let mut out = spec.summary.clone();
    if spec.params.is_empty() {
        return out;
    }
    out.push_str("\n\nParameters:\n");
    for param in &spec.params {
        let mut line = format!("- {} ({})", param.name, param.ty);
        if param.required {
            line.push_str(", required");
        } else if let Some(default) = &param.default {
            line.push_str(&format!(", optional, default {}", default));
        } else {
            line.push_str(", optional");
        }
        if let Some(choices) = &param.choices {
            let rendered: Vec<String> = choices.iter().map(Value::to_string).collect();
            line.push_str(&format!(", one of [{}]", rendered.join(", ")));
        }
        line.push_str(&format!(": {}", param.description));
        out.push_str(&line);
        out.push('\n');
    }
    out.trim_end().to_string()
}
