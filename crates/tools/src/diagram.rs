//! Diagram text generation from flat structure nodes.

use serde_json::{json, Value};

use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
use toolspan_core::handler::{handler, ArgMap};
use toolspan_core::{args, CallOutcome, Error, Result};
use toolspan_registry::Registry;

use crate::structure::{self, StructureNode};

const GENERATE_DIAGRAM_DOC: &str = "\
Generate a diagram of the code structure.

Extracts the structure graph and renders it as Mermaid or Graphviz dot
text, ready to paste into documentation.

Args:
    path: A Rust source file or a directory of sources
    format: Output syntax
";

pub fn register(registry: &Registry) -> Result<()> {
    registry.register(
        FunctionBuilder::new("generate_diagram")
            .doc(GENERATE_DIAGRAM_DOC)
            .param("path", TypeSpec::Str)
            .param_choices(
                "format",
                vec![json!("mermaid"), json!("dot")],
                Some(json!("mermaid")),
            )
            .methods(&["GET", "POST"])
            .interfaces(&["cli", "api", "tool"])
            .returns_structured()
            .build()?,
        handler(generate_diagram),
    )
}

async fn generate_diagram(args: ArgMap) -> Result<Value> {
    let path = args::str_arg(&args, "path")?.to_string();
    let format = args::str_arg(&args, "format")?.to_string();

    let (nodes, _files) = structure::collect(&path, false)?;
    let text = match format.as_str() {
        "mermaid" => render_mermaid(&nodes),
        "dot" => render_dot(&nodes),
        other => {
            return Err(Error::invalid_params(format!(
                "unsupported diagram format `{}`",
                other
            )));
        }
    };

    Ok(CallOutcome::ok(format!(
        "{} diagram with {} nodes",
        format,
        nodes.len()
    ))
    .with_result(json!({ "format": format, "text": text }))
    .into_value())
}

fn render_mermaid(nodes: &[StructureNode]) -> String {
    let mut out = String::from("graph TD\n");
    for node in nodes {
        out.push_str(&format!(
            "    {}[\"{}: {}\"]\n",
            mermaid_id(&node.id),
            node.kind,
            escape(&node.name)
        ));
    }
    for node in nodes {
        if let Some(parent) = &node.parent_id {
            out.push_str(&format!(
                "    {} --> {}\n",
                mermaid_id(parent),
                mermaid_id(&node.id)
            ));
        }
    }
    out
}

fn render_dot(nodes: &[StructureNode]) -> String {
    let mut out = String::from("digraph structure {\n    rankdir=LR;\n");
    for node in nodes {
        out.push_str(&format!(
            "    \"{}\" [label=\"{}: {}\"];\n",
            node.id,
            node.kind,
            escape(&node.name)
        ));
    }
    for node in nodes {
        if let Some(parent) = &node.parent_id {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", parent, node.id));
        }
    }
    out.push_str("}\n");
    out
}

/// Mermaid node ids cannot carry path separators or `#`.
fn mermaid_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('"', "'")
}
