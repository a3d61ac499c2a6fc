//! AI-assisted documentation drafting.

use serde_json::{json, Value};

use toolspan_core::config::AppConfig;
use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
use toolspan_core::handler::{handler, ArgMap};
use toolspan_core::{args, CallOutcome, Error, Result};
use toolspan_registry::Registry;

use crate::model::ModelClient;

const DRAFT_DOC_DOC: &str = "\
Draft documentation for a source file.

Sends the file to the configured model endpoint and returns a markdown
draft describing what the code does and how to use it.

Args:
    path: Source file to document
    style: Length and depth of the draft
";

const MAX_SOURCE_BYTES: usize = 64 * 1024;

pub fn register(registry: &Registry) -> Result<()> {
    registry.register(
        FunctionBuilder::new("draft_doc")
            .doc(DRAFT_DOC_DOC)
            .param("path", TypeSpec::Str)
            .param_choices(
                "style",
                vec![json!("concise"), json!("detailed")],
                Some(json!("concise")),
            )
            .methods(&["POST"])
            .interfaces(&["cli", "api", "tool"])
            .returns_structured()
            .build()?,
        handler(draft_doc),
    )
}

async fn draft_doc(args: ArgMap) -> Result<Value> {
    let path = args::str_arg(&args, "path")?.to_string();
    let style = args::str_arg(&args, "style")?.to_string();

    let source = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::invalid_params(format!("cannot read `{}`: {}", path, e)))?;
    if source.len() > MAX_SOURCE_BYTES {
        return Err(Error::invalid_params(format!(
            "`{}` is too large to draft documentation for ({} bytes)",
            path,
            source.len()
        )));
    }

    let config = AppConfig::load().unwrap_or_default();
    let client = ModelClient::from_config(&config.model)?;

    let system = match style.as_str() {
        "detailed" => {
            "You are a technical writer. Produce thorough markdown documentation \
             for the given source file: purpose, public API, usage examples, and \
             caveats."
        }
        _ => {
            "You are a technical writer. Produce a short markdown overview of the \
             given source file: what it does and how to use it."
        }
    };
    let prompt = format!("Document this file (`{}`):\n\n```\n{}\n```", path, source);

    tracing::info!(path = %path, style = %style, "requesting documentation draft");
    let draft = client.complete(system, &prompt).await?;

    Ok(CallOutcome::ok(format!("drafted documentation for {}", path))
        .with_result(json!({ "path": path, "style": style, "draft": draft }))
        .into_value())
}
