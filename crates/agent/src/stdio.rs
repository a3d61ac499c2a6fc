//! Line-delimited JSON serving loop for agent runtimes.
//!
//! Requests are one JSON object per line:
//! `{"op": "list"}` returns the tool definitions;
//! `{"op": "call", "name": "...", "arguments": {...}}` invokes a tool.
//! Responses mirror the request framing: a definitions object for `list`,
//! the structured envelope for `call`, and an error envelope for anything
//! that cannot be parsed.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use toolspan_core::{CallOutcome, Result};

use crate::surface::ToolSurface;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum AgentRequest {
    List,
    Call {
        name: String,
        #[serde(default)]
        arguments: Value,
    },
}

/// Serve the tool surface over stdin/stdout until EOF.
pub async fn serve_stdio(surface: &ToolSurface) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(surface, line).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn handle_line(surface: &ToolSurface, line: &str) -> Value {
    match serde_json::from_str::<AgentRequest>(line) {
        Ok(AgentRequest::List) => json!({ "tools": surface.definitions() }),
        Ok(AgentRequest::Call { name, arguments }) => {
            surface.call(&name, arguments).await.into_value()
        }
        Err(e) => CallOutcome::error(format!("malformed request: {}", e)).into_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use toolspan_core::descriptor::FunctionBuilder;
    use toolspan_core::handler::{handler, ArgMap};
    use toolspan_registry::Registry;

    fn surface() -> ToolSurface {
        let registry = Registry::new();
        registry
            .register(
                FunctionBuilder::new("ping")
                    .doc("Reply with pong.")
                    .interfaces(&["tool"])
                    .returns_structured()
                    .build()
                    .unwrap(),
                handler(|_args: ArgMap| async {
                    Ok(CallOutcome::ok("pong").into_value())
                }),
            )
            .unwrap();
        ToolSurface::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn list_returns_definitions() {
        let response = handle_line(&surface(), r#"{"op": "list"}"#).await;
        assert_eq!(response["tools"][0]["name"], "ping");
    }

    #[tokio::test]
    async fn call_returns_the_envelope() {
        let response =
            handle_line(&surface(), r#"{"op": "call", "name": "ping"}"#).await;
        assert_eq!(response["success"], json!(true));
        assert_eq!(response["message"], "pong");
    }

    #[tokio::test]
    async fn malformed_request_is_an_error_envelope() {
        let response = handle_line(&surface(), "not json").await;
        assert_eq!(response["success"], json!(false));
        assert!(response["message"]
            .as_str()
            .unwrap()
            .contains("malformed request"));
    }
}
