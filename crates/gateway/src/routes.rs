//! Dynamic per-function routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::MethodRouter;
use axum::{Json, Router};
use serde_json::Value;
use uuid::Uuid;

use toolspan_core::descriptor::{HttpMethod, Interface};
use toolspan_core::handler::ArgMap;
use toolspan_core::marshal::{bind_args, ValueMode};
use toolspan_core::{CallOutcome, Error};
use toolspan_registry::{Registry, RegistryEntry};

use crate::server::AppState;

/// Route names the gateway claims for itself.
const RESERVED: &[&str] = &["health", "functions"];

/// Add one route per api-targeted function. Body-bearing methods read a
/// JSON object; the rest read query parameters.
pub fn function_routes(
    mut router: Router<Arc<AppState>>,
    registry: &Arc<Registry>,
) -> Router<Arc<AppState>> {
    for entry in registry.for_interface(Interface::Api) {
        if RESERVED.contains(&entry.spec.name.as_str()) {
            tracing::warn!(
                function = %entry.spec.name,
                "name collides with a reserved route, skipping"
            );
            continue;
        }
        let path = format!("/{}", entry.spec.name);
        let mut method_router: MethodRouter<Arc<AppState>> = MethodRouter::new();
        for method in entry.spec.methods.iter().copied().collect::<Vec<_>>() {
            method_router = attach(method_router, method, entry.clone());
        }
        router = router.route(&path, method_router);
    }
    router
}

fn attach(
    method_router: MethodRouter<Arc<AppState>>,
    method: HttpMethod,
    entry: RegistryEntry,
) -> MethodRouter<Arc<AppState>> {
    if method.has_body() {
        let handler =
            move |body: Option<Json<Value>>| body_call(entry.clone(), body.map(|Json(v)| v));
        match method {
            HttpMethod::Post => method_router.post(handler),
            HttpMethod::Put => method_router.put(handler),
            HttpMethod::Patch => method_router.patch(handler),
            _ => method_router,
        }
    } else {
        let handler = move |Query(params): Query<HashMap<String, String>>| {
            query_call(entry.clone(), params)
        };
        match method {
            HttpMethod::Get => method_router.get(handler),
            HttpMethod::Delete => method_router.delete(handler),
            _ => method_router,
        }
    }
}

async fn query_call(
    entry: RegistryEntry,
    params: HashMap<String, String>,
) -> (StatusCode, Json<CallOutcome>) {
    let raw: ArgMap = params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    dispatch(entry, raw, ValueMode::Text).await
}

async fn body_call(
    entry: RegistryEntry,
    body: Option<Value>,
) -> (StatusCode, Json<CallOutcome>) {
    let raw = match body {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => ArgMap::new(),
        Some(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(CallOutcome::error(format!(
                    "{}: request body must be a JSON object",
                    entry.spec.name
                ))),
            );
        }
    };
    dispatch(entry, raw, ValueMode::Json).await
}

async fn dispatch(
    entry: RegistryEntry,
    raw: ArgMap,
    mode: ValueMode,
) -> (StatusCode, Json<CallOutcome>) {
    let name = entry.spec.name.clone();
    let trace_id = Uuid::new_v4().to_string();
    tracing::debug!(trace_id = %trace_id, function = %name, "dispatching request");

    let bound = match bind_args(&entry.spec, &raw, mode) {
        Ok(bound) => bound,
        Err(e) => return respond_error(&name, &trace_id, &e),
    };

    match (entry.handler)(bound).await {
        Ok(value) => (StatusCode::OK, Json(CallOutcome::from_return(value))),
        Err(e) => respond_error(&name, &trace_id, &e),
    }
}

fn respond_error(name: &str, trace_id: &str, error: &Error) -> (StatusCode, Json<CallOutcome>) {
    let status = if error.is_client() {
        tracing::debug!(trace_id = %trace_id, function = %name, error = %error, "client error");
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(trace_id = %trace_id, function = %name, error = %error, "invocation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(CallOutcome::error(format!("{}: {}", name, error))))
}
