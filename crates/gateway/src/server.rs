//! Axum-based HTTP server over the registry.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use toolspan_core::descriptor::FunctionSpec;
use toolspan_core::Result;
use toolspan_registry::Registry;

use crate::routes;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Shared application state.
pub struct AppState {
    pub registry: Arc<Registry>,
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
}

impl GatewayServer {
    /// Create a new gateway server over a populated registry.
    pub fn new(config: GatewayConfig, registry: Arc<Registry>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { registry }),
        }
    }

    /// Build the Axum router: reserved routes plus one route per
    /// api-targeted function.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/functions", get(functions_handler))
            .route("/functions/details", get(function_details_handler));

        router = routes::function_routes(router, &self.state.registry);

        let mut router = router.with_state(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| toolspan_core::Error::gateway(format!("failed to bind: {}", e)))?;

        tracing::info!(addr = %addr, functions = self.state.registry.len(), "gateway starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| toolspan_core::Error::gateway(format!("server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Reserved routes
// =============================================================================

/// Health response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    functions: usize,
}

/// Summary row for `/functions`.
#[derive(Debug, Serialize)]
struct FunctionSummary {
    name: String,
    summary: String,
    methods: Vec<String>,
    interfaces: Vec<String>,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        functions: state.registry.len(),
    })
}

async fn functions_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let functions: Vec<FunctionSummary> = state
        .registry
        .all()
        .into_iter()
        .map(|entry| FunctionSummary {
            name: entry.spec.name.clone(),
            summary: entry.spec.summary.clone(),
            methods: entry.spec.methods.iter().map(|m| m.to_string()).collect(),
            interfaces: entry
                .spec
                .interfaces
                .iter()
                .map(|i| i.to_string())
                .collect(),
        })
        .collect();
    Json(functions)
}

async fn function_details_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let specs: Vec<FunctionSpec> = state
        .registry
        .all()
        .into_iter()
        .map(|entry| entry.spec)
        .collect();
    Json(specs)
}
