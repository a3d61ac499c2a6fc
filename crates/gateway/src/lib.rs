//! HTTP projection of the registry.
//!
//! One route per api-targeted function at `/{name}`, with the method set
//! taken verbatim from the descriptor, plus the reserved `/health`,
//! `/functions` and `/functions/details` routes.

pub mod routes;
pub mod server;

pub use server::{AppState, GatewayConfig, GatewayServer};
