//! Core descriptor model for toolspan.
//!
//! One function registration becomes three surfaces: a CLI command, an HTTP
//! route, and an agent-callable tool. This crate holds everything the three
//! adapters share:
//! - the canonical type representation ([`descriptor::TypeSpec`])
//! - parameter and function descriptors plus the builder that constructs
//!   them ([`descriptor::FunctionBuilder`])
//! - the `{result, success, message}` response envelope ([`CallOutcome`])
//! - descriptor-driven argument binding ([`marshal`]) and JSON-schema
//!   synthesis ([`schema`])
//! - the workspace error type, configuration, and tracing setup

pub mod args;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod marshal;
pub mod outcome;
pub mod schema;
pub mod telemetry;

pub use descriptor::{
    FunctionBuilder, FunctionSpec, HttpMethod, Interface, ParamSpec, TypeSpec,
};
pub use error::{Error, Result};
pub use handler::{handler, ArgMap, Handler, HandlerFuture};
pub use outcome::CallOutcome;
