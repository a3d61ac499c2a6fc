//! Agent-tool projection of the registry.
//!
//! Each tool-targeted function becomes one callable tool: same name, a
//! JSON-schema parameter description, and a usage description assembled
//! from the descriptor so a remote reasoning agent can pick and call the
//! tool without extra documentation. Failures are embedded in the
//! structured envelope rather than raised at the protocol level, since
//! tool-calling loops expect to read and react to error text.

pub mod stdio;
pub mod surface;

pub use stdio::serve_stdio;
pub use surface::{ToolDefinition, ToolSurface};
