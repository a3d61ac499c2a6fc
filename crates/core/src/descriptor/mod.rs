//! Protocol-neutral function descriptors.
//!
//! A descriptor captures everything an adapter needs to project a function
//! onto its transport: the canonical parameter types, defaults and
//! requiredness, the declared transport methods, and the target interfaces.

mod builder;
mod docparse;
mod function;
mod param;
mod typespec;

pub use builder::FunctionBuilder;
pub use docparse::{parse_doc, ParsedDoc};
pub use function::{FunctionSpec, HttpMethod, Interface};
pub use param::ParamSpec;
pub use typespec::TypeSpec;
