//! Command-line projection of the registry.
//!
//! The command tree is synthesized at runtime from the descriptors: one
//! subcommand per cli-targeted function, with `--flag-name` options derived
//! from parameter names, plus the reserved `list`, `serve` and `agent`
//! commands owned by the binary.

pub mod command;
pub mod invoke;
pub mod list;

pub use command::{build_command, RESERVED};
pub use invoke::{collect_args, invoke, run_function};
pub use list::render_list;
