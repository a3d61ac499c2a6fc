//! Function registry and module loader.
//!
//! The registry is an explicit container constructed once at start-up,
//! populated by a single loader pass over the declared tool modules, and
//! passed into each adapter. After the pass it is read-only by discipline,
//! so concurrent readers across all three adapters need no locking.

pub mod loader;
pub mod registry;

pub use loader::{contains_registration, LoadMode, LoadReport, ModuleLoader, ToolModule};
pub use registry::{Registry, RegistryEntry};
