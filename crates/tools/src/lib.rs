//! Registered developer-productivity functions.
//!
//! Each module declares its functions next to their handlers and exposes a
//! `register` entry point; [`modules`] is the loader's input table. The
//! loader's static pre-check decides from each module's own source whether
//! its entry point runs at all.

pub mod diagram;
pub mod docs;
pub mod drafting;
pub mod model;
pub mod repo;
pub mod structure;

use toolspan_registry::ToolModule;

/// The loadable module table, in load order.
pub fn modules() -> Vec<ToolModule> {
    vec![
        ToolModule {
            name: "docs",
            source: include_str!("docs.rs"),
            register: docs::register,
        },
        ToolModule {
            name: "repo",
            source: include_str!("repo.rs"),
            register: repo::register,
        },
        ToolModule {
            name: "structure",
            source: include_str!("structure.rs"),
            register: structure::register,
        },
        ToolModule {
            name: "diagram",
            source: include_str!("diagram.rs"),
            register: diagram::register,
        },
        ToolModule {
            name: "drafting",
            source: include_str!("drafting.rs"),
            register: drafting::register,
        },
    ]
}
