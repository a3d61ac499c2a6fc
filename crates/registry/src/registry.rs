//! Function registry implementation.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use toolspan_core::descriptor::{FunctionSpec, Interface};
use toolspan_core::handler::Handler;
use toolspan_core::{Error, Result};

/// A registered function: its descriptor plus the callable.
#[derive(Clone)]
pub struct RegistryEntry {
    pub spec: FunctionSpec,
    pub handler: Handler,
}

/// Process-wide store of function descriptors keyed by name.
///
/// Registration is single-threaded and happens during the loader pass;
/// `clear` exists for test and administrative use only.
pub struct Registry {
    entries: DashMap<String, RegistryEntry>,
    loaded: AtomicBool,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            loaded: AtomicBool::new(false),
        }
    }

    /// Register a function.
    ///
    /// Fails on a duplicate name (no silent overwrite) and on a descriptor
    /// that never committed to the structured envelope; in both cases the
    /// registry is left unchanged.
    pub fn register(&self, spec: FunctionSpec, handler: Handler) -> Result<()> {
        if !spec.structured_return {
            return Err(Error::MissingReturnType(spec.name));
        }
        if self.entries.contains_key(&spec.name) {
            return Err(Error::DuplicateFunction(spec.name));
        }

        tracing::info!(function = %spec.name, "registering function");
        self.entries
            .insert(spec.name.clone(), RegistryEntry { spec, handler });
        Ok(())
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<RegistryEntry> {
        self.entries.get(name).map(|entry| entry.clone())
    }

    /// Every entry, sorted by name for deterministic iteration.
    pub fn all(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<_> = self.entries.iter().map(|entry| entry.clone()).collect();
        entries.sort_by(|a, b| a.spec.name.cmp(&b.spec.name));
        entries
    }

    /// Entries targeting the given interface, sorted by name.
    pub fn for_interface(&self, interface: Interface) -> Vec<RegistryEntry> {
        self.all()
            .into_iter()
            .filter(|entry| entry.spec.targets(interface))
            .collect()
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a loader pass already completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Mark the loader pass complete; a second pass becomes a no-op.
    pub fn mark_loaded(&self) {
        self.loaded.store(true, Ordering::Release);
    }

    /// Reset to empty. Test/administrative use only.
    pub fn clear(&self) {
        self.entries.clear();
        self.loaded.store(false, Ordering::Release);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
    use toolspan_core::handler::{handler, ArgMap};

    fn noop_handler() -> Handler {
        handler(|_args: ArgMap| async { Ok(json!(null)) })
    }

    fn spec(name: &str, summary_doc: &str) -> FunctionSpec {
        FunctionBuilder::new(name)
            .doc(summary_doc)
            .param("x", TypeSpec::Int)
            .returns_structured()
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_registration_fails_and_keeps_the_first() {
        let registry = Registry::new();
        registry
            .register(spec("probe", "First registration."), noop_handler())
            .unwrap();

        let err = registry
            .register(spec("probe", "Second registration."), noop_handler())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction(ref name) if name == "probe"));

        assert_eq!(registry.len(), 1);
        let entry = registry.get("probe").unwrap();
        assert_eq!(entry.spec.summary, "First registration.");
    }

    #[test]
    fn unstructured_descriptor_is_rejected() {
        let registry = Registry::new();
        let mut spec = spec("probe", "Probe.");
        spec.structured_return = false;
        let err = registry.register(spec, noop_handler()).unwrap_err();
        assert!(matches!(err, Error::MissingReturnType(ref name) if name == "probe"));
        assert!(registry.is_empty());
    }

    #[test]
    fn interface_views_filter() {
        let registry = Registry::new();
        let cli_only = FunctionBuilder::new("local")
            .interfaces(&["cli"])
            .returns_structured()
            .build()
            .unwrap();
        let everywhere = FunctionBuilder::new("shared")
            .returns_structured()
            .build()
            .unwrap();
        registry.register(cli_only, noop_handler()).unwrap();
        registry.register(everywhere, noop_handler()).unwrap();

        let api = registry.for_interface(Interface::Api);
        assert_eq!(api.len(), 1);
        assert_eq!(api[0].spec.name, "shared");
        assert_eq!(registry.for_interface(Interface::Cli).len(), 2);
    }

    #[test]
    fn clear_resets_entries_and_loaded_flag() {
        let registry = Registry::new();
        registry
            .register(spec("probe", "Probe."), noop_handler())
            .unwrap();
        registry.mark_loaded();

        registry.clear();
        assert!(registry.is_empty());
        assert!(!registry.is_loaded());
    }
}
