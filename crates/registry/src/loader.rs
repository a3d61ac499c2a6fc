//! Module discovery and loading.
//!
//! Tool modules declare a registration entry point together with their own
//! source text. Before a module runs, the loader parses that source and
//! looks for the registration call form; a module that plainly contains no
//! registrations is never executed, so its other top-level effects never
//! fire. Parsing (rather than substring matching) means `register`
//! appearing in a comment or a string literal does not count.

use syn::visit::{self, Visit};

use toolspan_core::{Error, Result};

use crate::registry::Registry;

/// One loadable tool module.
#[derive(Clone, Copy)]
pub struct ToolModule {
    pub name: &'static str,
    /// The module's own source (`include_str!`), subject of the static
    /// pre-check.
    pub source: &'static str,
    /// Registration entry point, invoked only when the pre-check passes.
    pub register: fn(&Registry) -> Result<()>,
}

/// Policy for module failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Record failures and keep loading; the pass succeeds even with an
    /// empty registry (logged loudly).
    #[default]
    Tolerant,
    /// Attempt every module, then raise one aggregated error naming every
    /// failure.
    Strict,
}

/// Outcome of one loader pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
    /// Module name and failure message, in attempt order.
    pub failed: Vec<(String, String)>,
}

/// Walks the module table and populates the registry.
pub struct ModuleLoader {
    modules: Vec<ToolModule>,
    mode: LoadMode,
}

impl ModuleLoader {
    pub fn new(modules: Vec<ToolModule>) -> Self {
        Self {
            modules,
            mode: LoadMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the pass. A registry that already completed a pass is left
    /// untouched and an empty report is returned.
    pub fn load(&self, registry: &Registry) -> Result<LoadReport> {
        if registry.is_loaded() {
            tracing::debug!("registry already loaded, skipping module pass");
            return Ok(LoadReport::default());
        }

        let mut report = LoadReport::default();
        for module in &self.modules {
            match contains_registration(module.source) {
                Ok(false) => {
                    tracing::debug!(module = module.name, "no registration calls, skipping");
                    report.skipped.push(module.name.to_string());
                }
                Ok(true) => match (module.register)(registry) {
                    Ok(()) => {
                        tracing::info!(module = module.name, "module loaded");
                        report.loaded.push(module.name.to_string());
                    }
                    Err(e) => report.failed.push((module.name.to_string(), e.to_string())),
                },
                Err(e) => report.failed.push((module.name.to_string(), e.to_string())),
            }
        }

        if self.mode == LoadMode::Strict && !report.failed.is_empty() {
            let summary: Vec<String> = report
                .failed
                .iter()
                .map(|(module, message)| format!("{}: {}", module, message))
                .collect();
            return Err(Error::module_load(summary.join("; ")));
        }

        for (module, message) in &report.failed {
            tracing::warn!(module = %module, error = %message, "module failed to load");
        }
        if registry.is_empty() {
            tracing::warn!("loader pass finished with an empty registry");
        }
        registry.mark_loaded();
        Ok(report)
    }
}

/// Static pre-check: does this source contain the registration call form?
///
/// Matches a method call (`registry.register(…)`), a bare call
/// (`register(…)`), and a qualified path call (`Registry::register(…)`,
/// `some::path::register(…)`), with or without arguments.
pub fn contains_registration(source: &str) -> Result<bool> {
    let file = syn::parse_file(source)
        .map_err(|e| Error::module_load(format!("source parse error: {}", e)))?;
    let mut finder = RegistrationFinder { found: false };
    finder.visit_file(&file);
    Ok(finder.found)
}

struct RegistrationFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for RegistrationFinder {
    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        if node.method == "register" {
            self.found = true;
        }
        visit::visit_expr_method_call(self, node);
    }

    fn visit_expr_call(&mut self, node: &'ast syn::ExprCall) {
        if let syn::Expr::Path(path) = &*node.func {
            if path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "register")
            {
                self.found = true;
            }
        }
        visit::visit_expr_call(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolspan_core::descriptor::FunctionBuilder;
    use toolspan_core::handler::{handler, ArgMap};

    const SRC_METHOD_CALL: &str = r#"
pub fn register(registry: &Registry) -> Result<()> {
    registry.register(build_spec()?, handler(run))
}
"#;

    const SRC_QUALIFIED_CALL: &str = r#"
pub fn init(registry: &Registry) -> Result<()> {
    Registry::register(registry, build_spec()?, handler(run))
}
"#;

    const SRC_ONLY_TEXT: &str = r#"
// registry.register(build_spec()?, handler(run))
const HINT: &str = "call registry.register to expose a function";

pub fn helper() -> usize {
    HINT.len()
}
"#;

    fn register_alpha(registry: &Registry) -> Result<()> {
        let spec = FunctionBuilder::new("alpha").returns_structured().build()?;
        registry.register(spec, handler(|_args: ArgMap| async { Ok(json!(null)) }))
    }

    fn register_beta(registry: &Registry) -> Result<()> {
        let spec = FunctionBuilder::new("beta").returns_structured().build()?;
        registry.register(spec, handler(|_args: ArgMap| async { Ok(json!(null)) }))
    }

    fn register_broken(_registry: &Registry) -> Result<()> {
        Err(Error::execution("flaky init"))
    }

    fn modules_with_failure() -> Vec<ToolModule> {
        vec![
            ToolModule {
                name: "alpha",
                source: SRC_METHOD_CALL,
                register: register_alpha,
            },
            ToolModule {
                name: "broken",
                source: SRC_METHOD_CALL,
                register: register_broken,
            },
            ToolModule {
                name: "beta",
                source: SRC_METHOD_CALL,
                register: register_beta,
            },
        ]
    }

    #[test]
    fn static_check_matches_call_forms() {
        assert!(contains_registration(SRC_METHOD_CALL).unwrap());
        assert!(contains_registration(SRC_QUALIFIED_CALL).unwrap());
    }

    #[test]
    fn static_check_ignores_comments_and_strings() {
        assert!(!contains_registration(SRC_ONLY_TEXT).unwrap());
    }

    #[test]
    fn static_check_rejects_unparseable_source() {
        assert!(contains_registration("fn broken( {").is_err());
    }

    #[test]
    fn module_without_registrations_is_never_executed() {
        fn must_not_run(_registry: &Registry) -> Result<()> {
            panic!("module without registration calls was executed");
        }
        let registry = Registry::new();
        let loader = ModuleLoader::new(vec![ToolModule {
            name: "inert",
            source: SRC_ONLY_TEXT,
            register: must_not_run,
        }]);
        let report = loader.load(&registry).unwrap();
        assert_eq!(report.skipped, vec!["inert"]);
        assert!(report.loaded.is_empty());
    }

    #[test]
    fn tolerant_mode_keeps_loading_past_failures() {
        let registry = Registry::new();
        let loader = ModuleLoader::new(modules_with_failure());
        let report = loader.load(&registry).unwrap();

        assert_eq!(report.loaded, vec!["alpha", "beta"]);
        assert_eq!(report.failed.len(), 1);
        assert!(!registry.is_empty());
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("beta").is_some());
    }

    #[test]
    fn strict_mode_aggregates_and_names_failures() {
        let registry = Registry::new();
        let loader = ModuleLoader::new(modules_with_failure()).with_mode(LoadMode::Strict);
        let err = loader.load(&registry).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("broken"));
        assert!(message.contains("flaky init"));
        // every module was still attempted before the error was raised
        assert!(registry.get("beta").is_some());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let registry = Registry::new();
        let loader = ModuleLoader::new(modules_with_failure());
        loader.load(&registry).unwrap();
        assert!(registry.is_loaded());

        let report = loader.load(&registry).unwrap();
        assert!(report.loaded.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tolerant_mode_accepts_an_empty_outcome() {
        let registry = Registry::new();
        let loader = ModuleLoader::new(vec![ToolModule {
            name: "broken",
            source: SRC_METHOD_CALL,
            register: register_broken,
        }]);
        let report = loader.load(&registry).unwrap();
        assert!(registry.is_empty());
        assert!(registry.is_loaded());
        assert_eq!(report.failed.len(), 1);
    }
}
