//! The reserved `list` command.

use std::fmt::Write;

use toolspan_registry::Registry;

/// Render every registered function with its parameters.
pub fn render_list(registry: &Registry) -> String {
    let entries = registry.all();
    if entries.is_empty() {
        return "no functions registered\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let interfaces: Vec<String> = entry
            .spec
            .interfaces
            .iter()
            .map(|i| i.to_string())
            .collect();
        let _ = writeln!(out, "{}  [{}]", entry.spec.name, interfaces.join(", "));
        if !entry.spec.summary.is_empty() {
            let _ = writeln!(out, "    {}", entry.spec.summary);
        }
        for param in &entry.spec.params {
            let flag = param.name.replace('_', "-");
            let status = if param.required {
                "required".to_string()
            } else if let Some(default) = &param.default {
                format!("default: {}", default)
            } else {
                "optional".to_string()
            };
            let _ = writeln!(
                out,
                "    --{} <{}> ({})  {}",
                flag, param.ty, status, param.description
            );
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
    use toolspan_core::handler::{handler, ArgMap};

    #[test]
    fn listing_shows_flags_types_and_defaults() {
        let registry = Registry::new();
        registry
            .register(
                FunctionBuilder::new("check_docs")
                    .doc("Check documentation freshness.")
                    .param_default("docs_dir", TypeSpec::Str, json!("docs"))
                    .param("max_age_days", TypeSpec::optional(TypeSpec::Int))
                    .returns_structured()
                    .build()
                    .unwrap(),
                handler(|_args: ArgMap| async { Ok(json!(null)) }),
            )
            .unwrap();

        let listing = render_list(&registry);
        assert!(listing.contains("check_docs"));
        assert!(listing.contains("Check documentation freshness."));
        assert!(listing.contains("--docs-dir <str> (default: \"docs\")"));
        assert!(listing.contains("--max-age-days <int?> (optional)"));
    }

    #[test]
    fn empty_registry_says_so() {
        assert_eq!(render_list(&Registry::new()), "no functions registered\n");
    }
}
