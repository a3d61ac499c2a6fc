//! Command-tree synthesis.

use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, Command};

use toolspan_core::descriptor::{Interface, ParamSpec, TypeSpec};
use toolspan_registry::Registry;

/// Subcommand names the binary claims for itself.
pub const RESERVED: &[&str] = &["list", "serve", "agent"];

/// Build the full command tree: reserved commands plus one subcommand per
/// cli-targeted function.
pub fn build_command(registry: &Registry) -> Command {
    let mut root = Command::new("toolspan")
        .about("Developer-productivity tools over one function registry")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List every registered function"))
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP gateway")
                .arg(Arg::new("host").long("host").help("Bind address"))
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Bind port"),
                ),
        )
        .subcommand(Command::new("agent").about("Serve agent tools over stdio"));

    for entry in registry.for_interface(Interface::Cli) {
        if RESERVED.contains(&entry.spec.name.as_str()) {
            tracing::warn!(
                function = %entry.spec.name,
                "name collides with a reserved command, skipping"
            );
            continue;
        }
        let mut command = Command::new(entry.spec.name.clone()).about(entry.spec.summary.clone());
        for param in &entry.spec.params {
            command = command.arg(build_arg(param));
        }
        root = root.subcommand(command);
    }

    root
}

/// One option per parameter: underscores become hyphens, the primitive kind
/// maps to the nearest native value type, and the description becomes the
/// help text. Complex kinds stay strings and rely on the marshaling layer.
fn build_arg(param: &ParamSpec) -> Arg {
    let flag = param.name.replace('_', "-");
    let mut arg = Arg::new(param.name.clone())
        .long(flag)
        .help(param.description.clone());

    match param.ty.unwrap_optional() {
        // booleans are flags; absence means false, so never required
        TypeSpec::Bool => return arg.action(ArgAction::SetTrue),
        TypeSpec::Int => arg = arg.value_parser(value_parser!(i64)),
        TypeSpec::Float => arg = arg.value_parser(value_parser!(f64)),
        _ => {
            if let Some(choices) = &param.choices {
                let values: Vec<String> = choices
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
                if values.len() == choices.len() {
                    arg = arg.value_parser(PossibleValuesParser::new(values));
                }
            }
        }
    }

    if param.required {
        arg = arg.required(true);
    }
    arg
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolspan_core::descriptor::FunctionBuilder;
    use toolspan_core::handler::{handler, ArgMap};

    fn test_registry() -> Registry {
        let registry = Registry::new();
        registry
            .register(
                FunctionBuilder::new("check_docs")
                    .doc("Check documentation freshness.")
                    .param_default("docs_dir", TypeSpec::Str, json!("docs"))
                    .param("max_age_days", TypeSpec::optional(TypeSpec::Int))
                    .param_default("verbose", TypeSpec::Bool, json!(false))
                    .interfaces(&["cli"])
                    .returns_structured()
                    .build()
                    .unwrap(),
                handler(|_args: ArgMap| async { Ok(json!(null)) }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn flags_use_hyphens_and_parse_native_kinds() {
        let command = build_command(&test_registry());
        let matches = command
            .try_get_matches_from([
                "toolspan",
                "check_docs",
                "--docs-dir",
                "handbook",
                "--max-age-days",
                "30",
                "--verbose",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "check_docs");
        assert_eq!(sub.get_one::<String>("docs_dir").unwrap(), "handbook");
        assert_eq!(*sub.get_one::<i64>("max_age_days").unwrap(), 30);
        assert!(sub.get_flag("verbose"));
    }

    #[test]
    fn reserved_commands_are_present() {
        let command = build_command(&test_registry());
        let names: Vec<&str> = command
            .get_subcommands()
            .map(|c| c.get_name())
            .collect();
        assert!(names.contains(&"list"));
        assert!(names.contains(&"serve"));
        assert!(names.contains(&"agent"));
        assert!(names.contains(&"check_docs"));
    }

    #[test]
    fn function_named_like_a_reserved_command_is_skipped() {
        let registry = test_registry();
        registry
            .register(
                FunctionBuilder::new("list")
                    .interfaces(&["cli"])
                    .returns_structured()
                    .build()
                    .unwrap(),
                handler(|_args: ArgMap| async { Ok(json!(null)) }),
            )
            .unwrap();
        let command = build_command(&registry);
        let list = command
            .get_subcommands()
            .find(|c| c.get_name() == "list")
            .unwrap();
        // still the reserved listing command, not the function
        assert_eq!(
            list.get_about().map(ToString::to_string).unwrap(),
            "List every registered function"
        );
    }
}
