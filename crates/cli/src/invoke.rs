//! Invocation of a generated function subcommand.

use clap::ArgMatches;
use serde_json::Value;

use toolspan_core::descriptor::TypeSpec;
use toolspan_core::handler::ArgMap;
use toolspan_core::marshal::{bind_args, ValueMode};
use toolspan_core::{CallOutcome, Result};
use toolspan_registry::RegistryEntry;

/// Collect option values for the declared parameters from parsed matches.
/// Boolean flags are always present; everything else is taken only when
/// supplied, so descriptor defaults apply during binding.
pub fn collect_args(entry: &RegistryEntry, matches: &ArgMatches) -> ArgMap {
    let mut raw = ArgMap::new();
    for param in &entry.spec.params {
        match param.ty.unwrap_optional() {
            TypeSpec::Bool => {
                raw.insert(param.name.clone(), Value::Bool(matches.get_flag(&param.name)));
            }
            TypeSpec::Int => {
                if let Some(value) = matches.get_one::<i64>(&param.name) {
                    raw.insert(param.name.clone(), Value::from(*value));
                }
            }
            TypeSpec::Float => {
                if let Some(value) = matches.get_one::<f64>(&param.name) {
                    raw.insert(param.name.clone(), Value::from(*value));
                }
            }
            _ => {
                if let Some(value) = matches.get_one::<String>(&param.name) {
                    raw.insert(param.name.clone(), Value::String(value.clone()));
                }
            }
        }
    }
    raw
}

/// Bind and invoke; the caller renders the envelope and picks the exit
/// status.
pub async fn invoke(entry: &RegistryEntry, matches: &ArgMatches) -> Result<CallOutcome> {
    let raw = collect_args(entry, matches);
    let bound = bind_args(&entry.spec, &raw, ValueMode::Text)?;
    let value = (entry.handler)(bound).await?;
    Ok(CallOutcome::from_return(value))
}

/// Invoke a function subcommand, print the envelope, and return the process
/// exit code. Any failure is reported on stderr prefixed with the function
/// name.
pub async fn run_function(entry: &RegistryEntry, matches: &ArgMatches) -> i32 {
    match invoke(entry, matches).await {
        Ok(outcome) => {
            match serde_json::to_string_pretty(&outcome) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => {
                    eprintln!("{}: failed to render response: {}", entry.spec.name, e);
                    return 1;
                }
            }
            if outcome.success {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("{}: {}", entry.spec.name, e);
            1
        }
    }
}
