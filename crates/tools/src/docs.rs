//! Documentation freshness checking.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use walkdir::WalkDir;

use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
use toolspan_core::handler::{handler, ArgMap};
use toolspan_core::{args, CallOutcome, Error, Result};
use toolspan_registry::Registry;

const DOC_EXTENSIONS: &[&str] = &["md", "markdown", "rst", "txt"];

const CHECK_DOCS_DOC: &str = "\
Check documentation freshness against source modification times.

A document is stale when it was last modified before the newest change in
the source tree it describes, or when it exceeds the maximum age.

Args:
    docs_dir: Directory containing the documentation files
    source_dir: Source tree the documentation describes
    max_age_days: Also flag documents older than this many days
";

pub fn register(registry: &Registry) -> Result<()> {
    registry.register(
        FunctionBuilder::new("check_docs")
            .doc(CHECK_DOCS_DOC)
            .param_default("docs_dir", TypeSpec::Str, json!("docs"))
            .param_default("source_dir", TypeSpec::Str, json!("src"))
            .param("max_age_days", TypeSpec::optional(TypeSpec::Int))
            .methods(&["GET"])
            .interfaces(&["cli", "api", "tool"])
            .returns_structured()
            .build()?,
        handler(check_docs),
    )
}

#[derive(Debug, Serialize)]
struct DocRow {
    path: String,
    modified: DateTime<Utc>,
    age_days: i64,
    stale: bool,
    reason: Option<String>,
}

async fn check_docs(args: ArgMap) -> Result<Value> {
    let docs_dir = args::str_arg(&args, "docs_dir")?.to_string();
    let source_dir = args::str_arg(&args, "source_dir")?.to_string();
    let max_age_days = args::opt_int_arg(&args, "max_age_days")?;

    if !Path::new(&docs_dir).is_dir() {
        return Err(Error::invalid_params(format!(
            "docs_dir `{}` is not a directory",
            docs_dir
        )));
    }

    let newest_source = newest_mtime(&source_dir);
    let now = SystemTime::now();
    let mut rows = Vec::new();

    for entry in WalkDir::new(&docs_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_doc_file(entry.path()) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let (stale, reason) = evaluate(modified, newest_source, max_age_days, now);
        let age_days = now
            .duration_since(modified)
            .map(|age| (age.as_secs() / 86_400) as i64)
            .unwrap_or(0);
        rows.push(DocRow {
            path: entry.path().display().to_string(),
            modified: DateTime::<Utc>::from(modified),
            age_days,
            stale,
            reason,
        });
    }

    rows.sort_by(|a, b| a.path.cmp(&b.path));
    let stale_count = rows.iter().filter(|row| row.stale).count();
    tracing::debug!(total = rows.len(), stale = stale_count, "doc check complete");

    Ok(CallOutcome::ok(format!(
        "{} of {} documents stale",
        stale_count,
        rows.len()
    ))
    .with_result(json!({
        "documents": rows,
        "total": rows.len(),
        "stale": stale_count,
    }))
    .into_value())
}

/// Newest modification time under a tree, or `None` when it has no readable
/// files (a missing source tree disables the comparison rather than
/// failing the whole check).
fn newest_mtime(dir: &str) -> Option<SystemTime> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .filter_map(|metadata| metadata.modified().ok())
        .max()
}

/// Pure staleness decision, separated from the walk.
fn evaluate(
    modified: SystemTime,
    newest_source: Option<SystemTime>,
    max_age_days: Option<i64>,
    now: SystemTime,
) -> (bool, Option<String>) {
    if let Some(source) = newest_source {
        if modified < source {
            return (true, Some("older than the newest source change".to_string()));
        }
    }
    if let Some(limit) = max_age_days {
        let age_secs = now
            .duration_since(modified)
            .map(|age| age.as_secs() as i64)
            .unwrap_or(0);
        if age_secs > limit.saturating_mul(86_400) {
            return (true, Some(format!("older than {} days", limit)));
        }
    }
    (false, None)
}

fn is_doc_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
