//! Repository change analysis.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use git2::{Repository, Sort};
use serde::Serialize;
use serde_json::{json, Value};

use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
use toolspan_core::handler::{handler, ArgMap};
use toolspan_core::{args, CallOutcome, Error, Result};
use toolspan_registry::Registry;

const ANALYZE_REPO_DOC: &str = "\
Analyze recent repository history.

Walks the commit graph from a revision and reports it as a flat node list
with parent references, together with per-author counts and optional diff
totals.

Args:
    repo_path: Path to the repository working directory
    rev: Revision to start the walk from
    max_commits: Upper bound on the number of commits to report
    include_stats: Also compute insertion/deletion totals per commit
";

pub fn register(registry: &Registry) -> Result<()> {
    registry.register(
        FunctionBuilder::new("analyze_repo")
            .doc(ANALYZE_REPO_DOC)
            .param_default("repo_path", TypeSpec::Str, json!("."))
            .param_default("rev", TypeSpec::Str, json!("HEAD"))
            .param_default("max_commits", TypeSpec::Int, json!(50))
            .param_default("include_stats", TypeSpec::Bool, json!(false))
            .methods(&["GET"])
            .interfaces(&["cli", "api", "tool"])
            .returns_structured()
            .build()?,
        handler(analyze_repo),
    )
}

/// One commit in flat adjacency-list form. Merge commits keep their first
/// parent in `parent_id` and the rest in `extra_parent_ids`; the list stays
/// flat either way.
#[derive(Debug, Serialize)]
struct CommitNode {
    id: String,
    parent_id: Option<String>,
    extra_parent_ids: Vec<String>,
    author: String,
    time: DateTime<Utc>,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    insertions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deletions: Option<usize>,
}

async fn analyze_repo(args: ArgMap) -> Result<Value> {
    let repo_path = args::str_arg(&args, "repo_path")?.to_string();
    let rev = args::str_arg(&args, "rev")?.to_string();
    let max_commits = args::int_arg(&args, "max_commits")?.clamp(1, 10_000) as usize;
    let include_stats = args::bool_arg(&args, "include_stats");

    let repo = Repository::open(&repo_path).map_err(|e| {
        Error::invalid_params(format!("cannot open repository at `{}`: {}", repo_path, e))
    })?;
    let start = repo
        .revparse_single(&rev)
        .map_err(|e| Error::invalid_params(format!("unknown revision `{}`: {}", rev, e)))?
        .id();

    let mut revwalk = repo.revwalk().map_err(git_err)?;
    revwalk.push(start).map_err(git_err)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(git_err)?;

    let mut nodes = Vec::new();
    let mut authors: BTreeMap<String, usize> = BTreeMap::new();
    for oid in revwalk.take(max_commits) {
        let oid = oid.map_err(git_err)?;
        let commit = repo.find_commit(oid).map_err(git_err)?;

        let parents: Vec<String> = commit.parent_ids().map(|p| p.to_string()).collect();
        let author = commit
            .author()
            .name()
            .unwrap_or("unknown")
            .to_string();
        *authors.entry(author.clone()).or_default() += 1;

        let (insertions, deletions) = if include_stats {
            let (i, d) = commit_stats(&repo, &commit)?;
            (Some(i), Some(d))
        } else {
            (None, None)
        };

        nodes.push(CommitNode {
            id: oid.to_string(),
            parent_id: parents.first().cloned(),
            extra_parent_ids: parents.into_iter().skip(1).collect(),
            author,
            time: DateTime::from_timestamp(commit.time().seconds(), 0)
                .unwrap_or_else(Utc::now),
            summary: commit.summary().unwrap_or("").to_string(),
            insertions,
            deletions,
        });
    }

    tracing::debug!(commits = nodes.len(), rev = %rev, "repository walk complete");

    Ok(CallOutcome::ok(format!("{} commits from {}", nodes.len(), rev))
        .with_result(json!({
            "commits": nodes,
            "authors": authors,
        }))
        .into_value())
}

fn commit_stats(repo: &Repository, commit: &git2::Commit<'_>) -> Result<(usize, usize)> {
    let tree = commit.tree().map_err(git_err)?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree().map_err(git_err)?),
        Err(_) => None,
    };
    let diff = repo
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
        .map_err(git_err)?;
    let stats = diff.stats().map_err(git_err)?;
    Ok((stats.insertions(), stats.deletions()))
}

fn git_err(e: git2::Error) -> Error {
    Error::execution(format!("git: {}", e))
}
