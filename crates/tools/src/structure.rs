//! Code-structure extraction.
//!
//! Parses Rust sources and reports the item hierarchy as a flat node list
//! with parent references, the shape diagram tooling consumes.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Value};
use syn::{Fields, ImplItem, Item, TraitItem, Visibility};
use walkdir::WalkDir;

use toolspan_core::descriptor::{FunctionBuilder, TypeSpec};
use toolspan_core::handler::{handler, ArgMap};
use toolspan_core::{args, CallOutcome, Error, Result};
use toolspan_registry::Registry;

/// Upper bound on files walked per invocation.
const MAX_FILES: usize = 500;

const EXTRACT_STRUCTURE_DOC: &str = "\
Extract the code structure of Rust sources.

Reports modules, types, traits, functions and impl blocks as a flat node
list with parent references.

Args:
    path: A Rust source file or a directory of sources
    include_private: Also report private items
";

pub fn register(registry: &Registry) -> Result<()> {
    registry.register(
        FunctionBuilder::new("extract_structure")
            .doc(EXTRACT_STRUCTURE_DOC)
            .param("path", TypeSpec::Str)
            .param_default("include_private", TypeSpec::Bool, json!(false))
            .methods(&["GET"])
            .interfaces(&["cli", "api", "tool"])
            .returns_structured()
            .build()?,
        handler(extract_structure),
    )
}

/// One item in flat adjacency-list form.
#[derive(Debug, Clone, Serialize)]
pub struct StructureNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub kind: String,
    pub name: String,
    pub public: bool,
}

async fn extract_structure(args: ArgMap) -> Result<Value> {
    let path = args::str_arg(&args, "path")?.to_string();
    let include_private = args::bool_arg(&args, "include_private");

    let (nodes, files) = collect(&path, include_private)?;
    tracing::debug!(nodes = nodes.len(), files, "structure extraction complete");

    Ok(CallOutcome::ok(format!(
        "{} nodes from {} files",
        nodes.len(),
        files
    ))
    .with_result(json!({ "nodes": nodes, "files": files }))
    .into_value())
}

/// Walk a file or directory and extract every node. Shared with the diagram
/// generator.
pub fn collect(path: &str, include_private: bool) -> Result<(Vec<StructureNode>, usize)> {
    let root = Path::new(path);
    if !root.exists() {
        return Err(Error::invalid_params(format!("path `{}` does not exist", path)));
    }

    let mut nodes = Vec::new();
    let mut files = 0usize;
    if root.is_file() {
        let source = std::fs::read_to_string(root)?;
        nodes.extend(scan_source(&source, &root.display().to_string(), include_private)?);
        files = 1;
    } else {
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| !is_ignored(e.path()))
            .filter_map(|e| e.ok())
        {
            if files >= MAX_FILES {
                tracing::warn!(limit = MAX_FILES, "file limit reached, truncating walk");
                break;
            }
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|e| e.to_str()) != Some("rs")
            {
                continue;
            }
            let source = std::fs::read_to_string(entry.path())?;
            let file_id = entry.path().display().to_string();
            match scan_source(&source, &file_id, include_private) {
                Ok(file_nodes) => nodes.extend(file_nodes),
                Err(e) => {
                    tracing::warn!(file = %file_id, error = %e, "skipping unparseable file");
                }
            }
            files += 1;
        }
    }
    Ok((nodes, files))
}

fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == "target" || name.starts_with('.'))
}

/// Extract the flat node list from one source file.
pub fn scan_source(
    source: &str,
    file_id: &str,
    include_private: bool,
) -> Result<Vec<StructureNode>> {
    let ast = syn::parse_file(source)
        .map_err(|e| Error::execution(format!("parse error in {}: {}", file_id, e)))?;

    let mut nodes = vec![StructureNode {
        id: file_id.to_string(),
        parent_id: None,
        kind: "file".to_string(),
        name: file_id.to_string(),
        public: true,
    }];
    let mut counter = 0usize;
    walk_items(
        &ast.items,
        file_id,
        file_id,
        include_private,
        &mut nodes,
        &mut counter,
    );
    Ok(nodes)
}

fn walk_items(
    items: &[Item],
    file_id: &str,
    parent_id: &str,
    include_private: bool,
    nodes: &mut Vec<StructureNode>,
    counter: &mut usize,
) {
    for item in items {
        match item {
            Item::Fn(f) => {
                push_node(
                    nodes, counter, file_id, parent_id, "function",
                    &f.sig.ident.to_string(), is_public(&f.vis), include_private,
                );
            }
            Item::Struct(s) => {
                let id = push_node(
                    nodes, counter, file_id, parent_id, "struct",
                    &s.ident.to_string(), is_public(&s.vis), include_private,
                );
                if let (Some(id), Fields::Named(fields)) = (id, &s.fields) {
                    for field in &fields.named {
                        if let Some(ident) = &field.ident {
                            push_node(
                                nodes, counter, file_id, &id, "field",
                                &ident.to_string(), is_public(&field.vis), include_private,
                            );
                        }
                    }
                }
            }
            Item::Enum(e) => {
                let id = push_node(
                    nodes, counter, file_id, parent_id, "enum",
                    &e.ident.to_string(), is_public(&e.vis), include_private,
                );
                if let Some(id) = id {
                    for variant in &e.variants {
                        push_node(
                            nodes, counter, file_id, &id, "variant",
                            &variant.ident.to_string(), true, include_private,
                        );
                    }
                }
            }
            Item::Trait(t) => {
                let id = push_node(
                    nodes, counter, file_id, parent_id, "trait",
                    &t.ident.to_string(), is_public(&t.vis), include_private,
                );
                if let Some(id) = id {
                    for member in &t.items {
                        if let TraitItem::Fn(f) = member {
                            push_node(
                                nodes, counter, file_id, &id, "method",
                                &f.sig.ident.to_string(), true, include_private,
                            );
                        }
                    }
                }
            }
            Item::Impl(i) => {
                let name = match &i.trait_ {
                    Some((_, path, _)) => format!(
                        "{} for {}",
                        path_name(path),
                        type_name(&i.self_ty)
                    ),
                    None => type_name(&i.self_ty),
                };
                let id = push_node(
                    nodes, counter, file_id, parent_id, "impl", &name, true, include_private,
                );
                if let Some(id) = id {
                    for member in &i.items {
                        if let ImplItem::Fn(f) = member {
                            push_node(
                                nodes, counter, file_id, &id, "method",
                                &f.sig.ident.to_string(), is_public(&f.vis), include_private,
                            );
                        }
                    }
                }
            }
            Item::Mod(m) => {
                let id = push_node(
                    nodes, counter, file_id, parent_id, "module",
                    &m.ident.to_string(), is_public(&m.vis), include_private,
                );
                if let (Some(id), Some((_, items))) = (id, &m.content) {
                    walk_items(items, file_id, &id, include_private, nodes, counter);
                }
            }
            _ => {}
        }
    }
}

/// Append a node unless visibility filtering drops it; returns the id when
/// the node was kept so children can attach to it.
#[allow(clippy::too_many_arguments)]
fn push_node(
    nodes: &mut Vec<StructureNode>,
    counter: &mut usize,
    file_id: &str,
    parent_id: &str,
    kind: &str,
    name: &str,
    public: bool,
    include_private: bool,
) -> Option<String> {
    if !public && !include_private {
        return None;
    }
    *counter += 1;
    let id = format!("{}#{}", file_id, counter);
    nodes.push(StructureNode {
        id: id.clone(),
        parent_id: Some(parent_id.to_string()),
        kind: kind.to_string(),
        name: name.to_string(),
        public,
    });
    Some(id)
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn type_name(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(p) => path_name(&p.path),
        syn::Type::Reference(r) => type_name(&r.elem),
        _ => "?".to_string(),
    }
}

fn path_name(path: &syn::Path) -> String {
    path.segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
pub struct Widget {
    pub label: String,
    weight: u32,
}

impl Widget {
    pub fn label(&self) -> &str {
        &self.label
    }

    fn weight(&self) -> u32 {
        self.weight
    }
}

pub trait Render {
    fn render(&self) -> String;
}

mod internal {
    pub fn helper() {}
}

pub fn make_widget() -> Widget {
    Widget { label: String::new(), weight: 0 }
}
"#;

    #[test]
    fn public_items_form_a_flat_tree() {
        let nodes = scan_source(SOURCE, "widget.rs", false).unwrap();

        let widget = nodes.iter().find(|n| n.name == "Widget" && n.kind == "struct").unwrap();
        assert_eq!(widget.parent_id.as_deref(), Some("widget.rs"));

        let label_field = nodes.iter().find(|n| n.name == "label" && n.kind == "field").unwrap();
        assert_eq!(label_field.parent_id.as_deref(), Some(widget.id.as_str()));

        // private items are filtered, private module contents with them
        assert!(!nodes.iter().any(|n| n.name == "weight"));
        assert!(!nodes.iter().any(|n| n.name == "internal"));
        assert!(!nodes.iter().any(|n| n.name == "helper"));

        let impl_node = nodes.iter().find(|n| n.kind == "impl").unwrap();
        assert_eq!(impl_node.name, "Widget");
        let method = nodes.iter().find(|n| n.name == "label" && n.kind == "method").unwrap();
        assert_eq!(method.parent_id.as_deref(), Some(impl_node.id.as_str()));
    }

    #[test]
    fn include_private_reports_everything() {
        let nodes = scan_source(SOURCE, "widget.rs", true).unwrap();
        assert!(nodes.iter().any(|n| n.name == "weight" && n.kind == "field"));
        assert!(nodes.iter().any(|n| n.name == "helper" && n.kind == "function"));
    }

    #[test]
    fn every_non_root_node_has_a_known_parent() {
        let nodes = scan_source(SOURCE, "widget.rs", true).unwrap();
        for node in &nodes {
            if let Some(parent) = &node.parent_id {
                assert!(
                    nodes.iter().any(|n| &n.id == parent),
                    "dangling parent for {}",
                    node.name
                );
            }
        }
    }

    #[test]
    fn unparseable_source_is_an_error() {
        assert!(scan_source("fn broken( {", "bad.rs", false).is_err());
    }

    #[tokio::test]
    async fn missing_path_is_a_client_error() {
        let mut input = ArgMap::new();
        input.insert("path".into(), json!("/definitely/not/here.rs"));
        let err = extract_structure(input).await.unwrap_err();
        assert!(err.is_client());
    }
}
