//! Documentation-text parsing.
//!
//! The builder attaches a plain documentation block to each function; the
//! first sentence becomes the summary and an `Args:`-style section supplies
//! per-parameter descriptions.

use std::collections::HashMap;

/// Parsed documentation block.
#[derive(Debug, Default, Clone)]
pub struct ParsedDoc {
    pub summary: String,
    pub params: HashMap<String, String>,
}

/// Parse a documentation block.
///
/// The first non-empty line is truncated to its first sentence for the
/// summary. Inside an `Args:`/`Arguments:`/`Parameters:` section, lines of
/// the form `name: description` start a parameter entry and further
/// indented lines continue it; other section headers (`Returns:` etc.) end
/// the parameter section.
pub fn parse_doc(text: &str) -> ParsedDoc {
    let mut doc = ParsedDoc::default();
    let mut in_args = false;
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let trimmed = raw.trim();

        match section_header(trimmed) {
            Some(is_args) => {
                in_args = is_args;
                current = None;
                continue;
            }
            None => {}
        }

        if doc.summary.is_empty() && !in_args {
            if !trimmed.is_empty() {
                doc.summary = first_sentence(trimmed).to_string();
            }
            continue;
        }

        if !in_args {
            continue;
        }

        if trimmed.is_empty() {
            current = None;
            continue;
        }

        if let Some((name, description)) = param_line(trimmed) {
            current = Some(name.clone());
            doc.params.insert(name, description);
        } else if let Some(name) = &current {
            if let Some(entry) = doc.params.get_mut(name) {
                entry.push(' ');
                entry.push_str(trimmed);
            }
        }
    }

    doc
}

/// `Some(true)` for a parameter-section header, `Some(false)` for any other
/// recognized section, `None` for ordinary text.
fn section_header(line: &str) -> Option<bool> {
    match line.to_ascii_lowercase().as_str() {
        "args:" | "arguments:" | "parameters:" => Some(true),
        "returns:" | "raises:" | "yields:" | "examples:" | "notes:" => Some(false),
        _ => None,
    }
}

fn first_sentence(line: &str) -> &str {
    match line.find(". ") {
        Some(idx) => &line[..=idx],
        None => line,
    }
}

/// Split `name: description`, requiring an identifier-shaped name so that
/// continuation lines containing colons are not mistaken for new entries.
/// A parenthesized type annotation after the name is tolerated and dropped.
fn param_line(line: &str) -> Option<(String, String)> {
    let (head, tail) = line.split_once(':')?;
    let name = match head.find('(') {
        Some(idx) => head[..idx].trim(),
        None => head.trim(),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some((name.to_string(), tail.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
Check documentation freshness against source modification times. Extra
detail that should not land in the summary.

Args:
    docs_dir: Directory containing the documentation files
    source_dir: Source tree the documentation describes,
        resolved relative to the working directory
    max_age_days (int): Also flag documents older than this many days

Returns:
    A structured staleness report.
";

    #[test]
    fn summary_is_first_sentence() {
        let doc = parse_doc(DOC);
        assert_eq!(
            doc.summary,
            "Check documentation freshness against source modification times."
        );
    }

    #[test]
    fn param_descriptions_are_collected() {
        let doc = parse_doc(DOC);
        assert_eq!(
            doc.params["docs_dir"],
            "Directory containing the documentation files"
        );
        assert_eq!(
            doc.params["max_age_days"],
            "Also flag documents older than this many days"
        );
    }

    #[test]
    fn continuation_lines_extend_the_previous_entry() {
        let doc = parse_doc(DOC);
        assert_eq!(
            doc.params["source_dir"],
            "Source tree the documentation describes, resolved relative to the working directory"
        );
    }

    #[test]
    fn returns_section_ends_the_parameter_section() {
        let doc = parse_doc(DOC);
        assert!(!doc.params.contains_key("A structured staleness report"));
        assert_eq!(doc.params.len(), 3);
    }

    #[test]
    fn empty_doc_yields_empty_summary() {
        let doc = parse_doc("");
        assert!(doc.summary.is_empty());
        assert!(doc.params.is_empty());
    }
}
