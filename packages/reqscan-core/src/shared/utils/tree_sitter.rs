//! Tree-sitter Utility Functions
//!
//! Common utilities for working with tree-sitter AST nodes, shared by the
//! import and environment-variable extractors.

use tree_sitter::{Node, Parser, Tree};

use crate::shared::models::{ReqscanError, Result};

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

/// Parse Python source into a tree-sitter tree
///
/// Tree-sitter recovers from syntax errors; callers decide what to do with
/// a tree that contains error nodes (see [`first_error_line`]).
pub fn parse_python(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|e| ReqscanError::parse(format!("Failed to set language: {}", e)))?;

    parser
        .parse(source, None)
        .ok_or_else(|| ReqscanError::parse("Failed to parse source code"))
}

/// Line (1-indexed) of the first ERROR or MISSING node, if any
pub fn first_error_line(tree: &Tree) -> Option<u32> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if current.is_error() || current.is_missing() {
            return Some(node_line(&current));
        }
        for i in (0..current.child_count()).rev() {
            if let Some(child) = current.child(i) {
                if child.has_error() || child.is_missing() {
                    stack.push(child);
                }
            }
        }
    }
    Some(1)
}

// ═══════════════════════════════════════════════════════════════════════════
// Node Traversal Utilities
// ═══════════════════════════════════════════════════════════════════════════

/// Find a direct child node by kind
#[inline]
pub fn find_child_by_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|child| child.kind() == kind)
}

/// Named children, in source order
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}

/// Whether a direct (anonymous) child token of this kind exists, e.g. `in`
#[inline]
pub fn has_token(node: &Node, token: &str) -> bool {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .any(|child| !child.is_named() && child.kind() == token)
}

/// Skip any number of wrapping parentheses
pub fn unparenthesize<'t>(node: Node<'t>) -> Node<'t> {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        match current.named_child(0) {
            Some(inner) => current = inner,
            None => break,
        }
    }
    current
}

// ═══════════════════════════════════════════════════════════════════════════
// Text Extraction Utilities
// ═══════════════════════════════════════════════════════════════════════════

/// Extract text content from a node
#[inline]
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// 1-indexed start line of a node
#[inline]
pub fn node_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Decode a Python string literal node without evaluating anything
///
/// Returns `None` for bytes literals and f-strings with interpolations,
/// which are not constant text.
pub fn string_literal_value(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {}
        "concatenated_string" => {
            let mut out = String::new();
            for part in named_children(node) {
                out.push_str(&string_literal_value(&part, source)?);
            }
            return Some(out);
        }
        _ => return None,
    }

    if find_child_by_kind(node, "interpolation").is_some() {
        return None;
    }

    let raw = node_text(node, source);
    let quote_at = raw.find(|c| c == '\'' || c == '"')?;
    let prefix = raw[..quote_at].to_ascii_lowercase();
    if prefix.contains('b') {
        return None;
    }
    let is_raw = prefix.contains('r');

    let body = &raw[quote_at..];
    let delimiter = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|d| body.starts_with(d) && body.len() >= 2 * d.len() && body.ends_with(d))?;
    let inner = &body[delimiter.len()..body.len() - delimiter.len()];

    Some(if is_raw {
        inner.to_string()
    } else {
        unescape(inner)
    })
}

/// Minimal escape handling: enough for module and variable names
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
