/*
 * Env Visitor
 *
 * Records reads of the process environment in one parsed module:
 * - os.getenv(K) / os.environ.get(K)        -> required, no default
 * - os.getenv(K, "d") / setdefault(K, "d")  -> optional, default "d"
 * - os.getenv(K, None)                      -> optional, no default
 * - os.environ[K]                           -> required (not when assigned to)
 * - K in os.environ                         -> optional, no default
 * - os.getenv(K) or "a" or "b"              -> optional, default "a"
 *
 * Only literal string keys are recorded. Within the file, the first access
 * of a name wins.
 */

use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Tree};

use super::env_aliases::{EnvAliases, EnvGetter};
use crate::features::env_extraction::domain::EnvVarRecord;
use crate::shared::utils::tree_sitter::{
    has_token, named_children, node_line, node_text, string_literal_value, unparenthesize,
};

/// Value of a default argument, as far as it can be read without evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
enum DefaultArg {
    Literal(String),
    ExplicitNone,
    Expression,
}

struct EnvVisitor<'a> {
    source: &'a str,
    file: &'a Path,
    aliases: EnvAliases,
    seen: HashSet<String>,
    records: Vec<EnvVarRecord>,
}

/// Extract environment variable accesses from a parsed module, in source order
pub fn extract_file_env_vars(tree: &Tree, source: &str, file: &Path) -> Vec<EnvVarRecord> {
    let root = tree.root_node();
    let mut visitor = EnvVisitor {
        source,
        file,
        aliases: EnvAliases::collect(root, source),
        seen: HashSet::new(),
        records: Vec::new(),
    };

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "call" => visitor.getter_call(&node),
            "subscript" => visitor.subscript(&node),
            "comparison_operator" => visitor.membership(&node),
            _ => {}
        }
        for i in (0..node.named_child_count()).rev() {
            if let Some(child) = node.named_child(i) {
                stack.push(child);
            }
        }
    }
    visitor.records
}

impl<'a> EnvVisitor<'a> {
    fn getter_call(&mut self, call: &Node) {
        let Some(getter) = call
            .child_by_field_name("function")
            .and_then(|f| self.aliases.getter(&f, self.source))
        else {
            return;
        };
        let Some(arguments) = call.child_by_field_name("arguments") else {
            return;
        };
        let Some(name) = argument(&arguments, 0, "key", self.source)
            .and_then(|key| string_literal_value(&unparenthesize(key), self.source))
        else {
            return;
        };

        let explicit = argument(&arguments, 1, "default", self.source)
            .map(|d| self.default_value(d));
        let fallback = self.or_fallback(call);

        let record = match (explicit, fallback) {
            (Some(DefaultArg::Literal(value)), _) => EnvVarRecord::optional(name, Some(value)),
            (_, Some(DefaultArg::Literal(value))) => EnvVarRecord::optional(name, Some(value)),
            (Some(_), _) | (_, Some(_)) => EnvVarRecord::optional(name, None),
            (None, None) if getter == EnvGetter::SetDefault => EnvVarRecord::optional(name, None),
            (None, None) => EnvVarRecord::required(name),
        };
        self.push(record.at(self.file, node_line(call)));
    }

    fn subscript(&mut self, node: &Node) {
        let Some(value) = node.child_by_field_name("value") else {
            return;
        };
        if !self.aliases.is_environ(&value, self.source) || is_store_target(node) {
            return;
        }
        let Some(name) = node
            .child_by_field_name("subscript")
            .and_then(|key| string_literal_value(&unparenthesize(key), self.source))
        else {
            return;
        };
        self.push(EnvVarRecord::required(name).at(self.file, node_line(node)));
    }

    fn membership(&mut self, node: &Node) {
        if !(has_token(node, "in") || has_token(node, "not in")) {
            return;
        }
        let operands = named_children(node);
        let [key, mapping] = operands.as_slice() else {
            return;
        };
        if !self.aliases.is_environ(mapping, self.source) {
            return;
        }
        if let Some(name) = string_literal_value(&unparenthesize(*key), self.source) {
            self.push(EnvVarRecord::optional(name, None).at(self.file, node_line(node)));
        }
    }

    /// First literal among the right operands of an enclosing `or` chain
    /// in which `node` is the leftmost operand
    fn or_fallback(&self, node: &Node) -> Option<DefaultArg> {
        let mut current = *node;
        let mut found: Option<DefaultArg> = None;

        while let Some(parent) = current.parent() {
            if parent.kind() == "parenthesized_expression" {
                current = parent;
                continue;
            }
            if parent.kind() != "boolean_operator"
                || !has_token(&parent, "or")
                || parent.child_by_field_name("left") != Some(current)
            {
                break;
            }
            if let Some(right) = parent.child_by_field_name("right") {
                let value = self.default_value(right);
                let has_literal = matches!(found, Some(DefaultArg::Literal(_)));
                if !has_literal && (found.is_none() || matches!(value, DefaultArg::Literal(_))) {
                    found = Some(value);
                }
            }
            current = parent;
        }
        found
    }

    fn default_value(&self, node: Node) -> DefaultArg {
        let node = unparenthesize(node);
        if let Some(text) = string_literal_value(&node, self.source) {
            return DefaultArg::Literal(text);
        }
        match node.kind() {
            "none" => DefaultArg::ExplicitNone,
            "integer" | "float" | "true" | "false" => {
                DefaultArg::Literal(node_text(&node, self.source).to_string())
            }
            "call" => {
                let nested = node
                    .child_by_field_name("function")
                    .and_then(|f| self.aliases.getter(&f, self.source))
                    .and(node.child_by_field_name("arguments"))
                    .and_then(|args| argument(&args, 1, "default", self.source));
                match nested.map(|d| self.default_value(d)) {
                    Some(literal @ DefaultArg::Literal(_)) => literal,
                    _ => DefaultArg::Expression,
                }
            }
            "boolean_operator" if has_token(&node, "or") => named_children(&node)
                .into_iter()
                .map(|operand| self.default_value(operand))
                .find(|v| matches!(v, DefaultArg::Literal(_)))
                .unwrap_or(DefaultArg::Expression),
            _ => DefaultArg::Expression,
        }
    }

    fn push(&mut self, record: EnvVarRecord) {
        if self.seen.insert(record.name.clone()) {
            self.records.push(record);
        }
    }
}

/// Positional argument `index`, else the keyword argument `keyword`
fn argument<'t>(arguments: &Node<'t>, index: usize, keyword: &str, source: &str) -> Option<Node<'t>> {
    let children: Vec<Node<'t>> = named_children(arguments)
        .into_iter()
        .filter(|c| c.kind() != "comment")
        .collect();

    let positional: Vec<&Node<'t>> = children
        .iter()
        .take_while(|c| c.kind() != "keyword_argument")
        .collect();
    if let Some(node) = positional.get(index) {
        return Some(**node);
    }

    children
        .iter()
        .filter(|c| c.kind() == "keyword_argument")
        .find(|c| {
            c.child_by_field_name("name")
                .map(|n| node_text(&n, source) == keyword)
                .unwrap_or(false)
        })
        .and_then(|c| c.child_by_field_name("value"))
}

/// Subscript being written or deleted rather than read
fn is_store_target(node: &Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "assignment" | "augmented_assignment" => {
            parent.child_by_field_name("left") == Some(*node)
        }
        "delete_statement" => true,
        "pattern_list" | "tuple_pattern" | "expression_list" => parent
            .parent()
            .map(|p| {
                p.kind() == "delete_statement"
                    || (p.kind() == "assignment" && p.child_by_field_name("left") == Some(parent))
            })
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::utils::tree_sitter::parse_python;
    use pretty_assertions::assert_eq;

    fn extract(source: &str) -> Vec<EnvVarRecord> {
        let tree = parse_python(source).unwrap();
        extract_file_env_vars(&tree, source, Path::new("settings.py"))
    }

    fn summary(source: &str) -> Vec<(String, Option<String>, bool)> {
        extract(source)
            .into_iter()
            .map(|r| (r.name, r.default, r.required))
            .collect()
    }

    fn entry(name: &str, default: Option<&str>, required: bool) -> (String, Option<String>, bool) {
        (name.to_string(), default.map(str::to_string), required)
    }

    #[test]
    fn test_get_with_and_without_default() {
        let source = r#"
import os
DATABASE_URL = os.environ.get('DATABASE_URL', 'postgresql://localhost/mydb')
DB_NAME = os.environ.get('DB_NAME')
DB_HOST = os.getenv("DB_HOST", "localhost")
DB_PASSWORD = os.getenv('DB_PASSWORD')
TOKEN = os.getenv('TOKEN', None)
"#;
        assert_eq!(
            summary(source),
            vec![
                entry("DATABASE_URL", Some("postgresql://localhost/mydb"), false),
                entry("DB_NAME", None, true),
                entry("DB_HOST", Some("localhost"), false),
                entry("DB_PASSWORD", None, true),
                entry("TOKEN", None, false),
            ]
        );
    }

    #[test]
    fn test_subscript_membership_and_setdefault() {
        let source = r#"
import os
SECRET = os.environ["SECRET_KEY"]
os.environ["WRITTEN_ONLY"] = "1"
del os.environ["DELETED"]
if "FEATURE_X" in os.environ:
    pass
os.environ.setdefault("TZ", "UTC")
"#;
        assert_eq!(
            summary(source),
            vec![
                entry("SECRET_KEY", None, true),
                entry("FEATURE_X", None, false),
                entry("TZ", Some("UTC"), false),
            ]
        );
    }

    #[test]
    fn test_aliases() {
        let source = r#"
import os as o
from os import environ as e, getenv
env = o.environ
A = o.getenv('A')
B = e.get('B', 'b')
C = getenv('C', 'c')
D = env['D']
"#;
        assert_eq!(
            summary(source),
            vec![
                entry("A", None, true),
                entry("B", Some("b"), false),
                entry("C", Some("c"), false),
                entry("D", None, true),
            ]
        );
    }

    #[test]
    fn test_fallback_chains_take_first_literal() {
        let source = r#"
import os
HOST = os.getenv('HOST') or 'localhost' or '0.0.0.0'
URL = os.environ.get('URL', os.environ.get('LEGACY_URL', 'http://x'))
NAME = (os.getenv('NAME') or fallback()) or 'anon'
LEVEL = os.getenv('LEVEL') or compute()
"#;
        assert_eq!(
            summary(source),
            vec![
                entry("HOST", Some("localhost"), false),
                entry("URL", Some("http://x"), false),
                entry("LEGACY_URL", Some("http://x"), false),
                entry("NAME", Some("anon"), false),
                entry("LEVEL", None, false),
            ]
        );
    }

    #[test]
    fn test_non_literal_keys_and_first_occurrence() {
        let source = r#"
import os
key = "DYNAMIC"
a = os.getenv(key)
b = os.getenv(f"PREFIX_{key}")
PORT = os.getenv('PORT', 8000)
PORT_AGAIN = os.environ['PORT']
"#;
        let records = extract(source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "PORT");
        assert_eq!(records[0].default.as_deref(), Some("8000"));
        assert!(!records[0].required);
        assert_eq!(records[0].line, 6);
    }

    #[test]
    fn test_unrelated_mappings_ignored() {
        let source = "config = {}\nconfig.get('A')\nconfig['B']\n'C' in config\n";
        assert!(extract(source).is_empty());
    }
}
