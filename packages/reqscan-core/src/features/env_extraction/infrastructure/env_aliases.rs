//! Per-file names for the process environment
//!
//! Prepass over the whole module collecting every name through which
//! `os.environ` or `os.getenv` is reachable:
//! - `import os` / `import os as o` / `import os.path`
//! - `from os import environ [as e]`, `from os import getenv [as g]`, `from os import *`
//! - `env = os.environ` (any previously known environ expression on the right)

use std::collections::HashSet;
use tree_sitter::Node;

use crate::features::import_extraction::infrastructure::aliases::imported_names;
use crate::shared::utils::tree_sitter::{named_children, node_text, unparenthesize};

/// How a call reads the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvGetter {
    /// `os.getenv(key, default=None)`
    Getenv,
    /// `os.environ.get(key, default=None)`
    EnvironGet,
    /// `os.environ.setdefault(key, default=None)`
    SetDefault,
}

#[derive(Debug, Clone)]
pub struct EnvAliases {
    os_modules: HashSet<String>,
    environ_names: HashSet<String>,
    getenv_funcs: HashSet<String>,
}

impl Default for EnvAliases {
    fn default() -> Self {
        Self {
            os_modules: HashSet::from(["os".to_string()]),
            environ_names: HashSet::new(),
            getenv_funcs: HashSet::new(),
        }
    }
}

impl EnvAliases {
    pub fn collect(root: Node, source: &str) -> Self {
        let mut aliases = Self::default();
        let mut assignments = Vec::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" => {
                    for (name, alias) in imported_names(&node, source) {
                        match (name.as_str(), alias) {
                            ("os", alias) => {
                                aliases.os_modules.insert(alias.unwrap_or(name));
                            }
                            (dotted, None) if dotted.starts_with("os.") => {
                                aliases.os_modules.insert("os".to_string());
                            }
                            _ => {}
                        }
                    }
                }
                "import_from_statement" => {
                    let module = node
                        .child_by_field_name("module_name")
                        .map(|m| node_text(&m, source))
                        .unwrap_or("");
                    if module != "os" {
                        continue;
                    }
                    if named_children(&node).iter().any(|c| c.kind() == "wildcard_import") {
                        aliases.environ_names.insert("environ".to_string());
                        aliases.getenv_funcs.insert("getenv".to_string());
                    }
                    for (name, alias) in imported_names(&node, source) {
                        let bound = alias.unwrap_or_else(|| name.clone());
                        match name.as_str() {
                            "environ" => {
                                aliases.environ_names.insert(bound);
                            }
                            "getenv" => {
                                aliases.getenv_funcs.insert(bound);
                            }
                            _ => {}
                        }
                    }
                }
                "assignment" => assignments.push(node),
                _ => {}
            }
            for i in (0..node.named_child_count()).rev() {
                if let Some(child) = node.named_child(i) {
                    stack.push(child);
                }
            }
        }

        // Source order, so `a = os.environ; b = a` resolves both
        assignments.sort_by_key(|n| n.start_byte());
        for assignment in assignments {
            let (Some(left), Some(right)) = (
                assignment.child_by_field_name("left"),
                assignment.child_by_field_name("right"),
            ) else {
                continue;
            };
            if left.kind() == "identifier" && aliases.is_environ(&right, source) {
                aliases
                    .environ_names
                    .insert(node_text(&left, source).to_string());
            }
        }

        aliases
    }

    /// Whether an expression denotes the environment mapping
    pub fn is_environ(&self, node: &Node, source: &str) -> bool {
        let node = unparenthesize(*node);
        match node.kind() {
            "identifier" => self.environ_names.contains(node_text(&node, source)),
            "attribute" => self.is_module_attribute(&node, source, "environ"),
            _ => false,
        }
    }

    /// Classify a call's `function` node
    pub fn getter(&self, callee: &Node, source: &str) -> Option<EnvGetter> {
        let callee = unparenthesize(*callee);
        match callee.kind() {
            "identifier" => self
                .getenv_funcs
                .contains(node_text(&callee, source))
                .then_some(EnvGetter::Getenv),
            "attribute" => {
                if self.is_module_attribute(&callee, source, "getenv") {
                    return Some(EnvGetter::Getenv);
                }
                let object = callee.child_by_field_name("object")?;
                if !self.is_environ(&object, source) {
                    return None;
                }
                match node_text(&callee.child_by_field_name("attribute")?, source) {
                    "get" => Some(EnvGetter::EnvironGet),
                    "setdefault" => Some(EnvGetter::SetDefault),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// `<os alias>.<attribute>`
    fn is_module_attribute(&self, node: &Node, source: &str, attribute: &str) -> bool {
        let (Some(object), Some(attr)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("attribute"),
        ) else {
            return false;
        };
        object.kind() == "identifier"
            && self.os_modules.contains(node_text(&object, source))
            && node_text(&attr, source) == attribute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::utils::tree_sitter::parse_python;

    /// Getter classification of the last statement's call
    fn classify(source: &str) -> Option<EnvGetter> {
        let tree = parse_python(source).unwrap();
        let root = tree.root_node();
        let aliases = EnvAliases::collect(root, source);
        let last = root.named_child(root.named_child_count() - 1).unwrap();
        let call = last.named_child(0).unwrap();
        aliases.getter(&call.child_by_field_name("function").unwrap(), source)
    }

    #[test]
    fn test_plain_os() {
        assert_eq!(classify("import os\nos.getenv('A')"), Some(EnvGetter::Getenv));
        assert_eq!(classify("import os\nos.environ.get('A')"), Some(EnvGetter::EnvironGet));
        assert_eq!(
            classify("import os\nos.environ.setdefault('A', 'x')"),
            Some(EnvGetter::SetDefault)
        );
        assert_eq!(classify("import os\nos.path.join('A')"), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(classify("import os as o\no.getenv('A')"), Some(EnvGetter::Getenv));
        assert_eq!(
            classify("from os import environ as e\ne.get('A')"),
            Some(EnvGetter::EnvironGet)
        );
        assert_eq!(classify("from os import getenv\ngetenv('A')"), Some(EnvGetter::Getenv));
        assert_eq!(
            classify("import os\nenv = os.environ\ncfg = env\ncfg.get('A')"),
            Some(EnvGetter::EnvironGet)
        );
        assert_eq!(classify("from os import *\nenviron.get('A')"), Some(EnvGetter::EnvironGet));
    }

    #[test]
    fn test_unrelated_names() {
        assert_eq!(classify("config = {}\nconfig.get('A')"), None);
        assert_eq!(classify("getenv('A')"), None);
        assert_eq!(classify("import sys as os2\nos2.getenv('A')"), None);
    }
}
