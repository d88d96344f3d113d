//! Per-file alias table for dynamic import callees
//!
//! Collected in a prepass over the whole file, so an alias bound anywhere in
//! the module (including inside a function) is recognized everywhere.

use std::collections::HashSet;
use tree_sitter::Node;

use crate::shared::utils::tree_sitter::{node_text, unparenthesize};

/// Names under which the import functions are reachable in one file
#[derive(Debug, Clone)]
pub struct DynamicImportAliases {
    /// Names bound to the `importlib` module
    importlib_modules: HashSet<String>,
    /// Names bound to the `builtins` module
    builtins_modules: HashSet<String>,
    /// Names bound to `importlib.import_module`
    import_module_funcs: HashSet<String>,
    /// Names bound to `__import__`
    dunder_import_funcs: HashSet<String>,
}

impl Default for DynamicImportAliases {
    fn default() -> Self {
        Self {
            importlib_modules: HashSet::from(["importlib".to_string()]),
            builtins_modules: HashSet::from(["builtins".to_string()]),
            import_module_funcs: HashSet::new(),
            dunder_import_funcs: HashSet::from(["__import__".to_string()]),
        }
    }
}

impl DynamicImportAliases {
    pub fn collect(root: Node, source: &str) -> Self {
        let mut aliases = Self::default();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_statement" => {
                    for (name, alias) in imported_names(&node, source) {
                        let bound = alias.unwrap_or_else(|| name.clone());
                        match name.as_str() {
                            "importlib" => {
                                aliases.importlib_modules.insert(bound);
                            }
                            "builtins" => {
                                aliases.builtins_modules.insert(bound);
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
                    let (target, wanted) = match module {
                        "importlib" => (&mut aliases.import_module_funcs, "import_module"),
                        "builtins" => (&mut aliases.dunder_import_funcs, "__import__"),
                        _ => continue,
                    };
                    if has_wildcard(&node) {
                        target.insert(wanted.to_string());
                    }
                    for (name, alias) in imported_names(&node, source) {
                        if name == wanted {
                            target.insert(alias.unwrap_or(name));
                        }
                    }
                }
                _ => {
                    for i in (0..node.named_child_count()).rev() {
                        if let Some(child) = node.named_child(i) {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        aliases
    }

    /// Whether a call's `function` node refers to a dynamic import function
    pub fn is_dynamic_import(&self, callee: &Node, source: &str) -> bool {
        let callee = unparenthesize(*callee);
        match callee.kind() {
            "identifier" => {
                let name = node_text(&callee, source);
                self.import_module_funcs.contains(name) || self.dunder_import_funcs.contains(name)
            }
            "attribute" => {
                let (Some(object), Some(attribute)) = (
                    callee.child_by_field_name("object"),
                    callee.child_by_field_name("attribute"),
                ) else {
                    return false;
                };
                if object.kind() != "identifier" {
                    return false;
                }
                let object = node_text(&object, source);
                match node_text(&attribute, source) {
                    "import_module" => self.importlib_modules.contains(object),
                    "__import__" => self.builtins_modules.contains(object),
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

/// `(name, alias)` pairs of an import statement's `name` fields
pub fn imported_names(node: &Node, source: &str) -> Vec<(String, Option<String>)> {
    let mut cursor = node.walk();
    node.children_by_field_name("name", &mut cursor)
        .filter_map(|child| match child.kind() {
            "dotted_name" | "identifier" => Some((node_text(&child, source).to_string(), None)),
            "aliased_import" => {
                let name = child.child_by_field_name("name")?;
                let alias = child.child_by_field_name("alias")?;
                Some((
                    node_text(&name, source).to_string(),
                    Some(node_text(&alias, source).to_string()),
                ))
            }
            _ => None,
        })
        .collect()
}

fn has_wildcard(node: &Node) -> bool {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .any(|child| child.kind() == "wildcard_import")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::utils::tree_sitter::parse_python;

    fn callee_of_last_statement(source: &str) -> (tree_sitter::Tree, usize) {
        let tree = parse_python(source).unwrap();
        let count = tree.root_node().named_child_count();
        (tree, count - 1)
    }

    fn is_dynamic(source: &str) -> bool {
        let (tree, last) = callee_of_last_statement(source);
        let aliases = DynamicImportAliases::collect(tree.root_node(), source);
        let call = tree
            .root_node()
            .named_child(last)
            .and_then(|stmt| stmt.named_child(0))
            .unwrap();
        let callee = call.child_by_field_name("function").unwrap();
        aliases.is_dynamic_import(&callee, source)
    }

    #[test]
    fn test_default_names() {
        assert!(is_dynamic("importlib.import_module('x')"));
        assert!(is_dynamic("__import__('x')"));
        assert!(is_dynamic("builtins.__import__('x')"));
        assert!(!is_dynamic("import_module('x')"));
    }

    #[test]
    fn test_module_aliases() {
        assert!(is_dynamic("import importlib as il\nil.import_module('x')"));
        assert!(is_dynamic("import builtins as b\nb.__import__('x')"));
        assert!(!is_dynamic("import os as il\nil.getenv('x')"));
    }

    #[test]
    fn test_function_aliases() {
        assert!(is_dynamic("from importlib import import_module\nimport_module('x')"));
        assert!(is_dynamic("from importlib import import_module as im\nim('x')"));
        assert!(is_dynamic("from builtins import __import__ as imp\nimp('x')"));
        assert!(is_dynamic("from importlib import *\nimport_module('x')"));
    }

    #[test]
    fn test_alias_bound_inside_function() {
        let source = "def load():\n    from importlib import import_module as im\n    return im('x')\nim('y')";
        assert!(is_dynamic(source));
    }
}
