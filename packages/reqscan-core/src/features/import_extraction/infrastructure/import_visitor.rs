/*
 * Import Visitor
 *
 * Walks one parsed module and records every import it can prove:
 * - import a.b / import a as x          -> a
 * - from a.b import c                   -> a
 * - from __future__ import annotations  -> __future__
 * - importlib.import_module("a" + ".b") -> a (constant folded)
 * - __import__(name)                    -> unresolvable, diagnostic only
 *
 * Relative imports (`from . import x`, `from .m import x`,
 * `import_module(".m", pkg)`) name the project itself and are skipped.
 *
 * Scope is metadata: an import inside a function is `Late`, one inside a
 * guarded try is `Conditional`, and both are extracted like top-level ones.
 */

use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Tree};

use super::aliases::{imported_names, DynamicImportAliases};
use super::constant_fold::fold_constant_string;
use crate::features::import_extraction::domain::{ImportKind, ImportRecord};
use crate::shared::models::{Diagnostic, DiagnosticKind};
use crate::shared::utils::tree_sitter::{named_children, node_line, node_text, unparenthesize};

/// Exception names whose handler makes a `try` an optional-import guard
const GUARD_EXCEPTIONS: &[&str] = &["ImportError", "ModuleNotFoundError"];

/// Records and diagnostics of one file
#[derive(Debug, Default)]
pub struct FileImports {
    pub records: Vec<ImportRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_function: bool,
    in_guard: bool,
}

impl Scope {
    fn static_kind(&self) -> ImportKind {
        if self.in_guard {
            ImportKind::Conditional
        } else if self.in_function {
            ImportKind::Late
        } else {
            ImportKind::Static
        }
    }
}

struct ImportVisitor<'a> {
    source: &'a str,
    file: &'a Path,
    aliases: DynamicImportAliases,
    seen: HashSet<(u32, String)>,
    out: FileImports,
}

/// Extract all import records from a parsed module
pub fn extract_file_imports(tree: &Tree, source: &str, file: &Path) -> FileImports {
    let root = tree.root_node();
    let mut visitor = ImportVisitor {
        source,
        file,
        aliases: DynamicImportAliases::collect(root, source),
        seen: HashSet::new(),
        out: FileImports::default(),
    };
    visitor.walk(root);
    visitor.out
}

impl<'a> ImportVisitor<'a> {
    fn walk(&mut self, root: Node) {
        let mut stack = vec![(root, Scope::default())];

        while let Some((node, scope)) = stack.pop() {
            match node.kind() {
                "import_statement" => {
                    self.static_import(&node, scope);
                    continue;
                }
                "import_from_statement" => {
                    self.from_import(&node, scope);
                    continue;
                }
                "future_import_statement" => {
                    self.push(node_line(&node), "__future__".to_string(), scope.static_kind());
                    continue;
                }
                "call" => self.dynamic_import(&node),
                _ => {}
            }

            let child_scope = match node.kind() {
                "function_definition" | "lambda" => Scope {
                    in_function: true,
                    ..scope
                },
                "try_statement" if is_import_guard(&node, self.source) => Scope {
                    in_guard: true,
                    ..scope
                },
                _ => scope,
            };

            for i in (0..node.named_child_count()).rev() {
                if let Some(child) = node.named_child(i) {
                    stack.push((child, child_scope));
                }
            }
        }
    }

    fn static_import(&mut self, node: &Node, scope: Scope) {
        let line = node_line(node);
        for (module, _) in imported_names(node, self.source) {
            if let Some(root) = root_segment(&module) {
                self.push(line, root, scope.static_kind());
            }
        }
    }

    fn from_import(&mut self, node: &Node, scope: Scope) {
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        if module.kind() == "relative_import" {
            return;
        }
        if let Some(root) = root_segment(node_text(&module, self.source)) {
            self.push(node_line(node), root, scope.static_kind());
        }
    }

    fn dynamic_import(&mut self, call: &Node) {
        let Some(callee) = call.child_by_field_name("function") else {
            return;
        };
        if !self.aliases.is_dynamic_import(&callee, self.source) {
            return;
        }
        let Some(argument) = call
            .child_by_field_name("arguments")
            .and_then(|args| module_name_argument(&args, self.source))
        else {
            return;
        };

        let line = node_line(call);
        match fold_constant_string(argument, self.source) {
            Some(name) if name.starts_with('.') => {}
            Some(name) => {
                if let Some(root) = root_segment(&name) {
                    self.push(line, root, ImportKind::DynamicLiteral);
                }
            }
            None => {
                let expression = node_text(&argument, self.source).to_string();
                if self.seen.insert((line, expression.clone())) {
                    self.out.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::UnresolvableDynamicImport,
                            expression.clone(),
                            "module name is not a constant expression",
                        )
                        .at(self.file, line),
                    );
                    self.out.records.push(ImportRecord::new(
                        expression,
                        ImportKind::DynamicUnresolvable,
                        self.file,
                        line,
                    ));
                }
            }
        }
    }

    fn push(&mut self, line: u32, root: String, kind: ImportKind) {
        if self.seen.insert((line, root.clone())) {
            self.out
                .records
                .push(ImportRecord::new(root, kind, self.file, line));
        }
    }
}

/// First segment of a dotted module path
fn root_segment(module: &str) -> Option<String> {
    let root = module.trim().split('.').next()?.trim();
    (!root.is_empty()).then(|| root.to_string())
}

/// The `name` argument of an import call: first positional, else `name=`
///
/// A splatted argument is returned as-is so it is reported as unresolvable.
fn module_name_argument<'t>(arguments: &Node<'t>, source: &str) -> Option<Node<'t>> {
    if arguments.kind() != "argument_list" {
        return None;
    }
    let children = named_children(arguments);

    let positional = children
        .iter()
        .find(|c| !matches!(c.kind(), "keyword_argument" | "comment"));
    if let Some(node) = positional {
        return Some(*node);
    }

    children
        .iter()
        .filter(|c| c.kind() == "keyword_argument")
        .find(|c| {
            c.child_by_field_name("name")
                .map(|n| node_text(&n, source) == "name")
                .unwrap_or(false)
        })
        .and_then(|c| c.child_by_field_name("value"))
}

/// Whether any handler of a `try` catches import failures
fn is_import_guard(try_node: &Node, source: &str) -> bool {
    named_children(try_node)
        .into_iter()
        .filter(|c| matches!(c.kind(), "except_clause" | "except_group_clause"))
        .any(|clause| {
            let caught = named_children(&clause)
                .into_iter()
                .find(|c| !matches!(c.kind(), "block" | "comment"));
            match caught {
                None => true,
                Some(expr) => catches_import_error(expr, source),
            }
        })
}

fn catches_import_error(expr: Node, source: &str) -> bool {
    let expr = unparenthesize(expr);
    match expr.kind() {
        "as_pattern" => expr
            .named_child(0)
            .map(|inner| catches_import_error(inner, source))
            .unwrap_or(false),
        "tuple" | "expression_list" => named_children(&expr)
            .into_iter()
            .any(|item| catches_import_error(item, source)),
        "identifier" | "attribute" => {
            let text = node_text(&expr, source);
            let last = text.rsplit('.').next().unwrap_or(text);
            GUARD_EXCEPTIONS.contains(&last)
        }
        _ => false,
    }
}
