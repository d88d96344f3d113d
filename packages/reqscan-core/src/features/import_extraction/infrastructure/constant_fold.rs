//! Compile-time folding of module-name arguments
//!
//! Only string literals, implicit literal adjacency, `+` between foldable
//! operands and parentheses fold. Everything else is not a constant.

use tree_sitter::Node;

use crate::shared::utils::tree_sitter::{string_literal_value, unparenthesize};

pub fn fold_constant_string(node: Node, source: &str) -> Option<String> {
    let node = unparenthesize(node);
    match node.kind() {
        "string" | "concatenated_string" => string_literal_value(&node, source),
        "binary_operator" => {
            let operator = node.child_by_field_name("operator")?;
            if operator.kind() != "+" {
                return None;
            }
            let left = fold_constant_string(node.child_by_field_name("left")?, source)?;
            let right = fold_constant_string(node.child_by_field_name("right")?, source)?;
            Some(left + &right)
        }
        _ => None,
    }
}
