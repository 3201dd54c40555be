//! Python grammar hooks.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct PythonHooks;

impl TreeSitterHooks for PythonHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn node_label(&self, node: Node, normalize_ops: bool) -> String {
        let kind = node.kind();
        if is_identifier_kind(kind) {
            "identifier".to_string()
        } else if is_literal_kind(kind) {
            "literal".to_string()
        } else if normalize_ops && kind == "binary_operator" {
            "binary_op".to_string()
        } else if normalize_ops && is_python_operator_token(node) {
            "binary_op".to_string()
        } else {
            kind.to_string()
        }
    }

    fn is_function_node(&self, node: Node) -> bool {
        node.kind() == "function_definition"
    }

    fn is_class_node(&self, node: Node) -> bool {
        node.kind() == "class_definition"
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        node.child_by_field_name("name").and_then(|n| n.utf8_text(source).ok()).map(|s| s.to_string())
    }

    fn is_block_node(&self, node: Node) -> bool {
        matches!(node.kind(), "for_statement" | "while_statement" | "if_statement" | "with_statement")
    }

    fn get_block_type(&self, node: Node) -> String {
        match node.kind() {
            "for_statement" => "for",
            "while_statement" => "while",
            "if_statement" => "if",
            "with_statement" => "with",
            other => other,
        }
        .to_string()
    }
}

/// Python represents binary operator tokens (`+`, `and`, `or`, ...) as
/// direct children of `binary_operator`/`boolean_operator` rather than a
/// dedicated node kind, so the operator token itself is what needs
/// collapsing when normalizing.
fn is_python_operator_token(node: Node) -> bool {
    let in_operator_expr = node
        .parent()
        .map(|p| matches!(p.kind(), "binary_operator" | "boolean_operator" | "comparison_operator"))
        .unwrap_or(false);
    in_operator_expr && matches!(node.kind(), "+" | "-" | "*" | "/" | "%" | "and" | "or" | "==" | "!=" | "<" | ">" | "<=" | ">=")
}

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<PythonHooks> {
    TreeSitterPlugin::new(PythonHooks, "python", &[".py", ".pyi"], &["__pycache__", "venv", ".venv"], pool)
}
