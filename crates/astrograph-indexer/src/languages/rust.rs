//! Rust grammar hooks.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind, is_operator_token};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct RustHooks;

impl TreeSitterHooks for RustHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_rust::LANGUAGE.into()
    }

    fn node_label(&self, node: Node, normalize_ops: bool) -> String {
        let kind = node.kind();
        if is_identifier_kind(kind) {
            "identifier".to_string()
        } else if is_literal_kind(kind) {
            "literal".to_string()
        } else if normalize_ops && is_operator_token(kind) {
            "binary_op".to_string()
        } else {
            kind.to_string()
        }
    }

    fn is_function_node(&self, node: Node) -> bool {
        node.kind() == "function_item"
    }

    fn is_class_node(&self, node: Node) -> bool {
        matches!(node.kind(), "struct_item" | "enum_item" | "trait_item" | "impl_item")
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        node.child_by_field_name("name")
            .or_else(|| node.child_by_field_name("type"))
            .and_then(|n| n.utf8_text(source).ok())
            .map(|s| s.to_string())
    }

    fn is_block_node(&self, node: Node) -> bool {
        matches!(
            node.kind(),
            "for_expression" | "while_expression" | "loop_expression" | "if_expression" | "match_expression"
        )
    }

    fn get_block_type(&self, node: Node) -> String {
        match node.kind() {
            "for_expression" => "for",
            "while_expression" => "while",
            "loop_expression" => "loop",
            "if_expression" => "if",
            "match_expression" => "match",
            other => other,
        }
        .to_string()
    }
}

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<RustHooks> {
    TreeSitterPlugin::new(RustHooks, "rust", &[".rs"], &["target"], pool)
}
