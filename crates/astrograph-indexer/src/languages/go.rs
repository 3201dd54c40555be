//! Go grammar hooks.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind, is_operator_token};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct GoHooks;

impl TreeSitterHooks for GoHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_go::LANGUAGE.into()
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
        matches!(node.kind(), "function_declaration" | "method_declaration")
    }

    fn is_class_node(&self, node: Node) -> bool {
        // Go has no classes; a top-level struct type declaration is the
        // closest structural analog.
        node.kind() == "type_declaration"
            && node
                .named_child(0)
                .and_then(|spec| spec.child_by_field_name("type"))
                .map(|t| t.kind() == "struct_type")
                .unwrap_or(false)
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        if node.kind() == "type_declaration" {
            return node
                .named_child(0)
                .and_then(|spec| spec.child_by_field_name("name"))
                .and_then(|n| n.utf8_text(source).ok())
                .map(|s| s.to_string());
        }
        node.child_by_field_name("name").and_then(|n| n.utf8_text(source).ok()).map(|s| s.to_string())
    }

    fn is_block_node(&self, node: Node) -> bool {
        matches!(node.kind(), "for_statement" | "if_statement")
    }

    fn get_block_type(&self, node: Node) -> String {
        match node.kind() {
            "for_statement" => "for",
            "if_statement" => "if",
            other => other,
        }
        .to_string()
    }
}

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<GoHooks> {
    TreeSitterPlugin::new(GoHooks, "go", &[".go"], &["vendor"], pool)
}
