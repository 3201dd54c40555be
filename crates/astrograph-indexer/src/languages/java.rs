//! Java grammar hooks.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind, is_operator_token};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct JavaHooks;

impl TreeSitterHooks for JavaHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
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
        matches!(node.kind(), "method_declaration" | "constructor_declaration")
    }

    fn is_class_node(&self, node: Node) -> bool {
        matches!(node.kind(), "class_declaration" | "interface_declaration" | "enum_declaration")
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        node.child_by_field_name("name").and_then(|n| n.utf8_text(source).ok()).map(|s| s.to_string())
    }

    fn is_block_node(&self, node: Node) -> bool {
        matches!(node.kind(), "for_statement" | "enhanced_for_statement" | "while_statement" | "if_statement")
    }

    fn get_block_type(&self, node: Node) -> String {
        match node.kind() {
            "for_statement" | "enhanced_for_statement" => "for",
            "while_statement" => "while",
            "if_statement" => "if",
            other => other,
        }
        .to_string()
    }
}

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<JavaHooks> {
    TreeSitterPlugin::new(JavaHooks, "java", &[".java"], &["target", "build"], pool)
}
