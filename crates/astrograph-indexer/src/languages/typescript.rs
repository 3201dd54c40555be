//! TypeScript/TSX grammar hooks. Shares node-kind vocabulary with
//! JavaScript (the TS grammar is a superset) so the two hook sets track
//! each other closely.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind, is_operator_token};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct TypeScriptHooks;

impl TreeSitterHooks for TypeScriptHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
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
        matches!(
            node.kind(),
            "function_declaration" | "function_expression" | "arrow_function" | "method_definition"
        )
    }

    fn is_class_node(&self, node: Node) -> bool {
        matches!(node.kind(), "class_declaration" | "interface_declaration")
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        node.child_by_field_name("name").and_then(|n| n.utf8_text(source).ok()).map(|s| s.to_string())
    }

    fn is_block_node(&self, node: Node) -> bool {
        matches!(
            node.kind(),
            "for_statement" | "for_in_statement" | "while_statement" | "if_statement" | "switch_statement"
        )
    }

    fn get_block_type(&self, node: Node) -> String {
        match node.kind() {
            "for_statement" | "for_in_statement" => "for",
            "while_statement" => "while",
            "if_statement" => "if",
            "switch_statement" => "switch",
            other => other,
        }
        .to_string()
    }
}

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<TypeScriptHooks> {
    TreeSitterPlugin::new(TypeScriptHooks, "typescript", &[".ts", ".tsx"], &["node_modules", "dist"], pool)
}
