//! C++ grammar hooks.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind, is_operator_token};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct CppHooks;

impl TreeSitterHooks for CppHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_cpp::LANGUAGE.into()
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
        node.kind() == "function_definition"
    }

    fn is_class_node(&self, node: Node) -> bool {
        matches!(node.kind(), "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier")
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        if node.kind() == "function_definition" {
            let mut declarator = node.child_by_field_name("declarator")?;
            loop {
                if declarator.kind() == "function_declarator" {
                    return declarator
                        .child_by_field_name("declarator")
                        .and_then(|n| n.utf8_text(source).ok())
                        .map(|s| s.to_string());
                }
                declarator = declarator.child_by_field_name("declarator")?;
            }
        }
        node.child_by_field_name("name").and_then(|n| n.utf8_text(source).ok()).map(|s| s.to_string())
    }

    fn is_block_node(&self, node: Node) -> bool {
        matches!(node.kind(), "for_statement" | "while_statement" | "if_statement" | "switch_statement")
    }

    fn get_block_type(&self, node: Node) -> String {
        match node.kind() {
            "for_statement" => "for",
            "while_statement" => "while",
            "if_statement" => "if",
            "switch_statement" => "switch",
            other => other,
        }
        .to_string()
    }
}

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<CppHooks> {
    TreeSitterPlugin::new(CppHooks, "cpp", &[".cpp", ".cc", ".cxx", ".hpp", ".hh"], &["build", "cmake-build-debug"], pool)
}
