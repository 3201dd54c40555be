//! JavaScript grammar hooks.

use tree_sitter::Node;

use super::{is_identifier_kind, is_literal_kind, is_operator_token};
use crate::parser_pool::ParserPool;
use crate::tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};

pub struct JavaScriptHooks;

impl TreeSitterHooks for JavaScriptHooks {
    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
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
            "function_declaration"
                | "function_expression"
                | "arrow_function"
                | "method_definition"
                | "generator_function_declaration"
        )
    }

    fn is_class_node(&self, node: Node) -> bool {
        node.kind() == "class_declaration"
    }

    fn get_name(&self, node: Node, source: &[u8]) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return name.utf8_text(source).ok().map(|s| s.to_string());
        }
        // Arrow functions and anonymous function expressions carry no
        // `name` field; an anonymous function stays anonymous (§4.3) —
        // we deliberately don't chase the enclosing variable_declarator.
        None
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

pub fn plugin(pool: ParserPool) -> TreeSitterPlugin<JavaScriptHooks> {
    TreeSitterPlugin::new(JavaScriptHooks, "javascript", &[".js", ".jsx", ".mjs"], &["node_modules", "dist"], pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser_pool::create_parser_pool;
    use crate::plugin::LanguagePlugin;
    use std::path::Path;

    #[test]
    fn extracts_class_and_functions() {
        let plugin = plugin(create_parser_pool());
        let code = r#"
class User {
    constructor(name) {
        this.name = name;
    }

    getName() {
        return this.name;
    }
}

function createUser(name) {
    return new User(name);
}
"#;
        let units = plugin.extract_code_units(code.as_bytes(), Path::new("test.js")).unwrap();
        let classes = units.iter().filter(|u| u.kind == astrograph_core::UnitKind::Class).count();
        let functions = units.iter().filter(|u| u.kind == astrograph_core::UnitKind::Function).count();
        assert_eq!(classes, 1);
        assert_eq!(functions, 3);
    }
}
