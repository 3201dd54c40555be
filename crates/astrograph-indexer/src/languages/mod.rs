//! One module per first-class language, each supplying `TreeSitterHooks`
//! for the generic `TreeSitterPlugin`.

pub mod c;
pub mod cpp;
pub mod go;
pub mod java;
pub mod javascript;
pub mod lsp;
pub mod python;
pub mod rust;
pub mod typescript;

use std::sync::Arc;

use crate::parser_pool::ParserPool;
use crate::plugin::LanguagePlugin;

/// Every first-class language plugin, sharing one parser pool.
pub fn default_plugins(pool: ParserPool) -> Vec<Arc<dyn LanguagePlugin>> {
    vec![
        Arc::new(rust::plugin(pool.clone())),
        Arc::new(typescript::plugin(pool.clone())),
        Arc::new(javascript::plugin(pool.clone())),
        Arc::new(python::plugin(pool.clone())),
        Arc::new(go::plugin(pool.clone())),
        Arc::new(java::plugin(pool.clone())),
        Arc::new(c::plugin(pool.clone())),
        Arc::new(cpp::plugin(pool)),
    ]
}

/// Shared helper: is this node kind one of the generic "operator token"
/// kinds tree-sitter grammars represent as bare punctuation/keyword
/// strings? Used by every hook's `node_label` to decide whether
/// `normalize_ops` should collapse it.
pub(crate) fn is_operator_token(kind: &str) -> bool {
    matches!(
        kind,
        "+" | "-"
            | "*"
            | "/"
            | "%"
            | "=="
            | "!="
            | "<"
            | ">"
            | "<="
            | ">="
            | "&&"
            | "||"
            | "&"
            | "|"
            | "^"
            | "<<"
            | ">>"
            | "="
            | "+="
            | "-="
            | "*="
            | "/="
    )
}

/// Shared helper: generic identifier-ish node kinds across grammars.
pub(crate) fn is_identifier_kind(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "field_identifier"
            | "type_identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
    )
}

/// Shared helper: generic literal node kinds across grammars.
pub(crate) fn is_literal_kind(kind: &str) -> bool {
    matches!(
        kind,
        "integer_literal"
            | "float_literal"
            | "string_literal"
            | "char_literal"
            | "boolean_literal"
            | "integer"
            | "float"
            | "string"
            | "true"
            | "false"
            | "none"
            | "null"
            | "number"
            | "number_literal"
            | "decimal_integer_literal"
            | "interpreted_string_literal"
            | "raw_string_literal"
            | "int_literal"
            | "template_string"
    )
}
