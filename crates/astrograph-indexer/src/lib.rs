//! File parsing and code-unit extraction: the language plugin capability
//! set (§4.1), its tree-sitter-backed generic implementation (§4.2), the
//! concrete grammar bindings (§4.3's extractor lives here too, shared
//! across plugins), and the registry that resolves a plugin per file.

pub mod extractor;
pub mod languages;
pub mod parser_pool;
pub mod plugin;
pub mod registry;
pub mod tree_sitter_plugin;

pub use parser_pool::{create_parser_pool, ParserPool};
pub use plugin::{LanguagePlugin, PluginError};
pub use registry::PluginRegistry;
pub use tree_sitter_plugin::{TreeSitterHooks, TreeSitterPlugin};
