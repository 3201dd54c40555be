//! LSP-backed code-unit source (§6) — an alternative to a tree-sitter
//! plugin for languages whose structural signal comes from a running
//! language server instead of a bundled grammar. Treated as an external
//! collaborator contract: this module defines the seam the core converts
//! into `CodeUnit`s, not a concrete language server integration.

use std::path::Path;

use astrograph_core::{CodeUnit, Label, LabeledGraph, UnitKind, ANONYMOUS};

use crate::extractor::{dedup_units, filter_import_only};
use crate::plugin::{LanguagePlugin, PluginError};

/// One symbol as reported by an external language server.
#[derive(Debug, Clone)]
pub struct LspSymbol {
    pub symbol_kind: String,
    pub name: Option<String>,
    pub start_line: u32,
    pub end_line: u32,
}

/// The external symbol-server contract the core consumes: given a file
/// path, return the symbols the server sees in it. A real deployment talks
/// to an out-of-process language server; this trait is only the seam.
pub trait SymbolServer: Send + Sync {
    fn language_id(&self) -> &'static str;
    fn file_extensions(&self) -> &'static [&'static str];
    fn symbols(&self, file_path: &Path, bytes: &[u8]) -> Result<Vec<LspSymbol>, PluginError>;
}

/// Adapts a `SymbolServer` into a `LanguagePlugin`. Symbol ranges are
/// advisory (§9): the same significance thresholds and import-only filter
/// downstream apply identically to these units as to grammar-derived ones.
pub struct LspPlugin<S: SymbolServer> {
    server: S,
}

impl<S: SymbolServer> LspPlugin<S> {
    pub fn new(server: S) -> Self {
        LspPlugin { server }
    }

    fn symbol_kind_to_unit_kind(kind: &str) -> UnitKind {
        match kind.to_ascii_lowercase().as_str() {
            "class" | "struct" | "interface" | "enum" => UnitKind::Class,
            _ => UnitKind::Function,
        }
    }

    /// A trivial depth-1 subgraph: root labeled by symbol kind, one child
    /// per line grouping (§6).
    fn trivial_graph(root_label: &str, line_count: u32) -> LabeledGraph {
        let mut graph = LabeledGraph::new();
        let root = graph.add_node(Label::new(root_label.to_string()));
        for _ in 0..line_count.max(1) {
            let child = graph.add_node(Label::new("line"));
            graph.add_child(root, child);
        }
        graph
    }
}

impl<S: SymbolServer> LanguagePlugin for LspPlugin<S> {
    fn language_id(&self) -> &'static str {
        self.server.language_id()
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.server.file_extensions()
    }

    fn source_to_graph(&self, _bytes: &[u8]) -> Result<LabeledGraph, PluginError> {
        // The symbol-server contract has no whole-file structural graph;
        // a grammar-backed plugin is needed for that.
        Err(PluginError::ParseFailure)
    }

    fn extract_code_units(&self, bytes: &[u8], file_path: &Path) -> Result<Vec<CodeUnit>, PluginError> {
        let text = std::str::from_utf8(bytes).map_err(|_| PluginError::UnsupportedEncoding)?;
        let lines: Vec<&str> = text.lines().collect();
        let symbols = self.server.symbols(file_path, bytes)?;

        let mut raw = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if symbol.start_line == 0 || symbol.end_line < symbol.start_line {
                continue;
            }
            let start_idx = (symbol.start_line - 1) as usize;
            let end_idx = (symbol.end_line as usize).min(lines.len());
            if start_idx >= end_idx {
                continue;
            }
            let source_text = lines[start_idx..end_idx].join("\n");
            let kind = Self::symbol_kind_to_unit_kind(&symbol.symbol_kind);
            let line_count = symbol.end_line.saturating_sub(symbol.start_line) + 1;
            let graph = Self::trivial_graph(kind.label(), line_count);
            raw.push(CodeUnit {
                kind,
                name: symbol.name.unwrap_or_else(|| ANONYMOUS.to_string()),
                language_id: self.language_id().to_string(),
                file_path: file_path.to_path_buf(),
                start_line: symbol.start_line,
                end_line: symbol.end_line,
                node_count: (end_idx - start_idx).max(1) + 1,
                extracted_code: source_text.split_whitespace().collect::<Vec<_>>().join(" "),
                source_text,
                block_type: None,
                exact_graph: graph.clone(),
                pattern_graph: graph,
            });
        }

        Ok(filter_import_only(dedup_units(raw)))
    }

    fn unit_graph(&self, unit: &CodeUnit, normalize_ops: bool) -> Result<LabeledGraph, PluginError> {
        Ok(if normalize_ops { unit.pattern_graph.clone() } else { unit.exact_graph.clone() })
    }
}
