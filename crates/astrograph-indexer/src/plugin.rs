//! The language plugin capability set (§4.1) — the polymorphic interface
//! every concrete language implementation (tree-sitter-backed or LSP-backed)
//! satisfies so the rest of the engine never special-cases a language.

use std::path::Path;

use astrograph_core::{CodeUnit, LabeledGraph};
use thiserror::Error;

/// Errors a plugin can raise while turning bytes into structure. Both are
/// file-local and recovered by the caller (§7): the file is skipped and
/// the failure accumulates in the run's report instead of aborting it.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("grammar could not produce a parse tree")]
    ParseFailure,
    #[error("source is not valid UTF-8")]
    UnsupportedEncoding,
}

/// Turns source bytes into a `LabeledGraph` and enumerates the `CodeUnit`s
/// (functions, classes, optional blocks) it contains.
///
/// Implementations must honor the labeling discipline (§4.2): labels are
/// derived from syntactic structure only, never from identifier or literal
/// text, so that renaming variables or literals never changes a fingerprint.
pub trait LanguagePlugin: Send + Sync {
    /// Unique, stable identifier, e.g. `"rust"`.
    fn language_id(&self) -> &'static str;

    /// Dot-prefixed, lowercase extensions this plugin claims.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Directory names to prune during tree walks (build artifacts, vendor
    /// trees, etc. for this ecosystem). Empty by default.
    fn skip_dirs(&self) -> &'static [&'static str] {
        &[]
    }

    /// Parse `bytes` and return the whole-file labeled graph, operators
    /// preserved (`normalize_ops = false`).
    fn source_to_graph(&self, bytes: &[u8]) -> Result<LabeledGraph, PluginError>;

    /// Enumerate functions, classes, and (if the plugin supports them)
    /// control-flow blocks found in `bytes`.
    fn extract_code_units(
        &self,
        bytes: &[u8],
        file_path: &Path,
    ) -> Result<Vec<CodeUnit>, PluginError>;

    /// Produce a unit's own subgraph, operators preserved. Fingerprinting
    /// calls `unit_graph` directly when it also needs the operator-
    /// normalized variant; this is the spec-level convenience entry point
    /// that always returns the exact (non-normalized) graph.
    fn code_unit_to_ast_graph(&self, unit: &CodeUnit) -> Result<LabeledGraph, PluginError> {
        self.unit_graph(unit, false)
    }

    /// Produce a unit's subgraph with `normalize_ops` controlling whether
    /// operator nodes collapse to a generic class. The structural
    /// fingerprinter calls this twice per unit (once per `normalize_ops`
    /// value) to get the exact and pattern graphs.
    fn unit_graph(&self, unit: &CodeUnit, normalize_ops: bool) -> Result<LabeledGraph, PluginError>;
}
