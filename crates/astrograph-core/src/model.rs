//! Code units, fingerprints, and duplicate clusters — the vocabulary
//! the discovery pipeline passes between its stages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::graph::LabeledGraph;

/// Supported languages for syntax-aware parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Rust,
    TypeScript,
    JavaScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    /// Produced when a cluster's members don't all share one language id.
    Mixed,
    Other,
}

impl Language {
    pub fn id(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Mixed => "mixed",
            Language::Other => "other",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// What a `CodeUnit` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Function,
    Class,
    Block,
}

impl UnitKind {
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Function => "function",
            UnitKind::Class => "class",
            UnitKind::Block => "block",
        }
    }
}

/// Name used for a unit a plugin could not attach an identifier to.
pub const ANONYMOUS: &str = "<anonymous>";

/// A semantic region of source — a function, class, or (optionally) a
/// control-flow block — extracted by a language plugin.
///
/// Invariants: `start_line <= end_line`; `node_count >= 1`; `block_type`
/// is `Some` iff `kind == UnitKind::Block`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeUnit {
    pub kind: UnitKind,
    pub name: String,
    pub language_id: String,
    pub file_path: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
    pub node_count: usize,
    pub source_text: String,
    /// Whitespace-normalized source, used only for import-only detection.
    pub extracted_code: String,
    /// Present iff `kind == UnitKind::Block` (e.g. `"for"`, `"while"`, `"if"`).
    pub block_type: Option<String>,
    /// The unit's own subgraph, operators preserved, captured from the
    /// in-context node at extraction time — never reconstructed by
    /// reparsing `source_text` in isolation (a bare block snippet is not
    /// valid top-level syntax in most grammars).
    pub exact_graph: LabeledGraph,
    /// Same subgraph with operator nodes normalized to a generic label.
    pub pattern_graph: LabeledGraph,
}

impl CodeUnit {
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// True when, discarding leading whitespace, `extracted_code` begins
    /// with `import ` or `from ` — the import-only filter in §4.3.
    pub fn is_import_only(&self) -> bool {
        let trimmed = self.extracted_code.trim_start();
        trimmed.starts_with("import ") || trimmed.starts_with("from ")
    }

    /// A hash of the unit's raw source bytes, used to detect staleness of
    /// index entries and suppressions.
    pub fn evidence_digest(&self) -> Digest {
        Digest::of_bytes(self.source_text.as_bytes())
    }

    pub fn location(&self) -> String {
        format!("{}:{}-{}", self.file_path.display(), self.start_line, self.end_line)
    }

    /// Key used to deduplicate overlapping/duplicate node ranges emitted
    /// by the same extraction pass (grammar oddities) — first occurrence
    /// wins.
    pub fn dedup_key(&self) -> (UnitKind, u32, u32, String) {
        (self.kind, self.start_line, self.end_line, self.name.clone())
    }
}

/// A fixed-width digest pair over a unit's subgraph: `exact` preserves
/// operator identity, `pattern` normalizes operators to a generic class.
/// Both are invariant under identifier/literal renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub exact: Digest,
    pub pattern: Digest,
}

/// Which fingerprint field a discovery partition is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintKind {
    Exact,
    Pattern,
}

/// The kind of duplication a `DuplicateCluster` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterKind {
    Exact,
    Pattern,
    Block,
}

impl ClusterKind {
    pub fn label(&self) -> &'static str {
        match self {
            ClusterKind::Exact => "exact",
            ClusterKind::Pattern => "pattern",
            ClusterKind::Block => "block",
        }
    }
}

/// A set of `>= 2` code units sharing a fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub kind: ClusterKind,
    pub fingerprint: Digest,
    pub unit_kind: UnitKind,
    pub language_id: String,
    pub node_count: usize,
    pub line_count: u32,
    pub members: Vec<CodeUnit>,
}

impl DuplicateCluster {
    /// Stable key identifying this cluster across runs, used to anchor
    /// suppressions: the fingerprint plus what kind of duplication it is.
    pub fn cluster_key(&self) -> String {
        format!("{}:{}:{}", self.kind.label(), self.unit_kind.label(), self.fingerprint)
    }

    pub fn evidence_digests(&self) -> Vec<Digest> {
        self.members.iter().map(CodeUnit::evidence_digest).collect()
    }
}
