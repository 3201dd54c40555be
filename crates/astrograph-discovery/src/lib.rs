//! Duplicate discovery: corpus construction over a source tree (§5),
//! structural fingerprinting (§4.4), significance-thresholded clustering
//! (§4.5), and the pre-create check used by `write`/`edit` (§6).

pub mod cluster;
pub mod fingerprint;
pub mod precheck;
pub mod walker;

pub use cluster::discover;
pub use fingerprint::{fingerprint_unit, merkle_digest};
pub use precheck::{check as precheck_candidate, PreCreateMatch, PreCreateWarning};
pub use walker::{build_corpus, CorpusResult, CorpusUnit};

use std::path::Path;

use astrograph_core::{AnalysisConfig, DuplicateCluster};
use astrograph_core::AccumulatedFailure;
use astrograph_indexer::PluginRegistry;

/// End-to-end result of one `analyze` run over a project root.
pub struct AnalysisResult {
    pub clusters: Vec<DuplicateCluster>,
    pub failures: Vec<AccumulatedFailure>,
    pub files_scanned: usize,
    pub units_extracted: usize,
}

/// Walk `root`, fingerprint every extracted unit, and cluster the
/// duplicates — the single entry point the CLI, server, and watcher all
/// call into.
pub fn analyze(root: &Path, registry: &PluginRegistry, config: &AnalysisConfig) -> AnalysisResult {
    let corpus = build_corpus(root, registry, config.languages.as_deref());
    let clusters = cluster::discover(&corpus.units, config);
    AnalysisResult {
        clusters,
        failures: corpus.failures,
        files_scanned: corpus.files_scanned,
        units_extracted: corpus.units.len(),
    }
}
