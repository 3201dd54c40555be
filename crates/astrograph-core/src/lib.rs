//! astrograph-core — the labeled graph, code unit, fingerprint, cluster,
//! index, suppression, and config types shared by every other crate in
//! the workspace.

pub mod config;
pub mod digest;
pub mod error;
pub mod graph;
pub mod index_entry;
pub mod model;
pub mod suppression;

#[cfg(test)]
pub mod test_utils;

pub use config::{AnalysisConfig, CONFIG_FILE_NAME, EVENT_DRIVEN_ENV_VAR, PRE_CREATE_MIN_NODE_COUNT};
pub use digest::{Digest, DigestHasher};
pub use error::{AccumulatedFailure, EngineError, ErrorKind, Result};
pub use graph::{Label, LabeledGraph, NodeId};
pub use index_entry::IndexEntry;
pub use model::{
    ClusterKind, CodeUnit, DuplicateCluster, Fingerprint, FingerprintKind, Language, UnitKind,
    ANONYMOUS,
};
pub use suppression::Suppression;
