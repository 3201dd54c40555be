//! Persistent records the index store keeps per indexed unit.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::model::{Fingerprint, UnitKind};

/// A durable record of one `CodeUnit`, independent of the in-memory
/// corpus a given analysis run produced. Created on first indexing,
/// updated when `evidence_digest` changes, removed when the file
/// disappears.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub file_path: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
    pub kind: UnitKind,
    pub fingerprint: Fingerprint,
    pub evidence_digest: Digest,
}
