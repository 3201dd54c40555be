//! User-declared tolerance for a specific duplicate cluster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// A suppression anchors itself to the exact evidence of the units it was
/// declared against. It is *active* iff every one of `evidence_digests`
/// still matches a current `IndexEntry`; otherwise it is stale and must
/// not be applied (§4.6's invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suppression {
    pub cluster_key: String,
    pub evidence_digests: Vec<Digest>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Suppression {
    pub fn new(cluster_key: String, evidence_digests: Vec<Digest>, reason: String) -> Self {
        Suppression { cluster_key, evidence_digests, reason, created_at: Utc::now() }
    }

    /// Active iff every evidence digest this suppression was declared
    /// against is still present among `current_digests`.
    pub fn is_active(&self, current_digests: &std::collections::HashSet<Digest>) -> bool {
        self.evidence_digests.iter().all(|d| current_digests.contains(d))
    }
}
