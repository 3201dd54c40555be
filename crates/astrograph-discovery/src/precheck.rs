//! Pre-create check (§4.5/§6): before `write`/`edit` lands new source on
//! disk, fingerprint the candidate unit(s) against the existing corpus
//! and warn when the new code would duplicate something that already
//! meets the significance threshold — independent of `min_node_count_exact`.

use astrograph_core::{CodeUnit, Digest, PRE_CREATE_MIN_NODE_COUNT};

use crate::walker::CorpusUnit;

/// One pre-existing location the candidate would duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreCreateMatch {
    pub location: String,
    pub exact: bool,
}

/// Outcome of checking one candidate unit against the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreCreateWarning {
    pub candidate_name: String,
    pub matches: Vec<PreCreateMatch>,
}

/// Compare `candidate`'s fingerprint against every unit already indexed
/// in `corpus`. Units below `PRE_CREATE_MIN_NODE_COUNT` never trigger a
/// warning — the check exists to stop *significant* duplication, not to
/// flag every shared one-liner.
pub fn check(candidate: &CodeUnit, candidate_fingerprint: Digest, corpus: &[CorpusUnit]) -> Option<PreCreateWarning> {
    if candidate.node_count < PRE_CREATE_MIN_NODE_COUNT {
        return None;
    }

    let matches: Vec<PreCreateMatch> = corpus
        .iter()
        .filter(|cu| cu.unit.node_count >= PRE_CREATE_MIN_NODE_COUNT)
        .filter_map(|cu| {
            if cu.fingerprint.exact == candidate_fingerprint {
                Some(PreCreateMatch { location: cu.unit.location(), exact: true })
            } else if cu.fingerprint.pattern == candidate_fingerprint {
                Some(PreCreateMatch { location: cu.unit.location(), exact: false })
            } else {
                None
            }
        })
        .collect();

    if matches.is_empty() {
        return None;
    }

    Some(PreCreateWarning { candidate_name: candidate.name.clone(), matches })
}
