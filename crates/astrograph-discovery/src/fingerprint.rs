//! Structural fingerprinting (§4.4) — a bottom-up Merkle hash over a
//! `LabeledGraph`'s ordered children, computed once with operators
//! preserved and once with operators normalized to produce the
//! `(exact, pattern)` pair every `CodeUnit` carries.

use astrograph_core::{Digest, DigestHasher, Fingerprint, LabeledGraph, NodeId};
use astrograph_indexer::{LanguagePlugin, PluginError};

/// `h(n) = H(label(n) ∥ h(c₁) ∥ … ∥ h(cₖ))`. Node ids never enter the
/// hash input — only labels and structure do, so the digest is invariant
/// under identifier/literal renaming and stable across host architectures.
pub fn merkle_digest(graph: &LabeledGraph) -> Digest {
    match graph.root() {
        Some(root) => hash_node(graph, root),
        None => Digest::of_bytes(b""),
    }
}

fn hash_node(graph: &LabeledGraph, id: NodeId) -> Digest {
    let mut hasher = DigestHasher::new();
    if let Some(label) = graph.label(id) {
        hasher.update(label.as_ref().as_bytes());
    }
    for &child in graph.children(id) {
        let child_digest = hash_node(graph, child);
        hasher.update(&child_digest.0);
    }
    hasher.finalize()
}

/// Compute both fingerprints for a unit by asking its plugin for the
/// exact and pattern subgraphs and hashing each.
pub fn fingerprint_unit(
    plugin: &dyn LanguagePlugin,
    unit: &astrograph_core::CodeUnit,
) -> Result<Fingerprint, PluginError> {
    let exact_graph = plugin.unit_graph(unit, false)?;
    let pattern_graph = plugin.unit_graph(unit, true)?;
    Ok(Fingerprint { exact: merkle_digest(&exact_graph), pattern: merkle_digest(&pattern_graph) })
}
