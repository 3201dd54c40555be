//! Duplicate discovery (§4.5): partitions the corpus by `(kind,
//! fingerprint_type)`, groups by fingerprint value, applies significance
//! thresholds, and emits deterministically ordered `DuplicateCluster`s.

use std::collections::HashMap;

use astrograph_core::{AnalysisConfig, ClusterKind, CodeUnit, Digest, DuplicateCluster, UnitKind};

use crate::walker::CorpusUnit;

/// Cluster the corpus into exact, pattern, and (if enabled) block
/// duplicate groups, honoring `config`'s thresholds.
pub fn discover(units: &[CorpusUnit], config: &AnalysisConfig) -> Vec<DuplicateCluster> {
    let exact = group(
        units,
        |k| k != UnitKind::Block,
        |cu| cu.fingerprint.exact,
        ClusterKind::Exact,
        config.min_node_count_exact,
        0,
    );
    let mut pattern = group(
        units,
        |k| k != UnitKind::Block,
        |cu| cu.fingerprint.pattern,
        ClusterKind::Pattern,
        config.min_node_count_exact,
        0,
    );

    drop_redundant_pattern_clusters(&mut pattern, &exact);

    let mut clusters = exact;
    clusters.append(&mut pattern);

    if config.include_blocks {
        let mut blocks = group(
            units,
            |k| k == UnitKind::Block,
            |cu| cu.fingerprint.exact,
            ClusterKind::Block,
            config.min_node_count_block,
            config.min_block_lines,
        );
        clusters.append(&mut blocks);
    }

    sort_clusters(&mut clusters);
    clusters
}

fn group(
    units: &[CorpusUnit],
    accept_kind: impl Fn(UnitKind) -> bool,
    fingerprint_of: impl Fn(&CorpusUnit) -> Digest,
    cluster_kind: ClusterKind,
    min_node_count: u32,
    min_line_count: u32,
) -> Vec<DuplicateCluster> {
    let mut groups: HashMap<(UnitKind, [u8; 16]), Vec<usize>> = HashMap::new();
    for (idx, cu) in units.iter().enumerate() {
        if !accept_kind(cu.unit.kind) {
            continue;
        }
        let digest = fingerprint_of(cu);
        groups.entry((cu.unit.kind, digest.0)).or_default().push(idx);
    }

    let mut clusters = Vec::new();
    for ((kind, digest_bytes), idxs) in groups {
        if idxs.len() < 2 {
            continue;
        }
        let meets_threshold = idxs.iter().all(|&i| {
            let u = &units[i].unit;
            u.node_count as u32 >= min_node_count && u.line_count() >= min_line_count
        });
        if !meets_threshold {
            continue;
        }

        let mut members: Vec<CodeUnit> = idxs.iter().map(|&i| units[i].unit.clone()).collect();
        members.sort_by(|a, b| (&a.file_path, a.start_line).cmp(&(&b.file_path, b.start_line)));

        let node_count = members[0].node_count;
        let line_count = members[0].line_count();
        let language_id = if members.iter().all(|m| m.language_id == members[0].language_id) {
            members[0].language_id.clone()
        } else {
            "mixed".to_string()
        };

        clusters.push(DuplicateCluster {
            kind: cluster_kind,
            fingerprint: Digest(digest_bytes),
            unit_kind: kind,
            language_id,
            node_count,
            line_count,
            members,
        });
    }
    clusters
}

/// §4.5's tie-break: when a pattern cluster's membership is identical to
/// an exact cluster's (the exact-duplicate set is also, trivially, a
/// pattern-duplicate set), keep only the exact cluster.
fn drop_redundant_pattern_clusters(pattern: &mut Vec<DuplicateCluster>, exact: &[DuplicateCluster]) {
    let exact_member_sets: Vec<Vec<String>> =
        exact.iter().map(|c| c.members.iter().map(CodeUnit::location).collect()).collect();

    pattern.retain(|p| {
        let locations: Vec<String> = p.members.iter().map(CodeUnit::location).collect();
        !exact_member_sets.iter().any(|e| *e == locations)
    });
}

/// `(kind, descending node_count, first file_path, first start_line)`.
/// Members within each cluster are already sorted, so "first" is simply
/// the cluster's first member.
fn sort_clusters(clusters: &mut [DuplicateCluster]) {
    clusters.sort_by(|a, b| {
        cluster_kind_rank(a.kind)
            .cmp(&cluster_kind_rank(b.kind))
            .then(b.node_count.cmp(&a.node_count))
            .then(a.members[0].file_path.cmp(&b.members[0].file_path))
            .then(a.members[0].start_line.cmp(&b.members[0].start_line))
    });
}

fn cluster_kind_rank(kind: ClusterKind) -> u8 {
    match kind {
        ClusterKind::Exact => 0,
        ClusterKind::Pattern => 1,
        ClusterKind::Block => 2,
    }
}
