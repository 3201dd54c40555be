//! Analysis reporter (§4.7): renders a discovery result to a timestamped
//! text artifact under the metadata directory's `reports/` subdirectory.

use std::io::Write;
use std::path::{Path, PathBuf};

use astrograph_core::{ClusterKind, DuplicateCluster, EngineError, Result};
use chrono::{DateTime, Utc};

use crate::index::REPORTS_DIR;

/// Tool version stamped in every report's header line.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render `clusters` to a new timestamped file under `metadata_dir`'s
/// `reports/` subdirectory and return its absolute path.
pub fn write_report(metadata_dir: &Path, clusters: &[DuplicateCluster], run_at: DateTime<Utc>) -> Result<PathBuf> {
    let file_name = format!("analysis_report_{}.txt", run_at.format("%Y%m%d_%H%M%S_%6f"));
    let path = metadata_dir.join(REPORTS_DIR).join(&file_name);

    let body = render(clusters, run_at);
    let mut file = std::fs::File::create(&path).map_err(|e| EngineError::io(path.clone(), e))?;
    file.write_all(body.as_bytes()).map_err(|e| EngineError::io(path.clone(), e))?;

    Ok(path.canonicalize().unwrap_or(path))
}

/// Pure rendering function, kept separate from I/O so report bodies can
/// be snapshot-tested without touching the filesystem.
///
/// The body itself carries no timestamp — only the file name does — so
/// that two runs over an unchanged tree produce byte-identical bodies.
pub fn render(clusters: &[DuplicateCluster], _run_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!("astrograph analysis report — version {TOOL_VERSION}\n"));
    out.push_str(&format!("{} duplicate clusters found\n", clusters.len()));

    for kind in [ClusterKind::Exact, ClusterKind::Pattern, ClusterKind::Block] {
        let section: Vec<&DuplicateCluster> = clusters.iter().filter(|c| c.kind == kind).collect();
        if section.is_empty() {
            continue;
        }
        out.push_str(&format!("\n== {} ({}) ==\n", kind.label(), section.len()));
        for cluster in section {
            out.push_str(&format!(
                "\n[{}] {} · node_count={} line_count={} members={}\n",
                cluster.unit_kind.label(),
                cluster.fingerprint,
                cluster.node_count,
                cluster.line_count,
                cluster.members.len(),
            ));
            for member in &cluster.members {
                out.push_str(&format!("  {}\n", member.location()));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrograph_core::{CodeUnit, Digest, UnitKind};

    fn sample_cluster() -> DuplicateCluster {
        DuplicateCluster {
            kind: ClusterKind::Exact,
            fingerprint: Digest([7; 16]),
            unit_kind: UnitKind::Function,
            language_id: "rust".to_string(),
            node_count: 7,
            line_count: 3,
            members: vec![
                CodeUnit {
                    kind: UnitKind::Function,
                    name: "f".to_string(),
                    language_id: "rust".to_string(),
                    file_path: PathBuf::from("a.rs"),
                    start_line: 1,
                    end_line: 3,
                    node_count: 7,
                    source_text: String::new(),
                    extracted_code: String::new(),
                    block_type: None,
                    exact_graph: astrograph_core::LabeledGraph::new(),
                    pattern_graph: astrograph_core::LabeledGraph::new(),
                },
                CodeUnit {
                    kind: UnitKind::Function,
                    name: "g".to_string(),
                    language_id: "rust".to_string(),
                    file_path: PathBuf::from("b.rs"),
                    start_line: 5,
                    end_line: 7,
                    node_count: 7,
                    source_text: String::new(),
                    extracted_code: String::new(),
                    block_type: None,
                    exact_graph: astrograph_core::LabeledGraph::new(),
                    pattern_graph: astrograph_core::LabeledGraph::new(),
                },
            ],
        }
    }

    #[test]
    fn render_includes_members_and_header() {
        let run_at = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let body = render(&[sample_cluster()], run_at);
        assert!(body.contains("1 duplicate clusters found"));
        assert!(body.contains("a.rs:1-3"));
        assert!(body.contains("b.rs:5-7"));
    }

    #[test]
    fn write_report_produces_distinctly_named_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(REPORTS_DIR)).unwrap();
        let t1 = Utc::now();
        let t2 = t1 + chrono::Duration::microseconds(1);
        let p1 = write_report(dir.path(), &[sample_cluster()], t1).unwrap();
        let p2 = write_report(dir.path(), &[sample_cluster()], t2).unwrap();
        assert_ne!(p1, p2);
    }
}
