//! Integration tests for astrograph
//!
//! These exercise the full pipeline — walking a tree, extracting code
//! units, fingerprinting, clustering, persisting, and reporting — across
//! crate boundaries, mirroring the end-to-end scenarios in the duplicate
//! discovery design.

use std::path::PathBuf;

use astrograph_core::{AnalysisConfig, ClusterKind};
use astrograph_discovery::{analyze, build_corpus};
use astrograph_indexer::PluginRegistry;
use astrograph_store::IndexStore;

fn registry() -> PluginRegistry {
    PluginRegistry::with_defaults()
}

/// S1: two files, each one function of identical shape under a
/// consistent rename, cluster as an exact duplicate.
#[test]
fn exact_duplicate_with_renamed_identifiers_clusters() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.rs"),
        "fn helper(value: i32) -> i32 {\n    let doubled = value * 2;\n    let out = doubled + 1;\n    out\n}\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.rs"),
        "fn other(num: i32) -> i32 {\n    let scaled = num * 2;\n    let total = scaled + 1;\n    total\n}\n",
    )
    .unwrap();

    let registry = registry();
    let config = AnalysisConfig::default();
    let result = analyze(dir.path(), &registry, &config);

    assert!(result.failures.is_empty());
    let exact: Vec<_> = result.clusters.iter().filter(|c| c.kind == ClusterKind::Exact).collect();
    assert_eq!(exact.len(), 1, "renamed duplicate should produce exactly one exact cluster");
    assert_eq!(exact[0].members.len(), 2);
}

/// S3: two functions differing only in a binary operator cluster as
/// pattern duplicates, not exact ones.
#[test]
fn operator_change_clusters_as_pattern_not_exact() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.rs"),
        "fn combine(a: i32, b: i32) -> i32 {\n    let total = a + b;\n    total\n}\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.rs"),
        "fn combine2(x: i32, y: i32) -> i32 {\n    let total = x - y;\n    total\n}\n",
    )
    .unwrap();

    let registry = registry();
    let config = AnalysisConfig::default();
    let result = analyze(dir.path(), &registry, &config);

    let exact = result.clusters.iter().filter(|c| c.kind == ClusterKind::Exact).count();
    let pattern = result.clusters.iter().filter(|c| c.kind == ClusterKind::Pattern).count();
    assert_eq!(exact, 0, "differing operators must not cluster exactly");
    assert_eq!(pattern, 1, "operator-normalized graphs should still match");
}

/// S4: an LSP-sourced unit whose extracted code begins with `from ...
/// import` is filtered before it ever reaches discovery.
#[test]
fn import_only_units_never_appear_in_the_corpus() {
    use astrograph_indexer::languages::lsp::{LspPlugin, LspSymbol, SymbolServer};
    use astrograph_indexer::{LanguagePlugin, PluginError};
    use std::path::Path;

    struct ImportOnlyServer;
    impl SymbolServer for ImportOnlyServer {
        fn language_id(&self) -> &'static str {
            "fake-lsp"
        }
        fn file_extensions(&self) -> &'static [&'static str] {
            &[".fk"]
        }
        fn symbols(&self, _file_path: &Path, _bytes: &[u8]) -> Result<Vec<LspSymbol>, PluginError> {
            Ok(vec![LspSymbol {
                symbol_kind: "function".to_string(),
                name: Some("wiring".to_string()),
                start_line: 1,
                end_line: 1,
            }])
        }
    }

    let plugin = LspPlugin::new(ImportOnlyServer);
    let units = plugin.extract_code_units(b"from package import thing\n", Path::new("a.fk")).unwrap();
    assert!(units.is_empty(), "import-only unit must be discarded");
}

/// S2: units below `min_node_count_exact` never form a cluster, even
/// when they're byte-identical.
#[test]
fn below_threshold_units_do_not_cluster() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.rs"), "fn f() { let _x = 1; }\n").unwrap();
    std::fs::write(dir.path().join("b.rs"), "fn g() { let _x = 1; }\n").unwrap();

    let registry = registry();
    let mut config = AnalysisConfig::default();
    config.min_node_count_exact = 50;
    let result = analyze(dir.path(), &registry, &config);

    assert!(result.clusters.is_empty());
}

/// S5: suppressing a cluster hides it from a rerun; editing a
/// participant invalidates the suppression.
#[test]
fn suppression_hides_a_cluster_until_a_member_changes() {
    let dir = tempfile::tempdir().unwrap();
    let body = "fn helper(value: i32) -> i32 {\n    let doubled = value * 2;\n    let out = doubled + 1;\n    out\n}\n";
    std::fs::write(dir.path().join("a.rs"), body).unwrap();
    std::fs::write(dir.path().join("b.rs"), body.replace("helper", "other").replace("doubled", "scaled")).unwrap();

    let registry = registry();
    let config = AnalysisConfig::default();

    let first = analyze(dir.path(), &registry, &config);
    let cluster = first.clusters.iter().find(|c| c.kind == ClusterKind::Exact).unwrap();
    let cluster_key = cluster.cluster_key();
    let digests = cluster.evidence_digests();

    {
        let mut store = IndexStore::open(dir.path()).unwrap();
        for c in &first.clusters {
            for member in &c.members {
                store
                    .upsert(
                        member.file_path.clone(),
                        vec![astrograph_core::IndexEntry {
                            file_path: member.file_path.clone(),
                            start_line: member.start_line,
                            end_line: member.end_line,
                            kind: member.kind,
                            fingerprint: astrograph_core::Fingerprint { exact: c.fingerprint, pattern: c.fingerprint },
                            evidence_digest: member.evidence_digest(),
                        }],
                    )
                    .unwrap();
            }
        }
        store.add_suppression(cluster_key.clone(), digests, "intentional duplication".to_string()).unwrap();
        assert_eq!(store.list_active_suppressions().len(), 1);
    }

    // Modify one participant: its evidence digest changes, so the
    // suppression must read as stale on the next query.
    std::fs::write(
        dir.path().join("a.rs"),
        body.replace("1;\n    out", "2;\n    out"),
    )
    .unwrap();

    let second = analyze(dir.path(), &registry, &config);
    let mut store = IndexStore::open(dir.path()).unwrap();
    for c in &second.clusters {
        for member in &c.members {
            store
                .upsert(
                    member.file_path.clone(),
                    vec![astrograph_core::IndexEntry {
                        file_path: member.file_path.clone(),
                        start_line: member.start_line,
                        end_line: member.end_line,
                        kind: member.kind,
                        fingerprint: astrograph_core::Fingerprint { exact: c.fingerprint, pattern: c.fingerprint },
                        evidence_digest: member.evidence_digest(),
                    }],
                )
                .unwrap();
        }
    }
    assert_eq!(store.list_active_suppressions().len(), 0, "suppression must go stale once a member's bytes change");
}

/// S6: two back-to-back runs over the same tree produce byte-identical
/// report bodies (timestamps aside) and the same cluster set.
#[test]
fn repeated_runs_over_the_same_tree_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let body = "fn helper(value: i32) -> i32 {\n    let doubled = value * 2;\n    let out = doubled + 1;\n    out\n}\n";
    std::fs::write(dir.path().join("a.rs"), body).unwrap();
    std::fs::write(dir.path().join("b.rs"), body.replace("helper", "other").replace("doubled", "scaled")).unwrap();

    let registry = registry();
    let config = AnalysisConfig::default();

    let run_at = chrono::Utc::now();
    let first = analyze(dir.path(), &registry, &config);
    let second = analyze(dir.path(), &registry, &config);

    let first_report = astrograph_store::render_report(&first.clusters, run_at);
    let second_report = astrograph_store::render_report(&second.clusters, run_at);
    assert_eq!(first_report, second_report);
    assert_eq!(first.clusters.len(), second.clusters.len());
}

/// The file walker honors each plugin's `skip_dirs()` alongside whatever
/// `.gitignore` already excludes.
#[test]
fn walker_prunes_plugin_declared_build_directories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("target")).unwrap();
    std::fs::write(dir.path().join("target/generated.rs"), "fn g() { let _x = 1; }\n").unwrap();
    std::fs::write(dir.path().join("a.rs"), "fn f() { let _x = 1; }\n").unwrap();

    let registry = registry();
    let result = build_corpus(dir.path(), &registry, None);

    assert_eq!(result.units.len(), 1);
    assert_eq!(result.units[0].unit.file_path, PathBuf::from(dir.path()).join("a.rs"));
}

/// The CLI binary parses and reports its own name under `--help`.
#[test]
fn cli_help_reports_the_binary_name() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_astrograph"))
        .args(["--help"])
        .output()
        .expect("failed to execute astrograph binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("astrograph"));
    assert!(stdout.contains("analyze") || stdout.contains("Analyze"));
}
