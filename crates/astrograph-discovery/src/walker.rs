//! Corpus construction: walks a source tree, resolves a plugin per file,
//! and produces the fingerprinted `CodeUnit` corpus the clustering stage
//! consumes (§5's "parse + unit extraction: embarrassingly parallel
//! across files").

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use astrograph_core::{AccumulatedFailure, CodeUnit, Fingerprint};
use astrograph_indexer::PluginRegistry;
use rayon::prelude::*;

use crate::fingerprint::fingerprint_unit;

/// A `CodeUnit` paired with its computed fingerprint — the corpus element
/// every later stage (clustering, pre-create check, indexing) works with.
#[derive(Debug, Clone)]
pub struct CorpusUnit {
    pub unit: CodeUnit,
    pub fingerprint: Fingerprint,
}

pub struct CorpusResult {
    pub units: Vec<CorpusUnit>,
    pub failures: Vec<AccumulatedFailure>,
    pub files_scanned: usize,
}

/// Walk `root`, honoring `.gitignore` (via the `ignore` crate's standard
/// filters) and every registered plugin's `skip_dirs()`, then parse and
/// extract in parallel across a `rayon` pool.
pub fn build_corpus(
    root: &Path,
    registry: &PluginRegistry,
    languages_filter: Option<&[String]>,
) -> CorpusResult {
    let files = collect_files(root, registry);
    let failures = Mutex::new(Vec::new());

    let units: Vec<CorpusUnit> = files
        .par_iter()
        .flat_map_iter(|path| {
            process_file(path, registry, languages_filter, &failures).into_iter()
        })
        .collect();

    CorpusResult { units, failures: failures.into_inner().unwrap(), files_scanned: files.len() }
}

fn collect_files(root: &Path, registry: &PluginRegistry) -> Vec<PathBuf> {
    let skip_dirs = registry.all_skip_dirs();
    let mut builder = ignore::WalkBuilder::new(root);
    builder.standard_filters(true);
    builder
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| {
            !entry.path().components().any(|c| {
                c.as_os_str().to_str().map(|s| skip_dirs.contains(s)).unwrap_or(false)
            })
        })
        .filter(|entry| registry.resolve_for_path(entry.path()).is_some())
        .map(|entry| entry.into_path())
        .collect()
}

fn process_file(
    path: &Path,
    registry: &PluginRegistry,
    languages_filter: Option<&[String]>,
    failures: &Mutex<Vec<AccumulatedFailure>>,
) -> Vec<CorpusUnit> {
    let Some(plugin) = registry.resolve_for_path(path) else {
        // unsupported_language: skipped silently, not counted as a failure.
        return Vec::new();
    };

    if let Some(allowed) = languages_filter {
        if !allowed.iter().any(|l| l == plugin.language_id()) {
            return Vec::new();
        }
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            failures.lock().unwrap().push(AccumulatedFailure {
                file_path: path.to_path_buf(),
                message: format!("io_error: {e}"),
            });
            return Vec::new();
        }
    };

    let extracted = match plugin.extract_code_units(&bytes, path) {
        Ok(units) => units,
        Err(e) => {
            failures.lock().unwrap().push(AccumulatedFailure {
                file_path: path.to_path_buf(),
                message: format!("parse_failure: {e}"),
            });
            return Vec::new();
        }
    };

    extracted
        .into_iter()
        .filter_map(|unit| match fingerprint_unit(plugin.as_ref(), &unit) {
            Ok(fingerprint) => Some(CorpusUnit { unit, fingerprint }),
            Err(e) => {
                failures.lock().unwrap().push(AccumulatedFailure {
                    file_path: path.to_path_buf(),
                    message: format!("fingerprinting failed for {}: {e}", unit.name),
                });
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrograph_indexer::PluginRegistry;

    #[test]
    fn walks_a_small_tree() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn f(a: i32) -> i32 { a + 1 }").unwrap();
        std::fs::write(dir.path().join("README.md"), "not code").unwrap();

        let registry = PluginRegistry::with_defaults();
        let result = build_corpus(dir.path(), &registry, None);

        assert_eq!(result.units.len(), 1);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn skip_dirs_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("target")).unwrap();
        std::fs::write(dir.path().join("target/generated.rs"), "fn g() { let _x = 1; }").unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn f() { let _x = 1; }").unwrap();

        let registry = PluginRegistry::with_defaults();
        let result = build_corpus(dir.path(), &registry, None);

        assert_eq!(result.units.len(), 1);
    }
}
