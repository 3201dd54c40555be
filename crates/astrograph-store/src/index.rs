//! Persistent index + suppression store (§4.6): a `.metadata_astrograph/`
//! directory holding a length-prefixed `entries.log`, a JSONL
//! `suppressions.log`, and a `reports/` subdirectory the reporter writes
//! into. Exclusive writer access is enforced with a filesystem advisory
//! lock so it holds across process restarts, not just within one
//! process's address space.

use std::collections::{HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use astrograph_core::{Digest, EngineError, IndexEntry, Result, Suppression};
use serde::{Deserialize, Serialize};

pub const METADATA_DIR_NAME: &str = ".metadata_astrograph";
const ENTRIES_LOG: &str = "entries.log";
const SUPPRESSIONS_LOG: &str = "suppressions.log";
const LOCK_FILE: &str = "entries.log.lock";
pub const REPORTS_DIR: &str = "reports";

/// Format version stamped on every `entries.log` record. A reader that
/// sees a version it doesn't recognize treats the store as corrupt
/// rather than guessing at the layout.
const RECORD_FORMAT_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Record {
    Upsert { file_path: PathBuf, entries: Vec<IndexEntry> },
    Remove { file_path: PathBuf },
}

/// An open handle on a project's on-disk index. Holds the writer lock
/// for its lifetime; dropping it releases the lock file.
pub struct IndexStore {
    root: PathBuf,
    entries: HashMap<PathBuf, Vec<IndexEntry>>,
    suppressions: Vec<Suppression>,
    _lock: LockGuard,
}

struct LockGuard(PathBuf);

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

impl IndexStore {
    /// Open (creating if absent) the metadata directory under `root`,
    /// acquiring the writer lock. Fails with `concurrent_run_refused` if
    /// another process already holds it.
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(METADATA_DIR_NAME);
        std::fs::create_dir_all(&dir).map_err(|e| EngineError::io(dir.clone(), e))?;
        std::fs::create_dir_all(dir.join(REPORTS_DIR)).map_err(|e| EngineError::io(dir.clone(), e))?;

        let lock_path = dir.join(LOCK_FILE);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|_| EngineError::concurrent_run_refused(lock_path.clone()))?;

        let entries = replay_entries(&dir.join(ENTRIES_LOG))?;
        let suppressions = load_suppressions(&dir.join(SUPPRESSIONS_LOG))?;

        Ok(IndexStore { root: dir, entries, suppressions, _lock: LockGuard(lock_path) })
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.root
    }

    /// Atomically replace `file_path`'s entries, appending an `Upsert`
    /// record to the durable log.
    pub fn upsert(&mut self, file_path: PathBuf, entries: Vec<IndexEntry>) -> Result<()> {
        append_record(&self.root.join(ENTRIES_LOG), &Record::Upsert { file_path: file_path.clone(), entries: entries.clone() })?;
        self.entries.insert(file_path, entries);
        Ok(())
    }

    pub fn remove(&mut self, file_path: &Path) -> Result<()> {
        append_record(&self.root.join(ENTRIES_LOG), &Record::Remove { file_path: file_path.to_path_buf() })?;
        self.entries.remove(file_path);
        Ok(())
    }

    pub fn entries_for(&self, file_path: &Path) -> &[IndexEntry] {
        self.entries.get(file_path).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn all_entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values().flatten()
    }

    /// Reconstruct clusters from persisted fingerprints: groups all
    /// currently-indexed entries by `(kind, fingerprint.exact)` for
    /// cross-run reporting without re-parsing the tree.
    pub fn lookup_clusters(&self) -> Vec<PersistedCluster> {
        let mut groups: HashMap<(astrograph_core::UnitKind, [u8; 16]), Vec<IndexEntry>> = HashMap::new();
        for entry in self.all_entries() {
            groups
                .entry((entry.kind, entry.fingerprint.exact.0))
                .or_default()
                .push(entry.clone());
        }
        groups
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .map(|((kind, digest), members)| PersistedCluster { kind, fingerprint: Digest(digest), members })
            .collect()
    }

    pub fn add_suppression(&mut self, cluster_key: String, evidence_digests: Vec<Digest>, reason: String) -> Result<()> {
        let suppression = Suppression::new(cluster_key, evidence_digests, reason);
        append_jsonl(&self.root.join(SUPPRESSIONS_LOG), &suppression)?;
        self.suppressions.push(suppression);
        Ok(())
    }

    /// Suppressions whose every referenced evidence digest is still
    /// present among the current entries.
    pub fn list_active_suppressions(&self) -> Vec<&Suppression> {
        let current: HashSet<Digest> = self.all_entries().map(|e| e.evidence_digest).collect();
        self.suppressions.iter().filter(|s| s.is_active(&current)).collect()
    }

    /// Drop suppressions that are no longer active and rewrite the log
    /// to reflect only the survivors (the log is append-only during
    /// normal operation; this is the one maintenance rewrite).
    pub fn prune_stale_suppressions(&mut self) -> Result<usize> {
        let current: HashSet<Digest> = self.all_entries().map(|e| e.evidence_digest).collect();
        let before = self.suppressions.len();
        self.suppressions.retain(|s| s.is_active(&current));
        let removed = before - self.suppressions.len();

        if removed > 0 {
            let path = self.root.join(SUPPRESSIONS_LOG);
            let mut file = File::create(&path).map_err(|e| EngineError::io(path.clone(), e))?;
            for suppression in &self.suppressions {
                let line = serde_json::to_string(suppression)
                    .map_err(|e| EngineError::io(path.clone(), std::io::Error::new(std::io::ErrorKind::Other, e)))?;
                writeln!(file, "{line}").map_err(|e| EngineError::io(path.clone(), e))?;
            }
        }
        Ok(removed)
    }
}

/// A cluster rebuilt from persisted `IndexEntry` records — locations
/// only, no source text (the store never retains source bytes).
#[derive(Debug, Clone)]
pub struct PersistedCluster {
    pub kind: astrograph_core::UnitKind,
    pub fingerprint: Digest,
    pub members: Vec<IndexEntry>,
}

fn replay_entries(path: &Path) -> Result<HashMap<PathBuf, Vec<IndexEntry>>> {
    let mut map = HashMap::new();
    if !path.exists() {
        return Ok(map);
    }
    let mut file = File::open(path).map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    loop {
        let mut version_buf = [0u8; 1];
        match file.read_exact(&mut version_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(EngineError::io(path.to_path_buf(), e)),
        }
        if version_buf[0] != RECORD_FORMAT_VERSION {
            return Err(EngineError::index_corruption(
                path.to_path_buf(),
                format!("unknown entries.log record version {}", version_buf[0]),
            ));
        }

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf).map_err(|e| EngineError::io(path.to_path_buf(), e))?;
        let len = u32::from_le_bytes(len_buf) as usize;

        let mut payload = vec![0u8; len];
        file.read_exact(&mut payload).map_err(|e| EngineError::io(path.to_path_buf(), e))?;

        let record: Record = bincode::deserialize(&payload)
            .map_err(|_| EngineError::index_corruption(path.to_path_buf(), "malformed entries.log record"))?;

        match record {
            Record::Upsert { file_path, entries } => {
                map.insert(file_path, entries);
            }
            Record::Remove { file_path } => {
                map.remove(&file_path);
            }
        }
    }
    Ok(map)
}

fn append_record(path: &Path, record: &Record) -> Result<()> {
    let payload = bincode::serialize(record)
        .map_err(|e| EngineError::io(path.to_path_buf(), std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    file.write_all(&[RECORD_FORMAT_VERSION]).map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    file.write_all(&(payload.len() as u32).to_le_bytes()).map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    file.write_all(&payload).map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    Ok(())
}

fn load_suppressions(path: &Path) -> Result<Vec<Suppression>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| EngineError::io(path.to_path_buf(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let suppression: Suppression = serde_json::from_str(&line)
            .map_err(|_| EngineError::index_corruption(path.to_path_buf(), "malformed suppressions.log line"))?;
        out.push(suppression);
    }
    Ok(out)
}

fn append_jsonl<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let line = serde_json::to_string(value)
        .map_err(|e| EngineError::io(path.to_path_buf(), std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    writeln!(file, "{line}").map_err(|e| EngineError::io(path.to_path_buf(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrograph_core::{Fingerprint, UnitKind};

    fn entry(file: &str, node_count: usize, exact: [u8; 16]) -> IndexEntry {
        IndexEntry {
            file_path: PathBuf::from(file),
            start_line: 1,
            end_line: 5,
            kind: UnitKind::Function,
            fingerprint: Fingerprint { exact: Digest(exact), pattern: Digest(exact) },
            evidence_digest: Digest::of_bytes(format!("{file}{node_count}").as_bytes()),
        }
    }

    #[test]
    fn upsert_then_reopen_replays_entries() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = IndexStore::open(dir.path()).unwrap();
            store.upsert(PathBuf::from("a.rs"), vec![entry("a.rs", 7, [1; 16])]).unwrap();
        }
        let store = IndexStore::open(dir.path()).unwrap();
        assert_eq!(store.entries_for(Path::new("a.rs")).len(), 1);
    }

    #[test]
    fn remove_clears_entries_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = IndexStore::open(dir.path()).unwrap();
            store.upsert(PathBuf::from("a.rs"), vec![entry("a.rs", 7, [1; 16])]).unwrap();
            store.remove(Path::new("a.rs")).unwrap();
        }
        let store = IndexStore::open(dir.path()).unwrap();
        assert!(store.entries_for(Path::new("a.rs")).is_empty());
    }

    #[test]
    fn concurrent_open_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let _first = IndexStore::open(dir.path()).unwrap();
        let second = IndexStore::open(dir.path());
        assert!(second.is_err());
    }

    #[test]
    fn suppression_round_trip_and_staleness() {
        let dir = tempfile::tempdir().unwrap();
        let digest = Digest::of_bytes(b"a.rs7");
        {
            let mut store = IndexStore::open(dir.path()).unwrap();
            store.upsert(PathBuf::from("a.rs"), vec![entry("a.rs", 7, [1; 16])]).unwrap();
            store.add_suppression("exact:function:deadbeef".to_string(), vec![digest], "ok".to_string()).unwrap();
            assert_eq!(store.list_active_suppressions().len(), 1);
        }

        let mut store = IndexStore::open(dir.path()).unwrap();
        assert_eq!(store.list_active_suppressions().len(), 1);

        // Changing the unit's evidence digest (simulated by upserting a
        // differently-keyed entry) makes the suppression stale.
        store.upsert(PathBuf::from("a.rs"), vec![entry("a.rs", 99, [1; 16])]).unwrap();
        assert_eq!(store.list_active_suppressions().len(), 0);
        assert_eq!(store.prune_stale_suppressions().unwrap(), 1);
    }
}
