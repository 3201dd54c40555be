//! Event-driven mode (§6, §12): a long-lived `notify` watch over the
//! project root that keeps the on-disk index warm by re-analyzing only
//! the files that actually changed, instead of the whole tree on every
//! request.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use astrograph_core::IndexEntry;
use astrograph_discovery::fingerprint_unit;
use astrograph_indexer::PluginRegistry;
use astrograph_store::IndexStore;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// Events emitted by the file watcher, debounced at the notify layer.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

/// Thin wrapper over `notify::RecommendedWatcher`: owns the watcher
/// handle and funnels filtered events onto an mpsc channel.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
    watched_paths: HashSet<PathBuf>,
    root_path: PathBuf,
}

impl FileWatcher {
    pub fn new(root_path: impl AsRef<Path>) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let event_tx_clone = event_tx.clone();
        let watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                debug!("file system event: {:?}", event);
                Self::handle_notify_event(event, &event_tx_clone);
            }
            Err(e) => error!("file system watch error: {}", e),
        })?;

        Ok(Self { watcher, event_rx, watched_paths: HashSet::new(), root_path })
    }

    fn handle_notify_event(event: notify::Event, event_tx: &mpsc::UnboundedSender<WatchEvent>) {
        let wrap: fn(PathBuf) -> WatchEvent = match event.kind {
            notify::EventKind::Create(_) => WatchEvent::Created,
            notify::EventKind::Modify(_) => WatchEvent::Modified,
            notify::EventKind::Remove(_) => WatchEvent::Removed,
            _ => return,
        };
        for path in event.paths {
            if should_ignore_path(&path) {
                continue;
            }
            if let Err(e) = event_tx.send(wrap(path)) {
                warn!("failed to send watch event: {}", e);
            }
        }
    }

    pub fn watch_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("watching directory: {:?}", path);
        self.watcher.watch(path, RecursiveMode::Recursive)?;
        self.watched_paths.insert(path.to_path_buf());
        Ok(())
    }

    pub fn event_receiver(&mut self) -> &mut mpsc::UnboundedReceiver<WatchEvent> {
        &mut self.event_rx
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched_paths.contains(path)
    }
}

/// Re-analyzes touched files and keeps `IndexStore` up to date as
/// `notify` events arrive. The corpus itself is never held fully in
/// memory; each event re-derives just the entries for its one file.
pub struct WatcherService {
    watcher: Mutex<FileWatcher>,
    registry: Arc<PluginRegistry>,
    store: Arc<Mutex<IndexStore>>,
    root: PathBuf,
}

impl WatcherService {
    pub fn new(root_path: impl AsRef<Path>, registry: Arc<PluginRegistry>, store: Arc<Mutex<IndexStore>>) -> Result<Self> {
        let watcher = FileWatcher::new(root_path.as_ref())?;
        Ok(Self { watcher: Mutex::new(watcher), registry, store, root: root_path.as_ref().to_path_buf() })
    }

    pub async fn start_watching(&self) -> Result<()> {
        let mut watcher = self.watcher.lock().await;
        let root = self.root.clone();
        watcher.watch_directory(&root)?;
        info!("started watching project directory: {:?}", root);
        Ok(())
    }

    /// Drain watch events forever, re-analyzing each touched file as it
    /// arrives. Intended to be spawned as a long-lived task.
    pub async fn process_events(&self) -> Result<()> {
        let mut watcher = self.watcher.lock().await;
        let event_rx = watcher.event_receiver();

        while let Some(event) = event_rx.recv().await {
            debug!("processing watch event: {:?}", event);
            match event {
                WatchEvent::Created(path) | WatchEvent::Modified(path) => {
                    if let Err(e) = self.reanalyze_file(&path).await {
                        warn!("failed to reanalyze {:?}: {}", path, e);
                    }
                }
                WatchEvent::Removed(path) => {
                    let mut store = self.store.lock().await;
                    if let Err(e) = store.remove(&path) {
                        warn!("failed to remove stale entries for {:?}: {}", path, e);
                    }
                }
            }
        }
        Ok(())
    }

    async fn reanalyze_file(&self, path: &Path) -> Result<()> {
        let Some(plugin) = self.registry.resolve_for_path(path) else {
            return Ok(());
        };

        let bytes = tokio::fs::read(path).await?;
        let units = plugin.extract_code_units(&bytes, path)?;

        let mut entries = Vec::with_capacity(units.len());
        for unit in &units {
            let fingerprint = fingerprint_unit(plugin.as_ref(), unit)?;
            entries.push(IndexEntry {
                file_path: unit.file_path.clone(),
                start_line: unit.start_line,
                end_line: unit.end_line,
                kind: unit.kind,
                fingerprint,
                evidence_digest: unit.evidence_digest(),
            });
        }

        let mut store = self.store.lock().await;
        store.upsert(path.to_path_buf(), entries)?;
        info!("re-indexed {:?}: {} units", path, units.len());
        Ok(())
    }
}

fn should_ignore_path(path: &Path) -> bool {
    path.components().any(|c| {
        matches!(c.as_os_str().to_str(), Some("target") | Some(".git") | Some("node_modules") | Some(".metadata_astrograph"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_watcher_creation() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let watcher = FileWatcher::new(temp_dir.path());
        assert!(watcher.is_ok());
    }

    #[tokio::test]
    async fn watch_directory_registers_the_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut watcher = FileWatcher::new(temp_dir.path()).unwrap();
        watcher.watch_directory(temp_dir.path()).unwrap();
        assert!(watcher.is_watching(temp_dir.path()));
    }

    #[test]
    fn test_should_ignore_path() {
        assert!(should_ignore_path(Path::new("target/generated.rs")));
        assert!(should_ignore_path(Path::new("a/.git/HEAD")));
        assert!(!should_ignore_path(Path::new("src/main.rs")));
    }

    #[tokio::test]
    async fn reanalyze_file_upserts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("a.rs");
        std::fs::write(&file_path, "fn f(a: i32) -> i32 { a + 1 }").unwrap();

        let registry = Arc::new(PluginRegistry::with_defaults());
        let store = Arc::new(Mutex::new(IndexStore::open(dir.path()).unwrap()));
        let service = WatcherService::new(dir.path(), registry, store.clone()).unwrap();

        service.reanalyze_file(&file_path).await.unwrap();

        let store = store.lock().await;
        assert_eq!(store.entries_for(&file_path).len(), 1);
    }
}
