//! Thin HTTP transport over the analysis engine (§6): the same
//! `analyze`/`write`/`edit`/`suppress`/`list_suppressions` entry points
//! the CLI calls, reachable over `axum` for a script or another process.

pub mod handlers;
pub mod router;

use std::path::PathBuf;
use std::sync::Arc;

use astrograph_core::AnalysisConfig;
use astrograph_indexer::PluginRegistry;
use astrograph_store::IndexStore;
use tokio::sync::Mutex;

/// Shared state handed to every handler. The index store is behind a
/// single `tokio::sync::Mutex` — analysis runs are CPU-bound and
/// offloaded to `spawn_blocking`, so handlers only hold the lock for the
/// short in-memory bookkeeping around that blocking call.
pub struct ServerState {
    pub root: PathBuf,
    pub registry: Arc<PluginRegistry>,
    pub config: AnalysisConfig,
    pub store: Mutex<IndexStore>,
}

impl ServerState {
    pub fn new(root: PathBuf, registry: Arc<PluginRegistry>, config: AnalysisConfig, store: IndexStore) -> Self {
        ServerState { root, registry, config, store: Mutex::new(store) }
    }
}

pub use router::create_router;
