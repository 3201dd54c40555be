//! CLI command implementations — thin callers into the library crates,
//! mirroring the HTTP handlers in `astrograph-server` (§6: "equally
//! reachable as CLI subcommands that call the same library functions").

use std::path::PathBuf;
use std::sync::Arc;

use astrograph_core::AnalysisConfig;
use astrograph_discovery::analyze as run_analysis;
use astrograph_indexer::PluginRegistry;
use astrograph_server::ServerState;
use astrograph_store::IndexStore;
use astrograph_watcher::WatcherService;

pub async fn analyze(root: PathBuf) -> anyhow::Result<()> {
    let registry = PluginRegistry::with_defaults();
    let config = AnalysisConfig::load(&root)?;

    let result = run_analysis(&root, &registry, &config);
    tracing::info!(
        "scanned {} files, {} units, {} duplicate clusters, {} accumulated failures",
        result.files_scanned,
        result.units_extracted,
        result.clusters.len(),
        result.failures.len()
    );
    for failure in &result.failures {
        tracing::warn!("{failure}");
    }

    let mut store = IndexStore::open(&root)?;
    for cluster in &result.clusters {
        for member in &cluster.members {
            let entries = vec![astrograph_core::IndexEntry {
                file_path: member.file_path.clone(),
                start_line: member.start_line,
                end_line: member.end_line,
                kind: member.kind,
                fingerprint: astrograph_core::Fingerprint { exact: cluster.fingerprint, pattern: cluster.fingerprint },
                evidence_digest: member.evidence_digest(),
            }];
            store.upsert(member.file_path.clone(), entries)?;
        }
    }

    let report_path = astrograph_store::write_report(store.metadata_dir(), &result.clusters, chrono::Utc::now())?;
    println!("report written to {}", report_path.display());

    Ok(())
}

pub async fn serve(root: PathBuf, host: String, port: u16) -> anyhow::Result<()> {
    tracing::info!("starting astrograph server on {}:{}", host, port);

    let registry = Arc::new(PluginRegistry::with_defaults());
    let config = AnalysisConfig::load(&root)?;
    let store = IndexStore::open(&root)?;
    let event_driven = config.event_driven;

    let state = Arc::new(ServerState::new(root.clone(), registry.clone(), config, store));
    let router = astrograph_server::create_router(state.clone());

    if event_driven {
        let watcher_registry = registry.clone();
        let watcher_root = root.clone();
        tokio::spawn(async move {
            if let Err(e) = run_watcher(watcher_root, watcher_registry).await {
                tracing::error!("file watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

async fn run_watcher(root: PathBuf, registry: Arc<PluginRegistry>) -> anyhow::Result<()> {
    tracing::info!("starting file watcher for: {}", root.display());
    let store = Arc::new(tokio::sync::Mutex::new(IndexStore::open(&root)?));
    let watcher = WatcherService::new(&root, registry, store)?;
    watcher.start_watching().await?;
    watcher.process_events().await?;
    Ok(())
}

pub fn suppress(root: PathBuf, cluster_key: String, reason: String) -> anyhow::Result<()> {
    let registry = PluginRegistry::with_defaults();
    let config = AnalysisConfig::load(&root)?;
    let result = run_analysis(&root, &registry, &config);

    let cluster = result
        .clusters
        .iter()
        .find(|c| c.cluster_key() == cluster_key)
        .ok_or_else(|| anyhow::anyhow!("no active cluster with key {cluster_key}"))?;

    let mut store = IndexStore::open(&root)?;
    store.add_suppression(cluster_key, cluster.evidence_digests(), reason)?;
    println!("suppressed");
    Ok(())
}

pub fn suppressions(root: PathBuf) -> anyhow::Result<()> {
    let store = IndexStore::open(&root)?;
    for suppression in store.list_active_suppressions() {
        println!("{} — {} ({})", suppression.cluster_key, suppression.reason, suppression.created_at.to_rfc3339());
    }
    Ok(())
}

pub fn clear(root: PathBuf) -> anyhow::Result<()> {
    let metadata_dir = root.join(astrograph_store::METADATA_DIR_NAME);
    if metadata_dir.exists() {
        std::fs::remove_dir_all(&metadata_dir)?;
        tracing::info!("cleared index at {}", metadata_dir.display());
    } else {
        tracing::info!("no index to clear at {}", metadata_dir.display());
    }
    Ok(())
}
