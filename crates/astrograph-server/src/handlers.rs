//! REST handlers: each one is a thin wrapper that blocks on the same
//! library calls the CLI uses, via `spawn_blocking` since the analysis
//! engine is synchronous and CPU-bound (§5).

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use astrograph_core::{Digest, DuplicateCluster};
use astrograph_discovery::{analyze, precheck_candidate, PreCreateWarning};

use crate::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok", version: env!("CARGO_PKG_VERSION") })
}

#[derive(Debug, Serialize)]
pub struct AnalyzeSummary {
    pub files_scanned: usize,
    pub units_extracted: usize,
    pub clusters_found: usize,
    pub failures: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub report_path: String,
    pub summary: AnalyzeSummary,
}

/// `POST /api/analyze` — walk the project root, cluster duplicates,
/// write a timestamped report, and persist the run's entries.
pub async fn analyze_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let root = state.root.clone();
    let registry = state.registry.clone();
    let config = state.config.clone();

    let result = tokio::task::spawn_blocking(move || analyze(&root, &registry, &config))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let summary = AnalyzeSummary {
        files_scanned: result.files_scanned,
        units_extracted: result.units_extracted,
        clusters_found: result.clusters.len(),
        failures: result.failures.len(),
    };

    let mut store = state.store.lock().await;
    let metadata_dir = store.metadata_dir().to_path_buf();
    persist_clusters(&mut store, &result.clusters)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let report_path = astrograph_store::write_report(&metadata_dir, &result.clusters, chrono::Utc::now())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(AnalyzeResponse { report_path: report_path.display().to_string(), summary }))
}

/// Persist each cluster's members as `IndexEntry` records keyed by file.
/// A `DuplicateCluster` only carries the single digest it was grouped
/// on (exact xor pattern), so both fingerprint fields are stamped with
/// that one digest — good enough for `lookup_clusters`' regrouping,
/// which only ever reads one side of the pair back.
fn persist_clusters(
    store: &mut astrograph_store::IndexStore,
    clusters: &[DuplicateCluster],
) -> astrograph_core::Result<()> {
    use std::collections::HashMap;
    let mut by_file: HashMap<std::path::PathBuf, Vec<astrograph_core::IndexEntry>> = HashMap::new();
    for cluster in clusters {
        for member in &cluster.members {
            by_file.entry(member.file_path.clone()).or_default().push(astrograph_core::IndexEntry {
                file_path: member.file_path.clone(),
                start_line: member.start_line,
                end_line: member.end_line,
                kind: member.kind,
                fingerprint: astrograph_core::Fingerprint { exact: cluster.fingerprint, pattern: cluster.fingerprint },
                evidence_digest: member.evidence_digest(),
            });
        }
    }
    for (path, entries) in by_file {
        store.upsert(path, entries)?;
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub file_path: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PreCreateFindingsResponse {
    pub pre_create_findings: Vec<WarningDto>,
}

#[derive(Debug, Serialize)]
pub struct WarningDto {
    pub candidate_name: String,
    pub matches: Vec<MatchDto>,
}

#[derive(Debug, Serialize)]
pub struct MatchDto {
    pub location: String,
    pub exact: bool,
}

impl From<PreCreateWarning> for WarningDto {
    fn from(w: PreCreateWarning) -> Self {
        WarningDto {
            candidate_name: w.candidate_name,
            matches: w.matches.into_iter().map(|m| MatchDto { location: m.location, exact: m.exact }).collect(),
        }
    }
}

/// `POST /api/write` — pre-create duplicate check (§6) against the rest
/// of the project, before `content` lands on disk.
pub async fn write_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<WriteRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    pre_create_check(&state, &request.file_path, &request.content).await
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub file_path: String,
    /// Resulting text after the caller's edits are applied — the same
    /// contract as `write` on the edited content (§6).
    pub content: String,
}

/// `POST /api/edit` — identical contract to `write`, applied to the text
/// that would result from the caller's edits.
pub async fn edit_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<EditRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    pre_create_check(&state, &request.file_path, &request.content).await
}

async fn pre_create_check(
    state: &Arc<ServerState>,
    file_path: &str,
    content: &str,
) -> Result<Json<PreCreateFindingsResponse>, (StatusCode, String)> {
    let path = std::path::PathBuf::from(file_path);
    let registry = state.registry.clone();

    let Some(plugin) = registry.resolve_for_path(&path) else {
        return Ok(Json(PreCreateFindingsResponse { pre_create_findings: Vec::new() }));
    };

    let candidates = plugin
        .extract_code_units(content.as_bytes(), &path)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let root = state.root.clone();
    let registry_for_corpus = state.registry.clone();
    let languages_filter = state.config.languages.clone();
    let corpus = tokio::task::spawn_blocking(move || {
        astrograph_discovery::build_corpus(&root, &registry_for_corpus, languages_filter.as_deref())
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut findings = Vec::new();
    for candidate in &candidates {
        let fingerprint = astrograph_discovery::fingerprint_unit(plugin.as_ref(), candidate)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        if let Some(warning) = precheck_both(candidate, &fingerprint, &corpus.units) {
            findings.push(warning.into());
        }
    }

    Ok(Json(PreCreateFindingsResponse { pre_create_findings: findings }))
}

/// Run the pre-create check against both the candidate's exact and
/// pattern digests and merge the results — `precheck_candidate` only
/// ever compares one digest, so checking exclusively `fingerprint.exact`
/// would miss operator-normalized ("pattern") duplicates entirely.
/// Matches against the same location are merged, preferring `exact: true`
/// when either pass reported it.
fn precheck_both(
    candidate: &astrograph_core::CodeUnit,
    fingerprint: &astrograph_core::Fingerprint,
    corpus: &[astrograph_discovery::CorpusUnit],
) -> Option<PreCreateWarning> {
    let exact_warning = precheck_candidate(candidate, fingerprint.exact, corpus);
    let pattern_warning = precheck_candidate(candidate, fingerprint.pattern, corpus);

    let mut by_location: std::collections::HashMap<String, bool> = std::collections::HashMap::new();
    for warning in exact_warning.iter().chain(pattern_warning.iter()) {
        for m in &warning.matches {
            let entry = by_location.entry(m.location.clone()).or_insert(false);
            *entry = *entry || m.exact;
        }
    }

    if by_location.is_empty() {
        return None;
    }

    let mut matches: Vec<astrograph_discovery::PreCreateMatch> =
        by_location.into_iter().map(|(location, exact)| astrograph_discovery::PreCreateMatch { location, exact }).collect();
    matches.sort_by(|a, b| a.location.cmp(&b.location));

    Some(PreCreateWarning { candidate_name: candidate.name.clone(), matches })
}

#[derive(Debug, Deserialize)]
pub struct SuppressRequest {
    pub cluster_key: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct SuppressResponse {
    pub ok: bool,
}

/// `POST /api/suppress` — re-derive the named cluster's current evidence
/// digests from a fresh analysis pass and record a suppression anchored
/// to them.
pub async fn suppress_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SuppressRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let root = state.root.clone();
    let registry = state.registry.clone();
    let config = state.config.clone();
    let cluster_key = request.cluster_key.clone();

    let result = tokio::task::spawn_blocking(move || analyze(&root, &registry, &config))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let Some(cluster) = result.clusters.iter().find(|c| c.cluster_key() == cluster_key) else {
        return Err((StatusCode::NOT_FOUND, format!("no active cluster with key {cluster_key}")));
    };

    let mut store = state.store.lock().await;
    store
        .add_suppression(cluster_key, cluster.evidence_digests(), request.reason)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(SuppressResponse { ok: true }))
}

#[derive(Debug, Serialize)]
pub struct SuppressionDto {
    pub cluster_key: String,
    pub reason: String,
    pub created_at: String,
    pub evidence_digests: Vec<String>,
}

/// `GET /api/suppressions` — active suppressions only (§4.6's staleness
/// invariant: a suppression whose evidence has moved on is silently
/// excluded rather than reported as a lie).
pub async fn suppressions_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let store = state.store.lock().await;
    let active: Vec<SuppressionDto> = store
        .list_active_suppressions()
        .into_iter()
        .map(|s| SuppressionDto {
            cluster_key: s.cluster_key.clone(),
            reason: s.reason.clone(),
            created_at: s.created_at.to_rfc3339(),
            evidence_digests: s.evidence_digests.iter().map(Digest::to_hex).collect(),
        })
        .collect();
    Json(active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let _response = health_check().await;
    }
}
