//! Axum router setup: the HTTP surface for §6's entry points.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{handlers, ServerState};

pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/analyze", post(handlers::analyze_handler))
        .route("/api/write", post(handlers::write_handler))
        .route("/api/edit", post(handlers::edit_handler))
        .route("/api/suppress", post(handlers::suppress_handler))
        .route("/api/suppressions", get(handlers::suppressions_handler))
        .route("/api/health", get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrograph_core::AnalysisConfig;
    use astrograph_indexer::PluginRegistry;
    use astrograph_store::IndexStore;

    #[test]
    fn router_construction_registers_all_routes() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::open(dir.path()).unwrap();
        let state = Arc::new(ServerState::new(
            dir.path().to_path_buf(),
            Arc::new(PluginRegistry::with_defaults()),
            AnalysisConfig::default(),
            store,
        ));
        let _router = create_router(state);
    }
}
