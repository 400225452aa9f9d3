//! Web server — Axum router + shared state.

pub mod api;

use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::seed::Seed;
use crate::store::ChatStore;

/// Shared application state.
pub struct AppState {
    pub store: RwLock<ChatStore>,
}

impl AppState {
    pub fn new(seed: Seed) -> Arc<Self> {
        Arc::new(AppState {
            store: RwLock::new(ChatStore::new(seed)),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
