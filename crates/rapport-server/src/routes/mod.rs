//! HTTP route handlers.

pub mod extract;
pub mod health;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    Router::new()
        .merge(health::routes())
        .merge(extract::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
