//! Liveness route.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ping", get(ping))
}

/// GET /ping
async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
