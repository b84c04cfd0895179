//! Health check handler.

use axum::extract::State;
use axum::response::Json;
use serde_json::{Value, json};
use tracing::trace;

use crate::state::AppState;

/// Health check endpoint. Probes the store so a lost database connection
/// shows up here rather than only in the pipelines.
pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    trace!("health check requested");
    let database = state
        .store
        .get_timestamp("health.probe")
        .await
        .map(|_| "ok")
        .unwrap_or("unreachable");

    Json(json!({
        "status": if database == "ok" { "healthy" } else { "degraded" },
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
