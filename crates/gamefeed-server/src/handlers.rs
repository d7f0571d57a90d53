//! Health and status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

/// `GET /api/health`.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /api/status`: live subscription count and the poll interval new
/// subscriptions use.
pub async fn status<P>(State(state): State<Arc<AppState<P>>>) -> Json<serde_json::Value>
where
    P: Send + Sync + 'static,
{
    let poll_interval_ms =
        u64::try_from(state.stream_config().poll_interval.as_millis()).unwrap_or(u64::MAX);

    Json(serde_json::json!({
        "activeSubscriptions": state.active_subscriptions(),
        "pollIntervalMs": poll_interval_ms,
    }))
}
