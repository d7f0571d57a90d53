//! Axum router construction.
//!
//! Assembles the stream and health routes into a single [`Router`] with
//! CORS enabled for browser clients on other origins.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use gamefeed_core::SnapshotProvider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, sse};

/// Build the complete router.
///
/// - `GET /api/games/{id}/events`: push-event stream for one game
/// - `GET /api/health`: liveness probe
/// - `GET /api/status`: live subscription count and poll interval
pub fn build_router<P>(state: Arc<AppState<P>>) -> Router
where
    P: SnapshotProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/games/{id}/events", get(sse::game_events::<P>))
        .route("/api/health", get(handlers::health))
        .route("/api/status", get(handlers::status::<P>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
