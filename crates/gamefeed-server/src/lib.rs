//! HTTP surface for the gamefeed push-notification service.
//!
//! Each `GET /api/games/{id}/events` request gets its own stream driver and
//! facet state; subscriptions share nothing but the snapshot provider.
//!
//! # Modules
//!
//! - [`sse`]: the push-event stream endpoint
//! - [`handlers`]: health and status endpoints
//! - [`router`]: route table and middleware
//! - [`server`]: listener lifecycle
//! - [`state`]: shared handler state
//! - [`error`]: JSON error responses

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sse;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
