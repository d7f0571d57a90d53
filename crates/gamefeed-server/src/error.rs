//! Error types for the HTTP surface.
//!
//! [`ApiError`] converts into a JSON response of the form
//! `{"error": "...", "status": 404}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gamefeed_core::ProviderError;

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The path did not contain a valid game id.
    #[error("invalid game id: {0}")]
    InvalidId(String),

    /// The requested game does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The snapshot source could not answer.
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::GameNotFound(game_id) => Self::NotFound(format!("game {game_id}")),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
