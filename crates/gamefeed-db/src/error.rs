//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and the record-level faults found while converting rows.

use gamefeed_core::ProviderError;
use gamefeed_types::{GameId, PlayerId};

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No game row with this id.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// No player row with this id.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// A stored value cannot be represented in the domain types, or a
    /// domain value does not fit its column.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbError> for ProviderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::GameNotFound(game_id) => Self::GameNotFound(game_id),
            DbError::Malformed(message) => Self::Malformed { message },
            other => Self::Unavailable {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_game_maps_to_provider_not_found() {
        let mapped = ProviderError::from(DbError::GameNotFound(GameId(4)));
        assert_eq!(mapped, ProviderError::GameNotFound(GameId(4)));
    }

    #[test]
    fn bad_rows_are_malformed() {
        let mapped = ProviderError::from(DbError::Malformed(String::from("state 'paused'")));
        assert!(matches!(mapped, ProviderError::Malformed { .. }));
    }

    #[test]
    fn connection_faults_are_unavailable() {
        let mapped = ProviderError::from(DbError::Postgres(sqlx::Error::PoolTimedOut));
        assert!(matches!(mapped, ProviderError::Unavailable { .. }));
    }
}
