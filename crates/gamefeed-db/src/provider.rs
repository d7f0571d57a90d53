//! [`SnapshotProvider`] backed by `PostgreSQL`.
//!
//! Each read is a single parameterized query on the pool. The three reads of
//! one cycle do not share a transaction.

use gamefeed_core::{ProviderError, SnapshotProvider};
use gamefeed_types::{GameId, GameSnapshot, OwnershipSnapshot, PlayerSnapshot};
use sqlx::PgPool;

use crate::error::DbError;
use crate::rows::{GameRow, OwnershipRow, PlayerRow};

/// Reads game snapshots from the `games`, `players` and `properties` tables.
#[derive(Debug, Clone)]
pub struct PgSnapshotProvider {
    pool: PgPool,
}

impl PgSnapshotProvider {
    /// Create a provider over a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the game header.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::GameNotFound`] if no such game exists.
    pub async fn load_game(&self, game_id: GameId) -> Result<GameSnapshot, DbError> {
        let row = sqlx::query_as::<_, GameRow>(
            r"SELECT id, state, current_turn
              FROM games
              WHERE id = $1",
        )
        .bind(game_id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::GameNotFound(game_id))?.into_snapshot()
    }

    /// Load every player in the game, in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row is malformed.
    pub async fn load_players(&self, game_id: GameId) -> Result<Vec<PlayerSnapshot>, DbError> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r"SELECT id, game_id, username, balance, turn_position, board_position
              FROM players
              WHERE game_id = $1
              ORDER BY id",
        )
        .bind(game_id.into_inner())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PlayerRow::into_snapshot).collect()
    }

    /// Load the property ownership map.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails or a row is malformed.
    pub async fn load_ownership(&self, game_id: GameId) -> Result<OwnershipSnapshot, DbError> {
        let rows = sqlx::query_as::<_, OwnershipRow>(
            r"SELECT property_position, player_id
              FROM properties
              WHERE game_id = $1",
        )
        .bind(game_id.into_inner())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OwnershipRow::into_entry).collect()
    }
}

impl SnapshotProvider for PgSnapshotProvider {
    async fn fetch_game(&self, game_id: GameId) -> Result<GameSnapshot, ProviderError> {
        Ok(self.load_game(game_id).await?)
    }

    async fn fetch_players(&self, game_id: GameId) -> Result<Vec<PlayerSnapshot>, ProviderError> {
        Ok(self.load_players(game_id).await?)
    }

    async fn fetch_ownership(&self, game_id: GameId) -> Result<OwnershipSnapshot, ProviderError> {
        Ok(self.load_ownership(game_id).await?)
    }
}
