//! Raw table rows and their conversion into domain snapshots.
//!
//! Column types follow the schema (`BIGINT` ids and balances, `INTEGER`
//! positions and turn indices, `TEXT` state). Values that do not fit the
//! domain types are reported as [`DbError::Malformed`] rather than clamped.

use gamefeed_types::{
    BoardPosition, GameId, GamePhase, GameSnapshot, PlayerId, PlayerSnapshot,
};

use crate::error::DbError;

/// A row from the `games` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRow {
    /// Game id.
    pub id: i64,
    /// `waiting` or `playing`.
    pub state: String,
    /// Turn index of the active player.
    pub current_turn: i32,
}

impl GameRow {
    /// Convert into a [`GameSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Malformed`] for an unknown state or a negative
    /// turn index.
    pub fn into_snapshot(self) -> Result<GameSnapshot, DbError> {
        let phase: GamePhase = self
            .state
            .parse()
            .map_err(|err| DbError::Malformed(format!("game {}: {err}", self.id)))?;
        Ok(GameSnapshot {
            game_id: GameId(self.id),
            phase,
            current_turn: column_to_u32("current_turn", self.current_turn)?,
        })
    }
}

/// A row from the `players` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlayerRow {
    /// Player id.
    pub id: i64,
    /// Game the player belongs to.
    pub game_id: i64,
    /// Display name, not necessarily unique.
    pub username: String,
    /// Current balance.
    pub balance: i64,
    /// Seat in the turn rotation.
    pub turn_position: i32,
    /// Square the token stands on.
    pub board_position: i32,
}

impl PlayerRow {
    /// Convert into a [`PlayerSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Malformed`] for negative positions.
    pub fn into_snapshot(self) -> Result<PlayerSnapshot, DbError> {
        Ok(PlayerSnapshot {
            player_id: PlayerId(self.id),
            username: self.username,
            balance: self.balance,
            board_position: column_to_u32("board_position", self.board_position)?,
            turn_order: column_to_u32("turn_position", self.turn_position)?,
        })
    }
}

/// The ownership columns of a `properties` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnershipRow {
    /// Board square of the property.
    pub property_position: i32,
    /// Owner, `NULL` when unowned.
    pub player_id: Option<i64>,
}

impl OwnershipRow {
    /// Convert into an ownership map entry.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Malformed`] for a negative position.
    pub fn into_entry(self) -> Result<(BoardPosition, Option<PlayerId>), DbError> {
        Ok((
            column_to_u32("property_position", self.property_position)?,
            self.player_id.map(PlayerId),
        ))
    }
}

/// Read an `INTEGER` column into an unsigned domain value.
pub(crate) fn column_to_u32(column: &str, value: i32) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|err| DbError::Malformed(format!("{column} = {value}: {err}")))
}

/// Bind an unsigned domain value to an `INTEGER` column.
pub(crate) fn u32_to_column(column: &str, value: u32) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|err| DbError::Malformed(format!("{column} = {value}: {err}")))
}
