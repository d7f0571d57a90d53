//! Scoped record access for players and games.
//!
//! Reads go straight to the pool. Writes happen inside a scope: `begin`
//! opens a transaction and locks the row with `SELECT ... FOR UPDATE`, the
//! setters change the held copy, and `commit` writes it back. Dropping a
//! scope without committing rolls the transaction back, so a scope that
//! exits early through `?` leaves the row untouched. Setters only exist on
//! a scope, so there is no way to mutate a record outside one.

use gamefeed_types::{
    Balance, BoardPosition, GameId, GamePhase, GameSnapshot, PlayerId, PlayerSnapshot, TurnIndex,
};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::rows::{GameRow, PlayerRow, u32_to_column};

/// A player as stored, including the game it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Game the player joined.
    pub game_id: GameId,
    /// Everything the diff engine sees.
    pub snapshot: PlayerSnapshot,
}

impl PlayerRecord {
    /// Read one player without locking.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::PlayerNotFound`] if no such player exists.
    pub async fn fetch(pool: &PgPool, player_id: PlayerId) -> Result<Self, DbError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT id, game_id, username, balance, turn_position, board_position
              FROM players
              WHERE id = $1",
        )
        .bind(player_id.into_inner())
        .fetch_optional(pool)
        .await?;

        Self::from_row(row.ok_or(DbError::PlayerNotFound(player_id))?)
    }

    fn from_row(row: PlayerRow) -> Result<Self, DbError> {
        let game_id = GameId(row.game_id);
        Ok(Self {
            game_id,
            snapshot: row.into_snapshot()?,
        })
    }
}

/// Exclusive write access to one player row.
#[derive(Debug)]
pub struct PlayerScope {
    tx: Transaction<'static, Postgres>,
    record: PlayerRecord,
}

impl PlayerScope {
    /// Open a transaction and lock the player row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::PlayerNotFound`] if no such player exists.
    pub async fn begin(pool: &PgPool, player_id: PlayerId) -> Result<Self, DbError> {
        let mut tx = pool.begin().await?;
        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT id, game_id, username, balance, turn_position, board_position
              FROM players
              WHERE id = $1
              FOR UPDATE",
        )
        .bind(player_id.into_inner())
        .fetch_optional(&mut *tx)
        .await?;

        let record = PlayerRecord::from_row(row.ok_or(DbError::PlayerNotFound(player_id))?)?;
        Ok(Self { tx, record })
    }

    /// The held copy.
    pub const fn record(&self) -> &PlayerRecord {
        &self.record
    }

    /// Change the display name.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.record.snapshot.username = username.into();
    }

    /// Change the balance.
    pub const fn set_balance(&mut self, balance: Balance) {
        self.record.snapshot.balance = balance;
    }

    /// Move the token.
    pub const fn set_board_position(&mut self, position: BoardPosition) {
        self.record.snapshot.board_position = position;
    }

    /// Change the seat in the turn rotation.
    pub const fn set_turn_position(&mut self, turn: TurnIndex) {
        self.record.snapshot.turn_order = turn;
    }

    /// Write the held copy back and commit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update or commit fails; the transaction
    /// is rolled back in that case.
    pub async fn commit(mut self) -> Result<PlayerRecord, DbError> {
        let snapshot = &self.record.snapshot;
        sqlx::query(
            r"UPDATE players
              SET username = $1, balance = $2, turn_position = $3, board_position = $4
              WHERE id = $5",
        )
        .bind(&snapshot.username)
        .bind(snapshot.balance)
        .bind(u32_to_column("turn_position", snapshot.turn_order)?)
        .bind(u32_to_column("board_position", snapshot.board_position)?)
        .bind(snapshot.player_id.into_inner())
        .execute(&mut *self.tx)
        .await?;

        self.tx.commit().await?;
        tracing::debug!(player_id = %self.record.snapshot.player_id, "Committed player record");
        Ok(self.record)
    }

    /// Discard every change made in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Exclusive write access to one game row.
#[derive(Debug)]
pub struct GameScope {
    tx: Transaction<'static, Postgres>,
    snapshot: GameSnapshot,
}

impl GameScope {
    /// Open a transaction and lock the game row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::GameNotFound`] if no such game exists.
    pub async fn begin(pool: &PgPool, game_id: GameId) -> Result<Self, DbError> {
        let mut tx = pool.begin().await?;
        let row = sqlx::query_as::<_, GameRow>(
            r"SELECT id, state, current_turn
              FROM games
              WHERE id = $1
              FOR UPDATE",
        )
        .bind(game_id.into_inner())
        .fetch_optional(&mut *tx)
        .await?;

        let snapshot = row.ok_or(DbError::GameNotFound(game_id))?.into_snapshot()?;
        Ok(Self { tx, snapshot })
    }

    /// The held copy.
    pub const fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    /// Move the game between lobby and play.
    pub const fn set_phase(&mut self, phase: GamePhase) {
        self.snapshot.phase = phase;
    }

    /// Hand the turn to the player in `turn`.
    pub const fn set_current_turn(&mut self, turn: TurnIndex) {
        self.snapshot.current_turn = turn;
    }

    /// Write the held copy back and commit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update or commit fails.
    pub async fn commit(mut self) -> Result<GameSnapshot, DbError> {
        sqlx::query(
            r"UPDATE games
              SET state = $1, current_turn = $2
              WHERE id = $3",
        )
        .bind(self.snapshot.phase.as_str())
        .bind(u32_to_column("current_turn", self.snapshot.current_turn)?)
        .bind(self.snapshot.game_id.into_inner())
        .execute(&mut *self.tx)
        .await?;

        self.tx.commit().await?;
        tracing::debug!(game_id = %self.snapshot.game_id, "Committed game record");
        Ok(self.snapshot)
    }

    /// Discard every change made in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Create a game in the lobby with no players.
///
/// # Errors
///
/// Returns [`DbError::Postgres`] if the insert fails.
pub async fn create_game(pool: &PgPool) -> Result<GameId, DbError> {
    let id: i64 = sqlx::query_scalar(
        r"INSERT INTO games (state, current_turn)
          VALUES ($1, 0)
          RETURNING id",
    )
    .bind(GamePhase::Waiting.as_str())
    .fetch_one(pool)
    .await?;

    let game_id = GameId(id);
    tracing::info!(%game_id, "Created game");
    Ok(game_id)
}

/// Add a player to a game in the next free seat of the turn rotation.
///
/// The game row is locked while the seat is chosen, so concurrent joins
/// never share a seat.
///
/// # Errors
///
/// Returns [`DbError::GameNotFound`] if no such game exists.
pub async fn create_player(
    pool: &PgPool,
    game_id: GameId,
    username: &str,
) -> Result<PlayerId, DbError> {
    let mut tx = pool.begin().await?;

    let locked: Option<i64> = sqlx::query_scalar(r"SELECT id FROM games WHERE id = $1 FOR UPDATE")
        .bind(game_id.into_inner())
        .fetch_optional(&mut *tx)
        .await?;
    if locked.is_none() {
        return Err(DbError::GameNotFound(game_id));
    }

    let seat: i32 = sqlx::query_scalar(
        r"SELECT COALESCE(MAX(turn_position) + 1, 0)
          FROM players
          WHERE game_id = $1",
    )
    .bind(game_id.into_inner())
    .fetch_one(&mut *tx)
    .await?;

    let id: i64 = sqlx::query_scalar(
        r"INSERT INTO players (game_id, username, turn_position)
          VALUES ($1, $2, $3)
          RETURNING id",
    )
    .bind(game_id.into_inner())
    .bind(username)
    .bind(seat)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let player_id = PlayerId(id);
    tracing::info!(%game_id, %player_id, seat, "Player joined game");
    Ok(player_id)
}

/// Set or clear the owner of one property in a game.
///
/// # Errors
///
/// Returns [`DbError::Malformed`] if `position` does not fit the column, or
/// [`DbError::Postgres`] if the write fails (for example an unknown owner).
pub async fn set_property_owner(
    pool: &PgPool,
    game_id: GameId,
    position: BoardPosition,
    owner: Option<PlayerId>,
) -> Result<(), DbError> {
    let state = if owner.is_some() { "owned" } else { "unowned" };

    sqlx::query(
        r"INSERT INTO properties (game_id, property_position, player_id, state)
          VALUES ($1, $2, $3, $4)
          ON CONFLICT (game_id, property_position) DO UPDATE SET
            player_id = EXCLUDED.player_id,
            state = EXCLUDED.state",
    )
    .bind(game_id.into_inner())
    .bind(u32_to_column("property_position", position)?)
    .bind(owner.map(PlayerId::into_inner))
    .bind(state)
    .execute(pool)
    .await?;

    tracing::debug!(%game_id, position, ?owner, "Set property owner");
    Ok(())
}
