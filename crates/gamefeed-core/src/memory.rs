//! In-process record store implementing [`SnapshotProvider`].
//!
//! Used by tests and by embedders that keep game state in memory. Reads
//! return clones; writes go through [`MemoryStore::transaction`], which
//! hands the caller a [`GameTxn`] over a working copy of one game. The copy
//! replaces the stored record only if the closure returns `Ok`, so every
//! exit path either commits the whole change or none of it. The write
//! handle only exists inside the scope, which makes a write outside an
//! active transaction unrepresentable.

use std::collections::BTreeMap;
use std::sync::Arc;

use gamefeed_types::{
    BoardPosition, GameId, GamePhase, GameSnapshot, OwnershipSnapshot, PlayerId, PlayerSnapshot,
    TurnIndex,
};
use tokio::sync::RwLock;

use crate::provider::{ProviderError, SnapshotProvider};

/// Misuse of the record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// No game with this id has been created.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// No player with this id is in the game.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// A player with this id is already in the game.
    #[error("player {0} already in game")]
    DuplicatePlayer(PlayerId),
}

/// Stored state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Lobby or in-progress.
    pub phase: GamePhase,
    /// Turn index of the active player.
    pub current_turn: TurnIndex,
    /// Participants keyed by id.
    pub players: BTreeMap<PlayerId, PlayerSnapshot>,
    /// Property ownership.
    pub ownership: OwnershipSnapshot,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self {
            phase: GamePhase::Waiting,
            current_turn: 0,
            players: BTreeMap::new(),
            ownership: OwnershipSnapshot::new(),
        }
    }
}

/// Shared in-memory game store. Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<RwLock<BTreeMap<GameId, GameRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game in the lobby with no players.
    ///
    /// An existing game with the same id is replaced.
    pub async fn create_game(&self, game_id: GameId) {
        self.games
            .write()
            .await
            .insert(game_id, GameRecord::default());
        tracing::debug!(%game_id, "Created in-memory game");
    }

    /// Return a copy of one game's record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::GameNotFound`] for unknown games.
    pub async fn read(&self, game_id: GameId) -> Result<GameRecord, RecordError> {
        self.games
            .read()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(RecordError::GameNotFound(game_id))
    }

    /// Run `f` against a working copy of one game and commit it on `Ok`.
    ///
    /// The store's write lock is held for the duration of `f`, so readers
    /// never observe a half-applied change.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::GameNotFound`] for unknown games, or whatever
    /// `f` returns. Nothing is written in either case.
    pub async fn transaction<T, F>(&self, game_id: GameId, f: F) -> Result<T, RecordError>
    where
        F: FnOnce(&mut GameTxn<'_>) -> Result<T, RecordError>,
    {
        let mut games = self.games.write().await;
        let mut working = games
            .get(&game_id)
            .cloned()
            .ok_or(RecordError::GameNotFound(game_id))?;

        let output = f(&mut GameTxn {
            game_id,
            record: &mut working,
        })?;

        games.insert(game_id, working);
        Ok(output)
    }
}

/// Write handle over one game, valid only inside
/// [`MemoryStore::transaction`].
#[derive(Debug)]
pub struct GameTxn<'a> {
    game_id: GameId,
    record: &'a mut GameRecord,
}

impl GameTxn<'_> {
    /// The game being modified.
    pub const fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Current contents of the working copy.
    pub const fn record(&self) -> &GameRecord {
        self.record
    }

    /// Move the game between lobby and play.
    pub const fn set_phase(&mut self, phase: GamePhase) {
        self.record.phase = phase;
    }

    /// Hand the turn to the given seat.
    pub const fn set_current_turn(&mut self, turn: TurnIndex) {
        self.record.current_turn = turn;
    }

    /// Add a participant.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DuplicatePlayer`] if the id is already present.
    pub fn add_player(&mut self, player: PlayerSnapshot) -> Result<(), RecordError> {
        if self.record.players.contains_key(&player.player_id) {
            return Err(RecordError::DuplicatePlayer(player.player_id));
        }
        self.record.players.insert(player.player_id, player);
        Ok(())
    }

    /// Mutate one participant in place.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::PlayerNotFound`] if the id is not in the game.
    pub fn update_player<F>(&mut self, player_id: PlayerId, f: F) -> Result<(), RecordError>
    where
        F: FnOnce(&mut PlayerSnapshot),
    {
        let player = self
            .record
            .players
            .get_mut(&player_id)
            .ok_or(RecordError::PlayerNotFound(player_id))?;
        f(player);
        Ok(())
    }

    /// Set or clear the owner of a property.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::PlayerNotFound`] if `owner` is not in the game.
    pub fn set_owner(
        &mut self,
        position: BoardPosition,
        owner: Option<PlayerId>,
    ) -> Result<(), RecordError> {
        if let Some(owner) = owner {
            if !self.record.players.contains_key(&owner) {
                return Err(RecordError::PlayerNotFound(owner));
            }
        }
        self.record.ownership.insert(position, owner);
        Ok(())
    }
}

impl SnapshotProvider for MemoryStore {
    async fn fetch_game(&self, game_id: GameId) -> Result<GameSnapshot, ProviderError> {
        let games = self.games.read().await;
        let record = games
            .get(&game_id)
            .ok_or(ProviderError::GameNotFound(game_id))?;
        Ok(GameSnapshot {
            game_id,
            phase: record.phase,
            current_turn: record.current_turn,
        })
    }

    async fn fetch_players(&self, game_id: GameId) -> Result<Vec<PlayerSnapshot>, ProviderError> {
        let games = self.games.read().await;
        let record = games
            .get(&game_id)
            .ok_or(ProviderError::GameNotFound(game_id))?;
        Ok(record.players.values().cloned().collect())
    }

    async fn fetch_ownership(&self, game_id: GameId) -> Result<OwnershipSnapshot, ProviderError> {
        let games = self.games.read().await;
        let record = games
            .get(&game_id)
            .ok_or(ProviderError::GameNotFound(game_id))?;
        Ok(record.ownership.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: GameId = GameId(7);

    fn player(id: i64, seat: u32) -> PlayerSnapshot {
        PlayerSnapshot {
            player_id: PlayerId(id),
            username: format!("p{id}"),
            balance: 1500,
            board_position: 0,
            turn_order: seat,
        }
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let store = MemoryStore::new();
        store.create_game(GAME).await;

        let result = store
            .transaction(GAME, |txn| {
                txn.add_player(player(5, 0))?;
                txn.set_phase(GamePhase::Playing);
                txn.set_owner(3, Some(PlayerId(5)))
            })
            .await;
        assert_eq!(result, Ok(()));

        let record = store.read(GAME).await;
        assert!(record.is_ok());
        let record = record.unwrap_or_default();
        assert_eq!(record.phase, GamePhase::Playing);
        assert_eq!(record.players.len(), 1);
        assert_eq!(record.ownership.get(&3), Some(&Some(PlayerId(5))));
    }

    #[tokio::test]
    async fn failed_transaction_rolls_back() {
        let store = MemoryStore::new();
        store.create_game(GAME).await;

        let result = store
            .transaction(GAME, |txn| {
                txn.add_player(player(5, 0))?;
                txn.set_phase(GamePhase::Playing);
                txn.update_player(PlayerId(99), |p| p.balance = 0)
            })
            .await;
        assert_eq!(result, Err(RecordError::PlayerNotFound(PlayerId(99))));

        let record = store.read(GAME).await.unwrap_or_default();
        assert_eq!(record.phase, GamePhase::Waiting);
        assert!(record.players.is_empty());
    }

    #[tokio::test]
    async fn duplicate_player_is_rejected() {
        let store = MemoryStore::new();
        store.create_game(GAME).await;
        let result = store
            .transaction(GAME, |txn| {
                txn.add_player(player(5, 0))?;
                txn.add_player(player(5, 1))
            })
            .await;
        assert_eq!(result, Err(RecordError::DuplicatePlayer(PlayerId(5))));
    }

    #[tokio::test]
    async fn unknown_game_is_reported() {
        let store = MemoryStore::new();
        assert_eq!(
            store.transaction(GAME, |_| Ok(())).await,
            Err(RecordError::GameNotFound(GAME))
        );
        assert_eq!(
            store.fetch_game(GAME).await,
            Err(ProviderError::GameNotFound(GAME))
        );
    }

    #[tokio::test]
    async fn provider_reads_reflect_record() {
        let store = MemoryStore::new();
        store.create_game(GAME).await;
        let _ = store
            .transaction(GAME, |txn| {
                txn.add_player(player(6, 1))?;
                txn.add_player(player(5, 0))?;
                txn.set_current_turn(1);
                Ok(())
            })
            .await;

        let game = store.fetch_game(GAME).await;
        assert_eq!(
            game,
            Ok(GameSnapshot {
                game_id: GAME,
                phase: GamePhase::Waiting,
                current_turn: 1,
            })
        );
        let players = store.fetch_players(GAME).await.unwrap_or_default();
        let ids: Vec<PlayerId> = players.iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![PlayerId(5), PlayerId(6)]);
        assert_eq!(store.fetch_ownership(GAME).await, Ok(OwnershipSnapshot::new()));
    }
}
