//! Snapshot provider trait.
//!
//! The diff engine never talks to storage directly. Each poll it asks a
//! [`SnapshotProvider`] for three independent reads of a game: the header,
//! the player list and the property ownership. Implementations may be an
//! SQL store, an in-process store (see [`crate::memory::MemoryStore`]), or
//! a scripted stub in tests.
//!
//! Reads need not be atomic with respect to each other; eventual
//! consistency across polls is expected.

use std::future::Future;

use gamefeed_types::{GameId, GameSnapshot, OwnershipSnapshot, PlayerSnapshot};

/// Errors a provider may report for one read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The requested game does not exist.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// The backing store could not be reached or the read failed.
    #[error("snapshot source unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// A stored value could not be represented as a snapshot.
    #[error("malformed record: {message}")]
    Malformed {
        /// Description of the offending value.
        message: String,
    },
}

/// A source of authoritative game snapshots.
///
/// Methods return `Send` futures so a stream driver holding a provider can
/// run on a spawned task.
pub trait SnapshotProvider: Send + Sync {
    /// Read the game header.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::GameNotFound`] for unknown games, or another
    /// [`ProviderError`] if the read fails.
    fn fetch_game(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<GameSnapshot, ProviderError>> + Send;

    /// Read every player currently in the game.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the read fails.
    fn fetch_players(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<Vec<PlayerSnapshot>, ProviderError>> + Send;

    /// Read the property ownership map.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the read fails.
    fn fetch_ownership(
        &self,
        game_id: GameId,
    ) -> impl Future<Output = Result<OwnershipSnapshot, ProviderError>> + Send;
}
