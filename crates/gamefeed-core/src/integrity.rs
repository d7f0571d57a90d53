//! Consistency checks applied to every observation before it is diffed.
//!
//! A faulty observation fails the cycle and is never merged into facet
//! state. Masking it (for example by dropping the duplicate row) would
//! silently corrupt the baseline every later diff is measured against.

use std::collections::{BTreeMap, BTreeSet};

use gamefeed_types::{BoardPosition, PlayerId, TurnIndex};

use crate::engine::Observation;

/// A data-integrity fault in one observation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// The same player id appeared twice in the player list.
    #[error("player {0} listed more than once")]
    DuplicatePlayer(PlayerId),

    /// Two players share one seat in the turn rotation.
    #[error("players {first} and {second} both hold turn index {turn_order}")]
    DuplicateTurnIndex {
        /// The contested seat.
        turn_order: TurnIndex,
        /// Player seen first with this seat.
        first: PlayerId,
        /// Player seen second with this seat.
        second: PlayerId,
    },

    /// Seats do not form the rotation `0..player_count`.
    #[error("player {player_id} holds turn index {turn_order} in a game of {player_count}")]
    SparseTurnOrder {
        /// The highest seat, which lies outside the rotation.
        turn_order: TurnIndex,
        /// Player holding that seat.
        player_id: PlayerId,
        /// Number of players in the observation.
        player_count: usize,
    },

    /// A token stands off the board.
    #[error("player {player_id} at position {position} outside board of {board_size}")]
    PositionOutOfRange {
        /// The offending player.
        player_id: PlayerId,
        /// Reported square.
        position: BoardPosition,
        /// Number of squares on the board.
        board_size: u32,
    },

    /// An ownership entry names a square off the board.
    #[error("property position {position} outside board of {board_size}")]
    PropertyOutOfRange {
        /// Reported square.
        position: BoardPosition,
        /// Number of squares on the board.
        board_size: u32,
    },

    /// A property is owned by someone who is not in the game.
    #[error("property {position} owned by player {owner} who is not in the game")]
    UnknownOwner {
        /// The property.
        position: BoardPosition,
        /// The unknown owner.
        owner: PlayerId,
    },
}

/// Check one observation for internal consistency.
///
/// # Errors
///
/// Returns the first [`IntegrityError`] found.
pub fn validate(observation: &Observation, board_size: u32) -> Result<(), IntegrityError> {
    let mut seats: BTreeMap<TurnIndex, PlayerId> = BTreeMap::new();
    let mut seen: BTreeSet<PlayerId> = BTreeSet::new();

    for player in &observation.players {
        if !seen.insert(player.player_id) {
            return Err(IntegrityError::DuplicatePlayer(player.player_id));
        }
        if let Some(&first) = seats.get(&player.turn_order) {
            return Err(IntegrityError::DuplicateTurnIndex {
                turn_order: player.turn_order,
                first,
                second: player.player_id,
            });
        }
        seats.insert(player.turn_order, player.player_id);

        if player.board_position >= board_size {
            return Err(IntegrityError::PositionOutOfRange {
                player_id: player.player_id,
                position: player.board_position,
                board_size,
            });
        }
    }

    // Distinct seats are dense exactly when the highest one is below the count.
    if let Some((&turn_order, &player_id)) = seats.last_key_value() {
        let player_count = seats.len();
        if !usize::try_from(turn_order).is_ok_and(|seat| seat < player_count) {
            return Err(IntegrityError::SparseTurnOrder {
                turn_order,
                player_id,
                player_count,
            });
        }
    }

    for (&position, owner) in &observation.ownership {
        if position >= board_size {
            return Err(IntegrityError::PropertyOutOfRange {
                position,
                board_size,
            });
        }
        if let Some(owner) = *owner {
            if !seen.contains(&owner) {
                return Err(IntegrityError::UnknownOwner { position, owner });
            }
        }
    }

    Ok(())
}
