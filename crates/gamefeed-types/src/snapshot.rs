//! Instantaneous reads of a game instance as supplied by a snapshot
//! provider.
//!
//! A full observation of a game is three independent reads: the
//! [`GameSnapshot`] header, one [`PlayerSnapshot`] per participant, and the
//! [`OwnershipSnapshot`]. No atomicity is assumed across the three.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::GamePhase;
use crate::ids::{GameId, PlayerId};

/// A square on the board, `0..board_size`.
pub type BoardPosition = u32;

/// A player's fixed seat in the turn rotation, `0..player_count`.
pub type TurnIndex = u32;

/// An amount of money.
pub type Balance = i64;

/// Game-level header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GameSnapshot {
    /// The game this header belongs to.
    pub game_id: GameId,
    /// Lobby or in-progress.
    pub phase: GamePhase,
    /// Turn-order index of the player whose turn it is.
    pub current_turn: TurnIndex,
}

/// One participant as currently stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlayerSnapshot {
    /// Stable player identity.
    pub player_id: PlayerId,
    /// Display name; not necessarily unique.
    pub username: String,
    /// Current money.
    pub balance: Balance,
    /// Square the player's token stands on.
    pub board_position: BoardPosition,
    /// Seat in the turn rotation.
    pub turn_order: TurnIndex,
}

/// Property position to owning player, `None` meaning unowned.
///
/// Positions absent from the map are also unowned.
pub type OwnershipSnapshot = BTreeMap<BoardPosition, Option<PlayerId>>;
