//! Change events pushed to subscribers and their wire payloads.
//!
//! Every payload type serializes to exactly the JSON shape clients listen
//! for, so the emitter only has to call `serde_json`. Lists are tuples
//! rather than objects to keep the per-cycle traffic small.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{GameId, PlayerId};
use crate::snapshot::{Balance, BoardPosition, TurnIndex};

/// The player whose turn it now is, as `[playerId, turnOrderIndex]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TurnChange(pub PlayerId, pub TurnIndex);

/// A balance update, as `[playerId, newBalance, delta]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BalanceChange(pub PlayerId, pub Balance, pub Balance);

/// A token movement, as `[playerId, newPosition, oldPosition]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PositionChange(pub PlayerId, pub BoardPosition, pub BoardPosition);

/// Ownership transition of a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct OwnerChange {
    /// Owner after the change, `null` if the property became unowned.
    pub new_owner: Option<PlayerId>,
    /// Owner before the change, `null` if it was unowned.
    pub old_owner: Option<PlayerId>,
}

/// A discrete state change detected between two polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Usernames of players who joined since the last poll.
    PlayerJoin(Vec<String>),
    /// The active turn moved to this player.
    PlayerTurn(TurnChange),
    /// Balances that changed.
    PlayerBalance(Vec<BalanceChange>),
    /// Tokens that moved.
    PlayerMove(Vec<PositionChange>),
    /// The game left the lobby. Carries the game id.
    GameStart(GameId),
    /// Properties whose owner changed, keyed by board position.
    PropertyOwnerChanges(BTreeMap<BoardPosition, OwnerChange>),
}

impl ChangeEvent {
    /// The event name clients subscribe to.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlayerJoin(_) => "playerJoin",
            Self::PlayerTurn(_) => "playerTurn",
            Self::PlayerBalance(_) => "playerBalance",
            Self::PlayerMove(_) => "playerMove",
            Self::GameStart(_) => "gameStart",
            Self::PropertyOwnerChanges(_) => "propertyOwnerChanges",
        }
    }

    /// Serialize the payload to its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error; none of the payload types
    /// can actually fail to serialize.
    pub fn payload_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::PlayerJoin(names) => serde_json::to_string(names),
            Self::PlayerTurn(turn) => serde_json::to_string(turn),
            Self::PlayerBalance(changes) => serde_json::to_string(changes),
            Self::PlayerMove(moves) => serde_json::to_string(moves),
            Self::GameStart(game_id) => serde_json::to_string(game_id),
            Self::PropertyOwnerChanges(changes) => serde_json::to_string(changes),
        }
    }
}
