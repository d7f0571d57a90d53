//! Enumeration types shared between the store, the engine and the wire.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle phase of a game instance.
///
/// Games are created `waiting` while players join the lobby and move to
/// `playing` once the host starts them. The store persists the lowercase
/// string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum GamePhase {
    /// Lobby open, players may still join.
    Waiting,
    /// Game in progress.
    Playing,
}

impl GamePhase {
    /// The persisted string form (`"waiting"` / `"playing"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
        }
    }
}

impl core::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase string that is neither `waiting` nor `playing`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game phase: {0:?}")]
pub struct UnknownPhase(pub String);

impl core::str::FromStr for GamePhase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "playing" => Ok(Self::Playing),
            other => Err(UnknownPhase(other.to_owned())),
        }
    }
}
