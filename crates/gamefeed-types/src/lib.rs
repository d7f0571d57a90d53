//! Shared type definitions for the gamefeed service.
//!
//! This crate is the single source of truth for the snapshot and event
//! types that flow between the store, the diff engine and subscribed
//! clients. Wire payload types are exported to `TypeScript` via `ts-rs` for
//! the browser client.
//!
//! # Modules
//!
//! - [`ids`] -- Integer identifier newtypes for players and games
//! - [`enums`] -- Game phase
//! - [`snapshot`] -- Game, player and ownership snapshots
//! - [`events`] -- Change events and their wire payloads

pub mod enums;
pub mod events;
pub mod ids;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use enums::{GamePhase, UnknownPhase};
pub use events::{BalanceChange, ChangeEvent, OwnerChange, PositionChange, TurnChange};
pub use ids::{GameId, PlayerId};
pub use snapshot::{
    Balance, BoardPosition, GameSnapshot, OwnershipSnapshot, PlayerSnapshot, TurnIndex,
};
