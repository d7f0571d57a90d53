//! `PostgreSQL` data layer for the gamefeed service.
//!
//! The game server writes game, player and property rows; the feed reads
//! them back once per poll through [`PgSnapshotProvider`].
//!
//! # Modules
//!
//! - [`postgres`]: connection pool, configuration and migrations
//! - [`provider`]: the snapshot provider used by stream drivers
//! - [`records`]: scoped, row-locked writes and record creation helpers
//! - [`rows`]: table rows and their conversion to domain snapshots
//! - [`error`]: shared error type

pub mod error;
pub mod postgres;
pub mod provider;
pub mod records;
pub mod rows;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use provider::PgSnapshotProvider;
pub use records::{
    GameScope, PlayerRecord, PlayerScope, create_game, create_player, set_property_owner,
};
