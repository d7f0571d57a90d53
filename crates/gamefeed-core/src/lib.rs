//! Core engine for the gamefeed push-notification service.
//!
//! A subscriber names a game and receives a stream of change events. For
//! each subscription a [`StreamDriver`] repeatedly asks a
//! [`SnapshotProvider`] for the game's authoritative state, diffs it
//! against the previous observation with the per-facet differs in
//! [`facets`], and writes whatever changed to the subscriber as
//! server-sent events.
//!
//! # Modules
//!
//! - [`facets`]: pure differs for roster, turn, balance, position, phase
//!   and ownership
//! - [`state`]: per-subscription facet state
//! - [`integrity`]: consistency checks on each observation
//! - [`engine`]: one poll-diff cycle
//! - [`emitter`]: SSE wire encoding
//! - [`driver`]: the subscription loop
//! - [`provider`]: the snapshot source trait
//! - [`memory`]: an in-process provider and record store
//! - [`config`]: YAML configuration

pub mod config;
pub mod driver;
pub mod emitter;
pub mod engine;
pub mod facets;
pub mod integrity;
pub mod memory;
pub mod provider;
pub mod state;

pub use config::{ConfigError, FeedConfig};
pub use driver::{StreamConfig, StreamDriver, StreamError};
pub use emitter::EmitError;
pub use engine::{CycleError, DiffEngine, Observation};
pub use integrity::IntegrityError;
pub use memory::{GameTxn, MemoryStore, RecordError};
pub use provider::{ProviderError, SnapshotProvider};
pub use state::FacetState;
