//! One poll cycle: read a fresh observation, diff it against the facet
//! state, and thread the new baselines forward.
//!
//! Differs run in a fixed order (turn, roster, balance, position, phase,
//! ownership) so that events reach the wire in a predictable sequence. The
//! one-time initial detail push follows `gameStart` directly.

use std::sync::Arc;

use gamefeed_types::{
    Balance, ChangeEvent, GameId, GameSnapshot, OwnershipSnapshot, PlayerId, PlayerSnapshot,
};

use crate::facets::balance::Balances;
use crate::facets::turn::TurnOrder;
use crate::facets::{
    diff_balances, diff_ownership, diff_phase, diff_positions, diff_roster, diff_turn,
    players_at_seat,
};
use crate::integrity::{self, IntegrityError};
use crate::provider::{ProviderError, SnapshotProvider};
use crate::state::{FacetState, PlayerFacets};

/// Seats announced in the starting-stake broadcast, independent of the
/// actual players in the game.
pub const STARTING_SEATS: [PlayerId; 4] = [PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)];

/// Balance every seat is announced with at game start.
pub const STARTING_BALANCE: Balance = 1500;

/// Everything read from the provider in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Game header.
    pub game: GameSnapshot,
    /// All participants.
    pub players: Vec<PlayerSnapshot>,
    /// Property ownership.
    pub ownership: OwnershipSnapshot,
}

/// Why a cycle produced no events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    /// A provider read failed.
    #[error("snapshot read failed: {source}")]
    Provider {
        /// The underlying provider error.
        #[from]
        source: ProviderError,
    },

    /// The observation was internally inconsistent.
    #[error("inconsistent snapshot: {source}")]
    Integrity {
        /// The detected fault.
        #[from]
        source: IntegrityError,
    },
}

/// Polls one game through a provider and diffs each observation.
#[derive(Debug)]
pub struct DiffEngine<P> {
    provider: Arc<P>,
    game_id: GameId,
    board_size: u32,
}

impl<P: SnapshotProvider> DiffEngine<P> {
    /// Create an engine for one game.
    pub const fn new(provider: Arc<P>, game_id: GameId, board_size: u32) -> Self {
        Self {
            provider,
            game_id,
            board_size,
        }
    }

    /// The observed game.
    pub const fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Read the game header, player list and ownership, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::Provider`] if any read fails.
    pub async fn observe(&self) -> Result<Observation, CycleError> {
        let game = self.provider.fetch_game(self.game_id).await?;
        let players = self.provider.fetch_players(self.game_id).await?;
        let ownership = self.provider.fetch_ownership(self.game_id).await?;
        Ok(Observation {
            game,
            players,
            ownership,
        })
    }

    /// Run one full cycle and advance `state` on success.
    ///
    /// On error `state` is left exactly as it was, so the next cycle diffs
    /// against the last good observation.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if the observation could not be read or
    /// failed validation.
    pub async fn cycle(&self, state: &mut FacetState) -> Result<Vec<ChangeEvent>, CycleError> {
        let observation = self.observe().await?;
        integrity::validate(&observation, self.board_size)?;

        let (events, next) = apply(state, &observation);
        *state = next;

        tracing::debug!(
            game_id = %self.game_id,
            players = observation.players.len(),
            events = events.len(),
            "Diffed observation"
        );
        Ok(events)
    }
}

/// Diff an observation against `state`, returning the events and the state
/// to carry into the next cycle.
pub fn apply(state: &FacetState, observation: &Observation) -> (Vec<ChangeEvent>, FacetState) {
    let current = PlayerFacets::from_players(&observation.players);
    let mut events = Vec::new();

    let turn = diff_turn(state.turn, observation.game.current_turn, &current.turn_order);
    events.extend(turn.events);

    let roster = diff_roster(&state.roster, &current.roster);
    events.extend(roster.events);

    let balances = diff_balances(&state.balances, &current.balances);
    events.extend(balances.events);

    let positions = diff_positions(&state.positions, &current.positions);
    events.extend(positions.events);

    let phase = diff_phase(state.phase, observation.game.phase, observation.game.game_id);
    events.extend(phase.events);
    if state.phase.latched_since(phase.next) {
        events.extend(initial_detail_push(&current.turn_order));
    }

    let ownership = diff_ownership(&state.ownership, &observation.ownership);
    events.extend(ownership.events);

    let next = FacetState {
        roster: roster.next,
        turn: turn.next,
        turn_order: current.turn_order,
        balances: balances.next,
        positions: positions.next,
        ownership: ownership.next,
        phase: phase.next,
    };
    (events, next)
}

/// The starting-stake broadcast sent once right after `gameStart`.
///
/// Announces the player in seat 0, then every entry of the fixed four-seat
/// stake map as a first observation. The stake map is a convention of the
/// client table, not derived from live balances.
pub fn initial_detail_push(turn_order: &TurnOrder) -> Vec<ChangeEvent> {
    let stakes: Balances = STARTING_SEATS
        .iter()
        .map(|&seat| (seat, STARTING_BALANCE))
        .collect();

    let mut events = players_at_seat(0, turn_order);
    events.extend(diff_balances(&Balances::new(), &stakes).events);
    events
}
