//! Pure per-facet differs.
//!
//! Each differ compares the previously observed value of one facet with the
//! current one and returns the change events together with the value that
//! becomes the baseline for the next poll. Differs never touch I/O and never
//! mutate their inputs, so running one twice on the same pair yields the
//! same output.
//!
//! Player-keyed facets use [`BTreeMap`] so payload lists come out in
//! ascending player id order and encode identically on every run.
//!
//! [`BTreeMap`]: std::collections::BTreeMap

pub mod balance;
pub mod ownership;
pub mod phase;
pub mod position;
pub mod roster;
pub mod turn;

use gamefeed_types::ChangeEvent;

pub use balance::diff_balances;
pub use ownership::diff_ownership;
pub use phase::{PhaseFacet, diff_phase};
pub use position::diff_positions;
pub use roster::diff_roster;
pub use turn::{diff_turn, players_at_seat};

/// Result of one differ invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetDiff<S> {
    /// Events to emit, in order. Empty when nothing changed.
    pub events: Vec<ChangeEvent>,
    /// Baseline for the next poll.
    pub next: S,
}

impl<S> FacetDiff<S> {
    /// A diff that carries `next` forward without emitting anything.
    pub const fn quiet(next: S) -> Self {
        Self {
            events: Vec::new(),
            next,
        }
    }

    /// A diff emitting a single event.
    pub fn single(event: ChangeEvent, next: S) -> Self {
        Self {
            events: vec![event],
            next,
        }
    }
}
