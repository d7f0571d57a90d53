//! Phase facet: lobby versus in-progress, and the once-only start latch.

use gamefeed_types::{ChangeEvent, GameId, GamePhase};

use super::FacetDiff;

/// Last seen phase plus the latch recording that `gameStart` already fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseFacet {
    /// Phase seen on the previous poll, `None` before the first poll.
    pub last: Option<GamePhase>,
    /// Set once `gameStart` has been emitted on this subscription.
    pub started: bool,
}

impl PhaseFacet {
    /// Whether `next` is the poll on which the start latch fired.
    pub const fn latched_since(self, next: Self) -> bool {
        !self.started && next.started
    }
}

/// Emit `gameStart` on the first `waiting` to `playing` transition.
///
/// A game already `playing` at first observation never produces the event,
/// and the latch keeps it from firing twice on one subscription.
pub fn diff_phase(previous: PhaseFacet, current: GamePhase, game_id: GameId) -> FacetDiff<PhaseFacet> {
    let transition =
        previous.last == Some(GamePhase::Waiting) && current == GamePhase::Playing;

    if transition && !previous.started {
        FacetDiff::single(
            ChangeEvent::GameStart(game_id),
            PhaseFacet {
                last: Some(current),
                started: true,
            },
        )
    } else {
        FacetDiff::quiet(PhaseFacet {
            last: Some(current),
            started: previous.started,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: GameId = GameId(5);

    #[test]
    fn waiting_to_playing_fires_once() {
        let lobby = diff_phase(PhaseFacet::default(), GamePhase::Waiting, GAME);
        assert!(lobby.events.is_empty());

        let start = diff_phase(lobby.next, GamePhase::Playing, GAME);
        assert_eq!(start.events, vec![ChangeEvent::GameStart(GAME)]);
        assert!(lobby.next.latched_since(start.next));

        let steady = diff_phase(start.next, GamePhase::Playing, GAME);
        assert!(steady.events.is_empty());
        assert!(!start.next.latched_since(steady.next));
    }

    #[test]
    fn already_playing_at_first_poll_is_silent() {
        let first = diff_phase(PhaseFacet::default(), GamePhase::Playing, GAME);
        assert!(first.events.is_empty());
        assert!(!first.next.started);
    }

    #[test]
    fn latch_survives_a_return_to_lobby() {
        let mut facet = PhaseFacet::default();
        let mut starts = 0_usize;
        for phase in [
            GamePhase::Waiting,
            GamePhase::Playing,
            GamePhase::Waiting,
            GamePhase::Playing,
        ] {
            let diff = diff_phase(facet, phase, GAME);
            starts = starts.saturating_add(diff.events.len());
            facet = diff.next;
        }
        assert_eq!(starts, 1);
    }
}
