//! Turn facet: whose turn it is.
//!
//! Only the active turn index is tracked for change detection. The full
//! player-to-seat mapping is consulted to find who holds that seat.

use std::collections::BTreeMap;

use gamefeed_types::{ChangeEvent, PlayerId, TurnChange, TurnIndex};

use super::FacetDiff;

/// Player id to seat in the turn rotation.
pub type TurnOrder = BTreeMap<PlayerId, TurnIndex>;

/// Emit one `playerTurn` per player seated at `current` when the active
/// index moved away from `previous`.
///
/// The facet starts unset, so the first observed index counts as a change.
/// Seats are unique in a consistent game, so normally exactly one event is
/// produced; none if nobody holds the seat.
pub fn diff_turn(
    previous: Option<TurnIndex>,
    current: TurnIndex,
    turn_order: &TurnOrder,
) -> FacetDiff<Option<TurnIndex>> {
    if previous == Some(current) {
        return FacetDiff::quiet(previous);
    }

    FacetDiff {
        events: players_at_seat(current, turn_order),
        next: Some(current),
    }
}

/// `playerTurn` events for every player holding `seat`.
pub fn players_at_seat(seat: TurnIndex, turn_order: &TurnOrder) -> Vec<ChangeEvent> {
    turn_order
        .iter()
        .filter(|&(_, &index)| index == seat)
        .map(|(&player_id, &index)| ChangeEvent::PlayerTurn(TurnChange(player_id, index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(entries: &[(i64, u32)]) -> TurnOrder {
        entries.iter().map(|(id, seat)| (PlayerId(*id), *seat)).collect()
    }

    #[test]
    fn turn_change_names_the_seated_player() {
        let seats = order(&[(2, 0), (3, 1)]);
        let diff = diff_turn(Some(0), 1, &seats);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerTurn(TurnChange(PlayerId(3), 1))]
        );
        assert_eq!(diff.next, Some(1));
    }

    #[test]
    fn first_observation_announces_current_turn() {
        let seats = order(&[(2, 0)]);
        let diff = diff_turn(None, 0, &seats);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerTurn(TurnChange(PlayerId(2), 0))]
        );
    }

    #[test]
    fn unchanged_turn_is_silent() {
        let seats = order(&[(2, 0), (3, 1)]);
        let diff = diff_turn(Some(1), 1, &seats);
        assert!(diff.events.is_empty());
        assert_eq!(diff.next, Some(1));
    }

    #[test]
    fn empty_seat_emits_nothing_but_advances() {
        let seats = order(&[(2, 0)]);
        let diff = diff_turn(Some(0), 3, &seats);
        assert!(diff.events.is_empty());
        assert_eq!(diff.next, Some(3));
    }
}
