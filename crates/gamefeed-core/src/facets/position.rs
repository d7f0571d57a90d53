//! Position facet: where each player's token stands.

use std::collections::BTreeMap;

use gamefeed_types::{BoardPosition, ChangeEvent, PlayerId, PositionChange};

use super::FacetDiff;

/// Player id to board square.
pub type Positions = BTreeMap<PlayerId, BoardPosition>;

/// Report tokens that moved since `previous`.
///
/// First observation lists every player as `[id, position, 0]`. Afterwards
/// each moved player is reported as `[id, new, old]`. A player missing from
/// `previous` is reported with an old position of 0.
pub fn diff_positions(previous: &Positions, current: &Positions) -> FacetDiff<Positions> {
    if previous == current {
        return FacetDiff::quiet(current.clone());
    }

    let moves: Vec<PositionChange> = current
        .iter()
        .filter_map(|(&id, &position)| match previous.get(&id) {
            Some(&old) if old == position => None,
            Some(&old) => Some(PositionChange(id, position, old)),
            None => Some(PositionChange(id, position, 0)),
        })
        .collect();

    if moves.is_empty() {
        FacetDiff::quiet(current.clone())
    } else {
        FacetDiff::single(ChangeEvent::PlayerMove(moves), current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(entries: &[(i64, u32)]) -> Positions {
        entries.iter().map(|(id, square)| (PlayerId(*id), *square)).collect()
    }

    #[test]
    fn first_observation_uses_zero_origin() {
        let diff = diff_positions(&Positions::new(), &positions(&[(5, 4)]));
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerMove(vec![PositionChange(PlayerId(5), 4, 0)])]
        );
    }

    #[test]
    fn moves_report_old_square() {
        let previous = positions(&[(5, 4), (6, 6), (7, 5), (8, 0)]);
        let current = positions(&[(5, 4), (6, 6), (7, 5), (8, 4)]);
        let diff = diff_positions(&previous, &current);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerMove(vec![PositionChange(PlayerId(8), 4, 0)])]
        );
    }

    #[test]
    fn old_square_zero_has_no_special_case() {
        let diff = diff_positions(&positions(&[(5, 0)]), &positions(&[(5, 7)]));
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerMove(vec![PositionChange(PlayerId(5), 7, 0)])]
        );
        let diff = diff_positions(&positions(&[(5, 7)]), &positions(&[(5, 9)]));
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerMove(vec![PositionChange(PlayerId(5), 9, 7)])]
        );
    }

    #[test]
    fn unchanged_positions_are_silent() {
        let same = positions(&[(5, 4)]);
        assert!(diff_positions(&same, &same).events.is_empty());
    }
}
