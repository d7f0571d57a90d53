//! Balance facet: how much money each player holds.

use std::collections::BTreeMap;

use gamefeed_types::{Balance, BalanceChange, ChangeEvent, PlayerId};

use super::FacetDiff;

/// Player id to balance.
pub type Balances = BTreeMap<PlayerId, Balance>;

/// Report balances that changed since `previous`.
///
/// First observation lists every player with a delta of 0. Afterwards each
/// changed player is reported as `[id, new, new - old]`, except that an old
/// balance of exactly zero yields a delta equal to the new balance. A player
/// missing from `previous` is treated as holding zero.
pub fn diff_balances(previous: &Balances, current: &Balances) -> FacetDiff<Balances> {
    if previous == current {
        return FacetDiff::quiet(current.clone());
    }

    let changes: Vec<BalanceChange> = if previous.is_empty() {
        current
            .iter()
            .map(|(&id, &balance)| BalanceChange(id, balance, 0))
            .collect()
    } else {
        current
            .iter()
            .filter_map(|(&id, &balance)| {
                let old = previous.get(&id).copied().unwrap_or(0);
                (old != balance || !previous.contains_key(&id))
                    .then_some(BalanceChange(id, balance, balance_delta(old, balance)))
            })
            .collect()
    };

    if changes.is_empty() {
        FacetDiff::quiet(current.clone())
    } else {
        FacetDiff::single(ChangeEvent::PlayerBalance(changes), current.clone())
    }
}

/// `new - old`, or `new` when `old` is zero.
const fn balance_delta(old: Balance, new: Balance) -> Balance {
    if old == 0 { new } else { new.saturating_sub(old) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(i64, i64)]) -> Balances {
        entries.iter().map(|(id, amount)| (PlayerId(*id), *amount)).collect()
    }

    #[test]
    fn first_observation_uses_zero_delta() {
        let diff = diff_balances(&Balances::new(), &balances(&[(5, 200)]));
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerBalance(vec![BalanceChange(PlayerId(5), 200, 0)])]
        );
    }

    #[test]
    fn only_changed_players_are_reported() {
        let previous = balances(&[(5, 200), (6, 200), (7, 200), (8, 200)]);
        let current = balances(&[(5, 200), (6, 200), (7, 200), (8, 400)]);
        let diff = diff_balances(&previous, &current);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerBalance(vec![BalanceChange(PlayerId(8), 400, 200)])]
        );
        assert_eq!(diff.next, current);
    }

    #[test]
    fn zero_old_balance_reports_new_value_as_delta() {
        let diff = diff_balances(&balances(&[(5, 0)]), &balances(&[(5, 300)]));
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerBalance(vec![BalanceChange(PlayerId(5), 300, 300)])]
        );
    }

    #[test]
    fn negative_deltas_are_reported() {
        let diff = diff_balances(&balances(&[(5, 1500)]), &balances(&[(5, 1350)]));
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerBalance(vec![BalanceChange(PlayerId(5), 1350, -150)])]
        );
    }

    #[test]
    fn newcomer_is_measured_from_zero() {
        let previous = balances(&[(5, 1500)]);
        let current = balances(&[(5, 1500), (6, 1500)]);
        let diff = diff_balances(&previous, &current);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerBalance(vec![BalanceChange(PlayerId(6), 1500, 1500)])]
        );
    }

    #[test]
    fn unchanged_balances_are_silent() {
        let same = balances(&[(5, 10), (6, 20)]);
        assert!(diff_balances(&same, &same).events.is_empty());
    }

    #[test]
    fn departure_alone_is_silent() {
        let previous = balances(&[(5, 10), (6, 20)]);
        let current = balances(&[(5, 10)]);
        let diff = diff_balances(&previous, &current);
        assert!(diff.events.is_empty());
        assert_eq!(diff.next, current);
    }
}
