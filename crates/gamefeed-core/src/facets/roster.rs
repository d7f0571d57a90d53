//! Roster facet: which players are in the game.

use std::collections::BTreeMap;

use gamefeed_types::{ChangeEvent, PlayerId};

use super::FacetDiff;

/// Player id to username.
pub type Roster = BTreeMap<PlayerId, String>;

/// Report players who joined since `previous`.
///
/// On first observation (`previous` empty) every current username is
/// listed. Afterwards only ids absent from `previous` are listed. Players
/// never leave, so departures are not reported, and a change that adds no
/// new id (a rename) emits nothing.
pub fn diff_roster(previous: &Roster, current: &Roster) -> FacetDiff<Roster> {
    if previous == current {
        return FacetDiff::quiet(current.clone());
    }

    let joined: Vec<String> = current
        .iter()
        .filter(|(id, _)| previous.is_empty() || !previous.contains_key(*id))
        .map(|(_, name)| name.clone())
        .collect();

    if joined.is_empty() {
        FacetDiff::quiet(current.clone())
    } else {
        FacetDiff::single(ChangeEvent::PlayerJoin(joined), current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(entries: &[(i64, &str)]) -> Roster {
        entries
            .iter()
            .map(|(id, name)| (PlayerId(*id), (*name).to_owned()))
            .collect()
    }

    #[test]
    fn first_observation_lists_everyone() {
        let current = roster(&[(5, "first_user")]);
        let diff = diff_roster(&Roster::new(), &current);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerJoin(vec![String::from("first_user")])]
        );
        assert_eq!(diff.next, current);
    }

    #[test]
    fn later_polls_list_only_newcomers() {
        let previous = roster(&[(5, "first_user"), (6, "user_2")]);
        let current = roster(&[(5, "first_user"), (6, "user_2"), (8, "third")]);
        let diff = diff_roster(&previous, &current);
        assert_eq!(
            diff.events,
            vec![ChangeEvent::PlayerJoin(vec![String::from("third")])]
        );
    }

    #[test]
    fn unchanged_roster_is_silent() {
        let same = roster(&[(5, "A"), (6, "B")]);
        let diff = diff_roster(&same, &same);
        assert!(diff.events.is_empty());
        assert_eq!(diff.next, same);
    }

    #[test]
    fn empty_to_empty_is_silent() {
        assert!(diff_roster(&Roster::new(), &Roster::new()).events.is_empty());
    }

    #[test]
    fn rename_is_not_a_join() {
        let previous = roster(&[(5, "A")]);
        let current = roster(&[(5, "Alice")]);
        let diff = diff_roster(&previous, &current);
        assert!(diff.events.is_empty());
        assert_eq!(diff.next, current);
    }

    #[test]
    fn repeated_invocation_is_identical() {
        let previous = roster(&[(5, "A")]);
        let current = roster(&[(5, "A"), (6, "B")]);
        assert_eq!(diff_roster(&previous, &current), diff_roster(&previous, &current));
    }
}
