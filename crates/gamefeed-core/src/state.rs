//! Per-subscription facet state.
//!
//! One [`FacetState`] is created empty when a subscription starts and
//! dropped when it ends. It is never shared between subscriptions, so two
//! clients that subscribe to the same game at different times each receive
//! their own first-observation events. Its size is bounded by the number of
//! players and properties, not by the number of cycles.

use gamefeed_types::{OwnershipSnapshot, PlayerSnapshot, TurnIndex};

use crate::facets::PhaseFacet;
use crate::facets::balance::Balances;
use crate::facets::position::Positions;
use crate::facets::roster::Roster;
use crate::facets::turn::TurnOrder;

/// The most recently observed value of every tracked facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetState {
    /// Player id to username.
    pub roster: Roster,
    /// Active turn index, unset before the first poll.
    pub turn: Option<TurnIndex>,
    /// Player id to seat in the rotation.
    pub turn_order: TurnOrder,
    /// Player id to balance.
    pub balances: Balances,
    /// Player id to board square.
    pub positions: Positions,
    /// Property position to owner.
    pub ownership: OwnershipSnapshot,
    /// Last phase plus the `gameStart` latch.
    pub phase: PhaseFacet,
}

impl FacetState {
    /// Fresh state for a new subscription.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Player-keyed facet mappings projected out of one player list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFacets {
    /// Player id to username.
    pub roster: Roster,
    /// Player id to seat.
    pub turn_order: TurnOrder,
    /// Player id to balance.
    pub balances: Balances,
    /// Player id to board square.
    pub positions: Positions,
}

impl PlayerFacets {
    /// Split a player list into the per-facet mappings.
    pub fn from_players(players: &[PlayerSnapshot]) -> Self {
        let mut facets = Self::default();
        for player in players {
            facets
                .roster
                .insert(player.player_id, player.username.clone());
            facets.turn_order.insert(player.player_id, player.turn_order);
            facets.balances.insert(player.player_id, player.balance);
            facets
                .positions
                .insert(player.player_id, player.board_position);
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use gamefeed_types::PlayerId;

    use super::*;

    #[test]
    fn projection_keys_every_facet_by_player() {
        let players = vec![
            PlayerSnapshot {
                player_id: PlayerId(6),
                username: String::from("B"),
                balance: 1500,
                board_position: 3,
                turn_order: 1,
            },
            PlayerSnapshot {
                player_id: PlayerId(5),
                username: String::from("A"),
                balance: 1200,
                board_position: 0,
                turn_order: 0,
            },
        ];

        let facets = PlayerFacets::from_players(&players);
        assert_eq!(
            facets.roster.values().cloned().collect::<Vec<_>>(),
            vec![String::from("A"), String::from("B")]
        );
        assert_eq!(facets.turn_order.get(&PlayerId(6)), Some(&1));
        assert_eq!(facets.balances.get(&PlayerId(5)), Some(&1200));
        assert_eq!(facets.positions.get(&PlayerId(6)), Some(&3));
    }

    #[test]
    fn new_state_is_empty() {
        let state = FacetState::new();
        assert!(state.roster.is_empty());
        assert_eq!(state.turn, None);
        assert_eq!(state.phase, PhaseFacet::default());
    }
}
