//! Type-safe identifier wrappers around the integer keys assigned by the
//! authoritative store.
//!
//! Player and game ids are database-generated `BIGINT`s. Wrapping them keeps
//! a player id from being passed where a game id is expected. Both
//! serialize as bare integers so wire payloads stay `[5, 300, 300]` rather
//! than `[{"0":5}, ...]`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `i64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Return the inner integer value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique, stable identifier for a player. Never reused within a game.
    PlayerId
}

define_id! {
    /// Identifier of one game instance; the unit of subscription.
    GameId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&PlayerId(5)).ok();
        assert_eq!(json.as_deref(), Some("5"));

        let restored: Result<GameId, _> = serde_json::from_str("42");
        assert_eq!(restored.ok(), Some(GameId(42)));
    }

    #[test]
    fn id_parses_from_path_segment() {
        assert_eq!("17".parse::<GameId>().ok(), Some(GameId(17)));
        assert!("seventeen".parse::<GameId>().is_err());
    }

    #[test]
    fn id_display_matches_inner() {
        assert_eq!(PlayerId(-3).to_string(), "-3");
    }
}
