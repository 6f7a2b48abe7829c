//! Identifier newtypes for every entity in a game.
//!
//! `GameId` and `UserId` wrap the strings handed in by the (out-of-scope)
//! lobby/gateway layer. `SettlementId` and `UnitId` are small counters
//! minted by a single [`crate::GameState`]-owning crate, scoped to one
//! game, so they wrap `u64` rather than a globally unique UUID.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `String` with the display/serde
/// plumbing every caller needs.
macro_rules! define_string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the inner string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

/// Generates a newtype wrapper around a per-game `u64` counter.
macro_rules! define_counter_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Return the raw counter value.
            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_string_id! {
    /// Identifier for a match, assigned by the lobby layer.
    GameId
}

define_string_id! {
    /// Identifier for a player, assigned by the identity store.
    UserId
}

define_counter_id! {
    /// Identifier for a settlement, unique within one game.
    SettlementId
}

define_counter_id! {
    /// Identifier for a unit (player-owned or neutral), unique within one game.
    UnitId
}

/// The two synthetic owners used by non-player units (§3 Unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NeutralOwner {
    /// Wildlife: gatherer-shaped, never hostile to other neutrals.
    Animal,
    /// Barbarians: warrior-shaped, hostile to everyone but other barbarians.
    Barbarian,
}

impl fmt::Display for NeutralOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Animal => "neutral_animal",
            Self::Barbarian => "neutral_barbarian",
        };
        write!(f, "{label}")
    }
}

/// A unit's owner: either a human player or one of the two neutral camps
/// (§3 invariant 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UnitOwner {
    /// Owned by a registered player.
    Player(UserId),
    /// Owned by a neutral camp.
    Neutral(NeutralOwner),
}

impl UnitOwner {
    /// `true` if this owner is not a registered player.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral(_))
    }

    /// The player this unit belongs to, if any.
    #[must_use]
    pub const fn player(&self) -> Option<&UserId> {
        match self {
            Self::Player(id) => Some(id),
            Self::Neutral(_) => None,
        }
    }
}
