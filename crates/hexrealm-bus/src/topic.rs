//! Topic naming (§4.G: `game:{gameId}` and `game:{gameId}:{playerId}`).

use hexrealm_types::{GameId, UserId};

/// A bus topic: either every broadcast event for a game, or one
/// player's tick-filtered view stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// The broadcast topic for every event of `game_id`.
    #[must_use]
    pub fn game(game_id: &GameId) -> Self {
        Self(format!("game:{game_id}"))
    }

    /// The per-player topic for `user_id`'s tick snapshots within
    /// `game_id`.
    #[must_use]
    pub fn player(game_id: &GameId, user_id: &UserId) -> Self {
        Self(format!("game:{game_id}:{user_id}"))
    }
}
