//! Top-level error taxonomy for the §6 external interface (§7).

use hexrealm_types::{GameId, UserId};

/// Errors surfaced by [`crate::registry::GameRegistry`]'s procedures.
///
/// Mirrors §7's taxonomy. `RulesError` and `WorldError` from the layers
/// beneath convert into the matching variant here so a future gateway
/// only needs to match on one enum.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No game is registered under this id.
    #[error("game not found: {0}")]
    GameNotFound(GameId),
    /// A lookup inside a known game failed (player, settlement, unit,
    /// tech, law).
    #[error("not found: {0}")]
    NotFound(String),
    /// The caller does not own the target entity.
    #[error("player {0} does not own the target entity")]
    Forbidden(UserId),
    /// The game is not in a state that allows this action (e.g. a
    /// speed change to an already-current speed, or a duplicate
    /// start).
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request itself is invalid: insufficient resources, no
    /// building slot, a missing prerequisite, an invalid founding
    /// tile.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The acting player has been eliminated.
    #[error("player {0} is eliminated")]
    Eliminated(UserId),
    /// A tick panicked; caught at the tick-loop boundary so a single
    /// game's invariant violation does not take down the process or
    /// any other game's loop (§7 "isolate faults per game").
    #[error("game {0} tick pipeline panicked: {1}")]
    Fatal(GameId, String),
}

impl From<hexrealm_rules::RulesError> for EngineError {
    fn from(error: hexrealm_rules::RulesError) -> Self {
        use hexrealm_rules::RulesError as R;
        match error {
            R::PlayerNotFound(id) => Self::NotFound(format!("player {id}")),
            R::SettlementNotFound(id) => Self::NotFound(format!("settlement {id}")),
            R::UnitNotFound(id) => Self::NotFound(format!("unit {id}")),
            R::TechNotFound(id) | R::TechUnavailable(id) => Self::NotFound(format!("tech {id}")),
            R::LawNotFound(id) | R::LawUnavailable(id) => Self::NotFound(format!("law {id}")),
            R::BuildingNotFound(id) => Self::NotFound(format!("building {id}")),
            R::Forbidden(id) => Self::Forbidden(id),
            R::Eliminated(id) => Self::Eliminated(id),
            R::NoBuildingSlot(id) => Self::BadRequest(format!("settlement {id} has no free building slot")),
            R::InsufficientResources => Self::BadRequest("insufficient resources".to_owned()),
            R::MissingBarracks(id) => Self::BadRequest(format!("settlement {id} has no barracks")),
            R::InvalidTile(q, r) => Self::BadRequest(format!("tile ({q}, {r}) is not valid")),
        }
    }
}

impl From<hexrealm_world::WorldError> for EngineError {
    fn from(error: hexrealm_world::WorldError) -> Self {
        use hexrealm_world::WorldError as W;
        match error {
            W::PlayerNotFound(id) => Self::NotFound(format!("player {id}")),
            W::SettlementNotFound(id) => Self::NotFound(format!("settlement {id}")),
            W::UnitNotFound(id) => Self::NotFound(format!("unit {id}")),
            W::UnknownFaction(source) => Self::NotFound(source.to_string()),
        }
    }
}
