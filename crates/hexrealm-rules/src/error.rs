//! Error taxonomy for rule systems and action handlers (§7).

use hexrealm_types::{SettlementId, UnitId, UserId};

/// Errors surfaced by action handlers and validated rule entry points.
///
/// Mirrors the error taxonomy of §7: `NotFound`, `Forbidden`,
/// `Conflict`, `BadRequest`, `Eliminated`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RulesError {
    /// No player is registered under this id.
    #[error("player not found: {0}")]
    PlayerNotFound(UserId),
    /// No settlement is registered under this id.
    #[error("settlement not found: {0}")]
    SettlementNotFound(SettlementId),
    /// No unit is registered under this id.
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),
    /// No tech is registered under this id.
    #[error("tech not found: {0}")]
    TechNotFound(String),
    /// No law is registered under this id.
    #[error("law not found: {0}")]
    LawNotFound(String),
    /// No building is registered under this id.
    #[error("building not found: {0}")]
    BuildingNotFound(String),
    /// The caller does not own the target entity.
    #[error("player {0} does not own the target entity")]
    Forbidden(UserId),
    /// The player cannot act because they have been eliminated.
    #[error("player {0} is eliminated")]
    Eliminated(UserId),
    /// The settlement has no free building slot.
    #[error("settlement {0} has no free building slot")]
    NoBuildingSlot(SettlementId),
    /// Insufficient resources for the requested action.
    #[error("insufficient resources for this action")]
    InsufficientResources,
    /// A `warrior` purchase was attempted without a `barracks`.
    #[error("settlement {0} has no barracks")]
    MissingBarracks(SettlementId),
    /// The tech is not currently available to the player's faction.
    #[error("tech {0} is not currently available")]
    TechUnavailable(String),
    /// The law is not currently available to the player's faction.
    #[error("law {0} is not currently available")]
    LawUnavailable(String),
    /// The target tile is not valid for the requested placement.
    #[error("tile ({0}, {1}) is not valid for this action")]
    InvalidTile(i32, i32),
}
