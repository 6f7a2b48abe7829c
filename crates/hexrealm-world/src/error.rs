//! Error types for the `hexrealm-world` crate.

use hexrealm_types::{SettlementId, UnitId, UserId};

/// Errors that can occur during world-state construction or queries.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No player is registered under this id.
    #[error("player not found: {0}")]
    PlayerNotFound(UserId),

    /// No settlement is registered under this id.
    #[error("settlement not found: {0}")]
    SettlementNotFound(SettlementId),

    /// No unit is registered under this id.
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    /// A faction referenced by `config` does not exist in the static
    /// definitions.
    #[error(transparent)]
    UnknownFaction(#[from] hexrealm_defs::DefsError),
}
