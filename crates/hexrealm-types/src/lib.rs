//! Shared type definitions for the Hexrealm simulation.
//!
//! This crate is the single source of truth for identifiers, enums, and
//! wire-shaped structs used across the simulation workspace. Types here
//! flow downstream to TypeScript via `ts-rs` for a hypothetical client.
//!
//! # Modules
//!
//! - [`ids`] — newtype identifiers for games, players, settlements, units.
//! - [`enums`] — terrain, unit, diplomacy, advisor, and event enumerations.
//! - [`structs`] — resource bundles, policies, advisors, diplomacy entries,
//!   construction config, and the fog-filtered player view.
//! - [`events`] — the discrete `GameEvent` shapes delivered by the bus.

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

pub use enums::{
    AdvisorType, CoarseTerrain, CombatPolicy, DiplomacyStatus, ImprovementType, LawEffectKind,
    ResourceKind, SettlementTier, Terrain, UnitAction, UnitState, UnitType, VictoryType, Vote,
};
pub use events::{DiplomacyChange, GameEvent, LoyaltyChange, ProposeLawOutcome, VoteRecord};
pub use ids::{GameId, NeutralOwner, SettlementId, UnitId, UnitOwner, UserId};
pub use structs::{
    Advisor, AdvisorMap, ClientPlayerState, DiplomacyEntry, GameConfig, GameSpeed, PlayerConfig,
    Policies, ResourceBundle, VisibleSettlement, VisibleUnit,
};
