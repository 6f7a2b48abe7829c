//! Static game-content definitions: factions, units, buildings,
//! settlement tiers, techs, and laws.
//!
//! Everything here is a read-only lookup table. The crates that mutate
//! live game state (`hexrealm-world`, `hexrealm-rules`) depend on this
//! one, never the reverse.

pub mod buildings;
pub mod error;
pub mod factions;
pub mod laws;
pub mod settlements;
pub mod tech;
pub mod units;

pub use buildings::{building_def, buildings_available_at_tier, BuildingDef};
pub use error::DefsError;
pub use factions::{apply_income_modifiers, faction, AiModifiers, FactionDef};
pub use laws::{available_laws, law, LawBranch, LawDef, LawEffect};
pub use settlements::{next_tier, settlement_tier_def, SettlementTierDef, SETTLEMENT_NAME_POOL};
pub use tech::{all_techs, available_techs, tech, TechDef};
pub use units::{unit_def, UnitDef};
