//! Enumeration types shared across the simulation crates.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The fine-grained, ten-value terrain taxonomy used by the map and the
/// fog/view layers (§3 "Terrain taxonomy").
///
/// Numeric discriminants match the wire contract in §3 exactly
/// (`terrain[i] ∈ 0..9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[repr(u8)]
pub enum Terrain {
    /// 0 — impassable water.
    DeepWater = 0,
    /// 1 — impassable water.
    ShallowWater = 1,
    /// 2 — land.
    Beach = 2,
    /// 3 — land.
    Desert = 3,
    /// 4 — land.
    Plains = 4,
    /// 5 — land.
    Grassland = 5,
    /// 6 — land; forest is the unit-AI/builder gather terrain.
    Forest = 6,
    /// 7 — land; builder hill terrain yields mines.
    Hills = 7,
    /// 8 — impassable (not water, but not "land" either).
    Mountain = 8,
    /// 9 — land.
    Snow = 9,
}

impl Terrain {
    /// Decode a raw map byte (§3 `terrain[i] ∈ 0..9`).
    ///
    /// Returns `None` for any value outside the taxonomy.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::DeepWater),
            1 => Some(Self::ShallowWater),
            2 => Some(Self::Beach),
            3 => Some(Self::Desert),
            4 => Some(Self::Plains),
            5 => Some(Self::Grassland),
            6 => Some(Self::Forest),
            7 => Some(Self::Hills),
            8 => Some(Self::Mountain),
            9 => Some(Self::Snow),
            _ => None,
        }
    }

    /// `true` for the fine-grained taxonomy's "land" classification: not
    /// water (0, 1) and not mountain (8) (§3 "Land" =).
    #[must_use]
    pub const fn is_land(self) -> bool {
        !matches!(self, Self::DeepWater | Self::ShallowWater | Self::Mountain)
    }
}

/// The coarse, six-value terrain taxonomy used by the legacy movement and
/// combat systems (§3, §4.C, §4.E.3, §4.E.4).
///
/// Water (0) and mountain (5) are impassable/unsettleable under this
/// scheme; the mapping from the fine taxonomy is documented per call site
/// rather than unified, per §9 "Terrain taxonomy confusion".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[repr(u8)]
pub enum CoarseTerrain {
    /// 0 — impassable.
    Water = 0,
    /// 1 — land.
    Desert = 1,
    /// 2 — land, gives builders a mine.
    Steppe = 2,
    /// 3 — land, gives builders a farm; gatherer target terrain.
    Plains = 3,
    /// 4 — land, combat terrain-defense bonus.
    Forest = 4,
    /// 5 — impassable, combat terrain-defense bonus.
    Mountains = 5,
}

impl CoarseTerrain {
    /// Decode a raw coarse-taxonomy byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Water),
            1 => Some(Self::Desert),
            2 => Some(Self::Steppe),
            3 => Some(Self::Plains),
            4 => Some(Self::Forest),
            5 => Some(Self::Mountains),
            _ => None,
        }
    }

    /// `true` if a unit may enter this tile under the coarse taxonomy used
    /// by BFS pathing and combat (water and mountain are impassable).
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Water | Self::Mountains)
    }

    /// Terrain defense divisor used by the combat system's `terrainMod`
    /// (§4.E.4): water/desert/steppe/plains = 1.0, forest = 1.2,
    /// mountains = 1.3.
    #[must_use]
    pub const fn defense(self) -> f64 {
        match self {
            Self::Water | Self::Desert | Self::Steppe | Self::Plains => 1.0,
            Self::Forest => 1.2,
            Self::Mountains => 1.3,
        }
    }
}

/// An improvement placed on a tile by a builder (§3 `improvements`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ImprovementType {
    /// Grants a movement-speed bonus when traversed (§4.E.3).
    Road,
    /// Placed on forest tiles (§4.E.2 builder execution).
    FarmImprovement,
    /// Placed on hill tiles (§4.E.2 builder execution).
    Mine,
}

/// Settlement growth tier (§3 `Settlement.tier`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SettlementTier {
    /// Founded settlement, smallest tier.
    Outpost,
    /// Grown from outpost at 200 food (§4.E.5).
    Settlement,
    /// Grown from settlement at 500 food; does not grow further.
    City,
}

/// Unit archetype (§3 `Unit.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UnitType {
    /// Explores unexplored fog tiles.
    Scout,
    /// Gathers resources from forest tiles inside a settlement's radius.
    Gatherer,
    /// Fights hostile units; patrols when none are visible.
    Warrior,
    /// Founds new settlements.
    Settler,
    /// Places improvements on empty land tiles.
    Builder,
}

/// Unit activity state (§3 `Unit.state`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UnitState {
    /// No current intent.
    Idle,
    /// Advancing toward `targetQ/targetR` (retreat, explore, patrol, settle).
    Moving,
    /// Gathering resources at the target tile.
    Gathering,
    /// Placing an improvement at the target tile.
    Building,
    /// Engaged in combat this tick.
    Fighting,
    /// Heading back to the nearest own settlement (hunger response).
    Returning,
}

/// Diplomatic relationship between two human players (§3 `DiplomacyState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DiplomacyStatus {
    /// The default, implicit relationship when no entry exists.
    Peace,
    /// Elevated hostility short of war.
    Tension,
    /// Units of these two owners fight on contact (§4.E.4 `shouldFight`).
    War,
}

/// One of the five per-player advisors (§3 `Player.advisors`, §4.E.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AdvisorType {
    /// Votes on military-branch laws; cares about army size.
    General,
    /// Votes on economy-branch laws; cares about gold.
    Treasurer,
    /// Votes on society-branch laws; cares about culture income.
    Priest,
    /// Votes against science-reducing laws.
    Scholar,
    /// Votes against laws proposed while at war or food-negative.
    Tribune,
}

impl AdvisorType {
    /// All five advisor types, in the canonical order used to populate
    /// `Player.advisors` and to tally votes deterministically.
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Treasurer,
        Self::Priest,
        Self::Scholar,
        Self::Tribune,
    ];
}

/// A single advisor's vote on a proposed law (§4.E.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Vote {
    /// The advisor supports the law.
    Yes,
    /// The advisor opposes the law.
    No,
}

/// Player-chosen default stance applied by the unit-AI system (§3
/// `Policies.combatPolicy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CombatPolicy {
    /// Favors attacking over retreating.
    Aggressive,
    /// Balanced default.
    Defensive,
    /// Favors retreating over attacking.
    Avoidance,
}

/// A law's effect category (§4.E.7 step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LawEffectKind {
    /// Adjusts an advisor's loyalty (applied).
    LoyaltyChange,
    /// Adjusts a diplomacy pair's status (applied).
    DiplomacyChange,
    /// Recorded in `passedLaws` only; no consumer in this version (§9).
    ResourceModifier,
    /// Recorded in `passedLaws` only; no consumer in this version (§9).
    UnitModifier,
    /// Recorded in `passedLaws` only; no consumer in this version (§9).
    SettlementModifier,
    /// Recorded in `passedLaws` only; no consumer in this version (§9).
    Special,
}

/// One of the four resources tracked per player, plus the other income
/// categories enumerated in §3 `Player.resources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ResourceKind {
    /// Consumed by unit upkeep; negative triggers the food crisis (§4.E.1).
    Food,
    /// Spent on buildings and settlement founding.
    Production,
    /// Spent on units, buildings, and readable by action validation.
    Gold,
    /// Accumulates into `researchProgress` (§4.E.6).
    Science,
    /// Spent on laws (§4.E.7).
    Culture,
}

impl ResourceKind {
    /// All five tracked resources, in the canonical iteration order used
    /// for income/upkeep accumulation.
    pub const ALL: [Self; 5] = [
        Self::Food,
        Self::Production,
        Self::Gold,
        Self::Science,
        Self::Culture,
    ];
}

/// Terminal victory condition (§4.E.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VictoryType {
    /// All capitals in the game are owned by one player.
    Domination,
    /// A player's gold reaches the threshold.
    Prosperity,
    /// A player's culture reaches the threshold.
    Influence,
    /// A player has researched every tech available to their faction.
    Enlightenment,
    /// Exactly one non-eliminated player remains.
    LastStanding,
}

/// Which action an AI-controlled unit decided to take this tick
/// (§4.E.2 step 3), kept distinct from [`UnitState`] so the decision
/// logic and the state-machine representation are independently
/// testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum UnitAction {
    /// No viable action was found.
    Idle,
    /// Head to the nearest own settlement.
    ReturnToBase,
    /// Step away from the mean hostile position.
    Retreat,
    /// Head to the nearest unexplored tile.
    Explore,
    /// Head to a gatherable tile.
    Gather,
    /// Attack the closest hostile unit.
    Attack,
    /// Head to a patrol waypoint.
    Patrol,
    /// Head to a valid settling tile.
    Settle,
    /// Head to an improvable tile.
    Build,
}
