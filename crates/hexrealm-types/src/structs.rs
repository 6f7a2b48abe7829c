//! Shared data shapes that cross crate boundaries: resource bundles,
//! policies, advisors, diplomacy entries, and the construction/view
//! contracts for a game.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AdvisorType, DiplomacyStatus, ResourceKind};
use crate::ids::UserId;

/// A per-resource quantity bundle, used for `resources`, `resourceIncome`,
/// and `resourceUpkeep` (§3 `Player`).
///
/// Backed by [`Decimal`] rather than a float so income/upkeep accumulation
/// across many ticks never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceBundle {
    /// Food stockpile or flow.
    pub food: Decimal,
    /// Production stockpile or flow.
    pub production: Decimal,
    /// Gold stockpile or flow.
    pub gold: Decimal,
    /// Science stockpile or flow.
    pub science: Decimal,
    /// Culture stockpile or flow.
    pub culture: Decimal,
}

impl ResourceBundle {
    /// A bundle of all zeroes, the starting point for income/upkeep
    /// accumulation each tick.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            food: Decimal::ZERO,
            production: Decimal::ZERO,
            gold: Decimal::ZERO,
            science: Decimal::ZERO,
            culture: Decimal::ZERO,
        }
    }

    /// Read one resource by kind.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> Decimal {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Production => self.production,
            ResourceKind::Gold => self.gold,
            ResourceKind::Science => self.science,
            ResourceKind::Culture => self.culture,
        }
    }

    /// Write one resource by kind.
    pub fn set(&mut self, kind: ResourceKind, value: Decimal) {
        match kind {
            ResourceKind::Food => self.food = value,
            ResourceKind::Production => self.production = value,
            ResourceKind::Gold => self.gold = value,
            ResourceKind::Science => self.science = value,
            ResourceKind::Culture => self.culture = value,
        }
    }

    /// Add `delta` to one resource by kind, saturating at `Decimal::MAX`/
    /// `Decimal::MIN` instead of panicking on overflow.
    pub fn add(&mut self, kind: ResourceKind, delta: Decimal) {
        let current = self.get(kind);
        let next = current
            .checked_add(delta)
            .unwrap_or(if delta.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            });
        self.set(kind, next);
    }
}

impl Default for ResourceBundle {
    fn default() -> Self {
        Self::zero()
    }
}

/// A player's three tunable policy sliders plus their default combat
/// stance (§3 `Player.policies`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Policies {
    /// 0..100. Feeds the unit-AI safety threshold (§4.E.2).
    pub aggression: u8,
    /// 0..100. Reserved for faction/AI expansion heuristics.
    pub expansion: u8,
    /// 0..100. Reserved for faction/AI spending heuristics.
    pub spending: u8,
    /// The player's default combat stance.
    pub combat_policy: crate::enums::CombatPolicy,
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            aggression: 50,
            expansion: 50,
            spending: 50,
            combat_policy: crate::enums::CombatPolicy::Defensive,
        }
    }
}

/// One advisor's current loyalty (§3 `Player.advisors`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Advisor {
    /// Which advisor seat this is.
    pub advisor_type: AdvisorType,
    /// 0..=100 (§3 invariant 3).
    pub loyalty: u8,
}

impl Advisor {
    /// A fresh advisor at neutral (50) loyalty.
    #[must_use]
    pub const fn new(advisor_type: AdvisorType) -> Self {
        Self {
            advisor_type,
            loyalty: 50,
        }
    }

    /// Add `delta` to loyalty, clamped to `[0, 100]` (§3 invariant 3).
    pub fn adjust_loyalty(&mut self, delta: i16) {
        let current = i16::from(self.loyalty);
        let next = (current + delta).clamp(0, 100);
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let clamped = next as u8;
        self.loyalty = clamped;
    }
}

/// The diplomatic relationship between two human players, or the absence
/// of one (§3 `diplomacy`: "Absence of a pair entry ⇒ implicit peace").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DiplomacyEntry {
    /// One side of the unordered pair.
    pub player_a: UserId,
    /// The other side of the unordered pair.
    pub player_b: UserId,
    /// The current relationship.
    pub status: DiplomacyStatus,
}

impl DiplomacyEntry {
    /// `true` if `{a, b}` equals this entry's unordered pair.
    #[must_use]
    pub fn matches(&self, a: &UserId, b: &UserId) -> bool {
        (&self.player_a == a && &self.player_b == b) || (&self.player_a == b && &self.player_b == a)
    }
}

/// Per-player configuration handed to `create` (§4.B `config.players[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerConfig {
    /// The player's identifier.
    pub user_id: UserId,
    /// The player's chosen faction.
    pub faction_id: String,
}

/// The configuration object passed to `create` (§4.B `config`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameConfig {
    /// The match identifier assigned by the lobby layer.
    pub game_id: crate::ids::GameId,
    /// Map width in tiles.
    pub map_width: u32,
    /// Map height in tiles.
    pub map_height: u32,
    /// Flattened `terrain[r*W + q]` bytes from the map generator.
    pub terrain: Vec<u8>,
    /// Flattened `elevation[r*W + q]` bytes from the map generator.
    pub elevation: Vec<u8>,
    /// The players joining this match, in join order.
    pub players: Vec<PlayerConfig>,
    /// Initial tick speed multiplier.
    pub speed: GameSpeed,
}

/// The four supported tick-speed multipliers (§3 `speed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GameSpeed {
    /// Half speed: one tick per 1000ms.
    Half,
    /// Normal speed: one tick per 500ms.
    Normal,
    /// Double speed: one tick per 250ms.
    Double,
    /// Triple speed: one tick per 166ms (rounded down).
    Triple,
}

impl GameSpeed {
    /// The tick interval in milliseconds for this speed (§4.F `startGame`).
    #[must_use]
    pub const fn interval_ms(self) -> u64 {
        match self {
            Self::Half => 1000,
            Self::Normal => 500,
            Self::Double => 250,
            Self::Triple => 166,
        }
    }

    /// The numeric multiplier this speed represents (`0.5`, `1`, `2`, `3`).
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::Double => 2.0,
            Self::Triple => 3.0,
        }
    }
}

/// A fog-filtered, per-player snapshot of a game (§4.B `getPlayerView`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClientPlayerState {
    /// Current tick counter.
    pub tick: u64,
    /// Whether the game is currently paused.
    pub paused: bool,
    /// Current speed multiplier.
    pub speed: GameSpeed,
    /// The viewing player's faction.
    pub faction_id: String,
    /// Current resource stockpiles.
    pub resources: ResourceBundle,
    /// This tick's resource income (post faction modifiers).
    pub resource_income: ResourceBundle,
    /// This tick's resource upkeep.
    pub resource_upkeep: ResourceBundle,
    /// The viewing player's five advisors.
    pub advisors: [Advisor; 5],
    /// Techs already researched, in completion order.
    pub researched_techs: Vec<String>,
    /// Tech currently being researched, if any.
    pub current_research: Option<String>,
    /// Progress accumulated toward `current_research`.
    pub research_progress: Decimal,
    /// Laws already passed, in passage order.
    pub passed_laws: Vec<String>,
    /// The viewing player's policy sliders.
    pub policies: Policies,
    /// All diplomacy entries involving the viewing player or any other
    /// human player (the full table — diplomacy status is not filtered
    /// per viewer).
    pub diplomacy: Vec<DiplomacyEntry>,
    /// Settlements visible to the viewing player.
    pub visible_settlements: Vec<VisibleSettlement>,
    /// Units visible to the viewing player.
    pub visible_units: Vec<VisibleUnit>,
    /// A copy of the viewing player's fog map, `fogMap[r*W + q]`.
    pub fog_map: Vec<u8>,
}

/// A settlement as rendered into a [`ClientPlayerState`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleSettlement {
    /// The settlement's identifier.
    pub id: crate::ids::SettlementId,
    /// The settlement's owner.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Growth tier.
    pub tier: crate::enums::SettlementTier,
    /// Axial column.
    pub q: i32,
    /// Axial row.
    pub r: i32,
    /// Whether this is its owner's capital.
    pub is_capital: bool,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points for this tier.
    pub max_hp: u32,
}

/// A unit as rendered into a [`ClientPlayerState`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleUnit {
    /// The unit's identifier.
    pub id: crate::ids::UnitId,
    /// Unit archetype.
    pub unit_type: crate::enums::UnitType,
    /// Owner, player or neutral.
    pub owner_id: String,
    /// Axial column.
    pub q: i32,
    /// Axial row.
    pub r: i32,
    /// Current hit points.
    pub hp: u32,
    /// Current activity state.
    pub state: crate::enums::UnitState,
}

/// A map keyed by advisor type, used when tallying votes (§4.E.7).
pub type AdvisorMap<V> = BTreeMap<AdvisorType, V>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn resource_bundle_get_set_roundtrip() {
        let mut bundle = ResourceBundle::zero();
        bundle.set(ResourceKind::Gold, dec!(42));
        assert_eq!(bundle.get(ResourceKind::Gold), dec!(42));
        assert_eq!(bundle.get(ResourceKind::Food), Decimal::ZERO);
    }

    #[test]
    fn resource_bundle_add_accumulates() {
        let mut bundle = ResourceBundle::zero();
        bundle.add(ResourceKind::Science, dec!(5));
        bundle.add(ResourceKind::Science, dec!(3));
        assert_eq!(bundle.get(ResourceKind::Science), dec!(8));
    }

    #[test]
    fn advisor_loyalty_clamps() {
        let mut advisor = Advisor::new(AdvisorType::General);
        advisor.adjust_loyalty(-1000);
        assert_eq!(advisor.loyalty, 0);
        advisor.adjust_loyalty(1000);
        assert_eq!(advisor.loyalty, 100);
    }

    #[test]
    fn diplomacy_entry_matches_either_order() {
        let a = UserId::from("a");
        let b = UserId::from("b");
        let entry = DiplomacyEntry {
            player_a: a.clone(),
            player_b: b.clone(),
            status: DiplomacyStatus::War,
        };
        assert!(entry.matches(&a, &b));
        assert!(entry.matches(&b, &a));
        assert!(!entry.matches(&a, &UserId::from("c")));
    }

    #[test]
    fn speed_interval_ms_is_500_divided_by_speed() {
        assert_eq!(GameSpeed::Half.interval_ms(), 1000);
        assert_eq!(GameSpeed::Normal.interval_ms(), 500);
        assert_eq!(GameSpeed::Double.interval_ms(), 250);
        assert_eq!(GameSpeed::Triple.interval_ms(), 166);
    }
}
