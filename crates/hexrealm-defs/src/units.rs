//! Unit type definitions: the stats assigned when a unit is bought or
//! spawned (§3 `Unit`, §6 `buyUnit`).

use std::sync::LazyLock;

use hexrealm_types::UnitType;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Static stat block for one unit archetype.
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    /// Which archetype this defines.
    pub unit_type: UnitType,
    /// Combat strength. Always 0 for `Settler` (§3 invariant 7).
    pub strength: u32,
    /// Starting and maximum hit points.
    pub max_hp: u32,
    /// Vision radius in hexes.
    pub vision_range: u32,
    /// Base movement speed, before road bonuses (§4.E.3).
    pub move_speed: u32,
    /// Food consumed per tick (§4.E.1 upkeep).
    pub food_upkeep: Decimal,
    /// Gold cost to buy via `buyUnit` (§6).
    pub gold_cost: Decimal,
    /// Production cost to buy via `buyUnit` (§6).
    pub production_cost: Decimal,
    /// `true` if a `barracks` building is required to buy this unit
    /// (§6 `buyUnit` — "barracks requirement for warrior").
    pub requires_barracks: bool,
}

static UNIT_DEFS: LazyLock<Vec<UnitDef>> = LazyLock::new(|| {
    vec![
        UnitDef {
            unit_type: UnitType::Scout,
            strength: 3,
            max_hp: 20,
            vision_range: 3,
            move_speed: 2,
            food_upkeep: dec!(1),
            gold_cost: dec!(20),
            production_cost: dec!(10),
            requires_barracks: false,
        },
        UnitDef {
            unit_type: UnitType::Gatherer,
            strength: 1,
            max_hp: 15,
            vision_range: 2,
            move_speed: 1,
            food_upkeep: dec!(1),
            gold_cost: dec!(15),
            production_cost: dec!(10),
            requires_barracks: false,
        },
        UnitDef {
            unit_type: UnitType::Warrior,
            strength: 10,
            max_hp: 30,
            vision_range: 2,
            move_speed: 1,
            food_upkeep: dec!(2),
            gold_cost: dec!(30),
            production_cost: dec!(20),
            requires_barracks: true,
        },
        UnitDef {
            unit_type: UnitType::Settler,
            strength: 0,
            max_hp: 20,
            vision_range: 1,
            move_speed: 1,
            food_upkeep: dec!(2),
            gold_cost: dec!(50),
            production_cost: dec!(40),
            requires_barracks: false,
        },
        UnitDef {
            unit_type: UnitType::Builder,
            strength: 1,
            max_hp: 15,
            vision_range: 1,
            move_speed: 1,
            food_upkeep: dec!(1),
            gold_cost: dec!(25),
            production_cost: dec!(20),
            requires_barracks: false,
        },
    ]
});

/// Look up a unit archetype's stat block. Every [`UnitType`] variant has
/// a definition, so this never fails.
#[must_use]
pub fn unit_def(unit_type: UnitType) -> &'static UnitDef {
    static FALLBACK: UnitDef = UnitDef {
        unit_type: UnitType::Settler,
        strength: 0,
        max_hp: 20,
        vision_range: 1,
        move_speed: 1,
        food_upkeep: Decimal::ONE,
        gold_cost: Decimal::ZERO,
        production_cost: Decimal::ZERO,
        requires_barracks: false,
    };
    UNIT_DEFS
        .iter()
        .find(|def| def.unit_type == unit_type)
        .unwrap_or(&FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settler_strength_is_zero() {
        assert_eq!(unit_def(UnitType::Settler).strength, 0);
    }

    #[test]
    fn warrior_requires_barracks() {
        assert!(unit_def(UnitType::Warrior).requires_barracks);
    }

    #[test]
    fn non_warrior_does_not_require_barracks() {
        assert!(!unit_def(UnitType::Scout).requires_barracks);
    }
}
