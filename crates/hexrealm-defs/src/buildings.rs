//! Building definitions: per-tick resource income and the production
//! cost to construct (§4.E.1, §6 `constructBuilding`).

use std::sync::LazyLock;

use hexrealm_types::ResourceBundle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Static definition of a constructible building.
#[derive(Debug, Clone)]
pub struct BuildingDef {
    /// Stable identifier, e.g. `"granary"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flat per-tick resource income this building contributes while
    /// standing (§4.E.1).
    pub income: ResourceBundle,
    /// Production cost to construct.
    pub production_cost: Decimal,
    /// Minimum settlement tier required to build this (§4.E.5).
    pub min_tier_ordinal: u8,
}

static BUILDING_DEFS: LazyLock<Vec<BuildingDef>> = LazyLock::new(|| {
    vec![
        BuildingDef {
            id: "granary".to_owned(),
            name: "Granary".to_owned(),
            income: ResourceBundle {
                food: dec!(5),
                ..ResourceBundle::zero()
            },
            production_cost: dec!(40),
            min_tier_ordinal: 0,
        },
        BuildingDef {
            id: "workshop".to_owned(),
            name: "Workshop".to_owned(),
            income: ResourceBundle {
                production: dec!(5),
                ..ResourceBundle::zero()
            },
            production_cost: dec!(40),
            min_tier_ordinal: 0,
        },
        BuildingDef {
            id: "market".to_owned(),
            name: "Market".to_owned(),
            income: ResourceBundle {
                gold: dec!(5),
                ..ResourceBundle::zero()
            },
            production_cost: dec!(50),
            min_tier_ordinal: 1,
        },
        BuildingDef {
            id: "library".to_owned(),
            name: "Library".to_owned(),
            income: ResourceBundle {
                science: dec!(5),
                ..ResourceBundle::zero()
            },
            production_cost: dec!(50),
            min_tier_ordinal: 1,
        },
        BuildingDef {
            id: "amphitheater".to_owned(),
            name: "Amphitheater".to_owned(),
            income: ResourceBundle {
                culture: dec!(5),
                ..ResourceBundle::zero()
            },
            production_cost: dec!(50),
            min_tier_ordinal: 1,
        },
        BuildingDef {
            id: "barracks".to_owned(),
            name: "Barracks".to_owned(),
            income: ResourceBundle::zero(),
            production_cost: dec!(60),
            min_tier_ordinal: 1,
        },
    ]
});

/// Look up a building definition by id.
#[must_use]
pub fn building_def(id: &str) -> Option<&'static BuildingDef> {
    BUILDING_DEFS.iter().find(|def| def.id == id)
}

/// All building ids gated to at most `tier_ordinal` (§4.E.5 construction
/// eligibility).
#[must_use]
pub fn buildings_available_at_tier(tier_ordinal: u8) -> Vec<&'static BuildingDef> {
    BUILDING_DEFS
        .iter()
        .filter(|def| def.min_tier_ordinal <= tier_ordinal)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granary_yields_food_income() {
        let granary = building_def("granary").unwrap_or_else(|| panic!("granary must be a known building"));
        assert_eq!(granary.income.food, dec!(5));
    }

    #[test]
    fn unknown_building_is_none() {
        assert!(building_def("nonexistent").is_none());
    }

    #[test]
    fn tier_zero_excludes_market() {
        let available = buildings_available_at_tier(0);
        assert!(!available.iter().any(|def| def.id == "market"));
    }

    #[test]
    fn tier_one_includes_market() {
        let available = buildings_available_at_tier(1);
        assert!(available.iter().any(|def| def.id == "market"));
    }
}
