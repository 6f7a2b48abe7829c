//! Settlement tier definitions: the stats that scale as an outpost
//! grows into a settlement and then a city (§4.E.5).

use std::sync::LazyLock;

use hexrealm_types::SettlementTier;

/// Fixed 20-entry settlement name pool, cycled by index (§4.B step 3,
/// §4.E.5 `foundSettlement`). Shared by the initial capitals and every
/// settlement founded later so both draw from the same list.
pub const SETTLEMENT_NAME_POOL: [&str; 20] = [
    "Ashford", "Brightmoor", "Cragmere", "Dunwick", "Eastholt", "Fernley", "Greywatch", "Harrow",
    "Ivyreach", "Junipeer", "Kestrelhold", "Lowgarth", "Millstone", "Northwick", "Oakhaven",
    "Pinewatch", "Quarrow", "Ridgefall", "Stonebridge", "Thornwood",
];

/// Static stat block for one settlement tier.
#[derive(Debug, Clone, Copy)]
pub struct SettlementTierDef {
    /// Which tier this defines.
    pub tier: SettlementTier,
    /// Number of building slots available at this tier.
    pub building_slots: u32,
    /// Radius, in hexes, that gatherers stationed here may work.
    pub gather_radius: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Defense multiplier applied to attackers during combat (§4.E.4).
    pub defense: f64,
    /// Population required to advance past this tier, or `None` if this
    /// is the final tier.
    pub upgrade_population: Option<u32>,
}

static SETTLEMENT_TIER_DEFS: LazyLock<Vec<SettlementTierDef>> = LazyLock::new(|| {
    vec![
        SettlementTierDef {
            tier: SettlementTier::Outpost,
            building_slots: 2,
            gather_radius: 1,
            max_hp: 50,
            defense: 1.0,
            upgrade_population: Some(10),
        },
        SettlementTierDef {
            tier: SettlementTier::Settlement,
            building_slots: 4,
            gather_radius: 2,
            max_hp: 100,
            defense: 1.2,
            upgrade_population: Some(25),
        },
        SettlementTierDef {
            tier: SettlementTier::City,
            building_slots: 6,
            gather_radius: 3,
            max_hp: 200,
            defense: 1.5,
            upgrade_population: None,
        },
    ]
});

/// Look up a settlement tier's stat block. Every [`SettlementTier`]
/// variant has a definition, so this never fails.
#[must_use]
pub fn settlement_tier_def(tier: SettlementTier) -> &'static SettlementTierDef {
    static FALLBACK: SettlementTierDef = SettlementTierDef {
        tier: SettlementTier::Outpost,
        building_slots: 2,
        gather_radius: 1,
        max_hp: 50,
        defense: 1.0,
        upgrade_population: Some(10),
    };
    SETTLEMENT_TIER_DEFS
        .iter()
        .find(|def| def.tier == tier)
        .unwrap_or(&FALLBACK)
}

/// The tier immediately following `tier`, or `None` if already at the
/// highest tier (§4.E.5 tier-up).
#[must_use]
pub fn next_tier(tier: SettlementTier) -> Option<SettlementTier> {
    match tier {
        SettlementTier::Outpost => Some(SettlementTier::Settlement),
        SettlementTier::Settlement => Some(SettlementTier::City),
        SettlementTier::City => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_has_no_upgrade_population() {
        assert!(settlement_tier_def(SettlementTier::City).upgrade_population.is_none());
    }

    #[test]
    fn tiers_strictly_increase_building_slots() {
        let outpost = settlement_tier_def(SettlementTier::Outpost).building_slots;
        let settlement = settlement_tier_def(SettlementTier::Settlement).building_slots;
        let city = settlement_tier_def(SettlementTier::City).building_slots;
        assert!(outpost < settlement);
        assert!(settlement < city);
    }

    #[test]
    fn next_tier_chains_outpost_to_city() {
        assert_eq!(next_tier(SettlementTier::Outpost), Some(SettlementTier::Settlement));
        assert_eq!(next_tier(SettlementTier::Settlement), Some(SettlementTier::City));
        assert_eq!(next_tier(SettlementTier::City), None);
    }
}
