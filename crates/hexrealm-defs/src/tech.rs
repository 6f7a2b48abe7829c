//! Technology tree definitions and the epoch-gating availability query
//! (§4.A, §4.E.6 `getAvailableTechs`).

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DefsError;

/// A single researchable technology.
#[derive(Debug, Clone)]
pub struct TechDef {
    /// Stable identifier, e.g. `"agriculture"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Epoch this tech belongs to. Epoch-0 and epoch-1 techs gate only
    /// on `requires`; epoch ≥ 2 techs additionally require that at
    /// least three **common** (non-faction-locked) techs of the
    /// immediately previous epoch are researched (§4.A).
    pub epoch: u32,
    /// Science cost to complete (§4.E.6 `researchProgress` threshold).
    pub science_cost: Decimal,
    /// Ids of prerequisite techs.
    pub requires: Vec<String>,
    /// If set, only players of this faction may research this tech.
    /// Faction-branch techs always carry epoch 0 and are exempt from
    /// epoch-gating (§4.A).
    pub faction_only: Option<String>,
}

static TECH_DEFS: LazyLock<Vec<TechDef>> = LazyLock::new(|| {
    vec![
        TechDef {
            id: "agriculture".to_owned(),
            name: "Agriculture".to_owned(),
            epoch: 0,
            science_cost: dec!(30),
            requires: vec![],
            faction_only: None,
        },
        TechDef {
            id: "masonry".to_owned(),
            name: "Masonry".to_owned(),
            epoch: 0,
            science_cost: dec!(30),
            requires: vec![],
            faction_only: None,
        },
        TechDef {
            id: "pottery".to_owned(),
            name: "Pottery".to_owned(),
            epoch: 0,
            science_cost: dec!(30),
            requires: vec![],
            faction_only: None,
        },
        TechDef {
            id: "mining".to_owned(),
            name: "Mining".to_owned(),
            epoch: 0,
            science_cost: dec!(30),
            requires: vec![],
            faction_only: None,
        },
        TechDef {
            id: "solar_rites".to_owned(),
            name: "Solar Rites".to_owned(),
            epoch: 0,
            science_cost: dec!(30),
            requires: vec![],
            faction_only: Some("solari".to_owned()),
        },
        TechDef {
            id: "bronze_working".to_owned(),
            name: "Bronze Working".to_owned(),
            epoch: 1,
            science_cost: dec!(60),
            requires: vec!["masonry".to_owned(), "mining".to_owned()],
            faction_only: None,
        },
        TechDef {
            id: "irrigation".to_owned(),
            name: "Irrigation".to_owned(),
            epoch: 1,
            science_cost: dec!(60),
            requires: vec!["agriculture".to_owned()],
            faction_only: None,
        },
        TechDef {
            id: "sailing".to_owned(),
            name: "Sailing".to_owned(),
            epoch: 1,
            science_cost: dec!(60),
            requires: vec!["pottery".to_owned()],
            faction_only: None,
        },
        TechDef {
            id: "currency".to_owned(),
            name: "Currency".to_owned(),
            epoch: 2,
            science_cost: dec!(100),
            requires: vec!["bronze_working".to_owned()],
            faction_only: None,
        },
        TechDef {
            id: "writing".to_owned(),
            name: "Writing".to_owned(),
            epoch: 2,
            science_cost: dec!(100),
            requires: vec!["irrigation".to_owned()],
            faction_only: None,
        },
    ]
});

/// Look up a tech by id.
///
/// # Errors
///
/// Returns [`DefsError::UnknownTech`] if no tech matches.
pub fn tech(id: &str) -> Result<&'static TechDef, DefsError> {
    TECH_DEFS
        .iter()
        .find(|tech| tech.id == id)
        .ok_or_else(|| DefsError::UnknownTech(id.to_owned()))
}

/// All techs, in declaration order.
#[must_use]
pub fn all_techs() -> &'static [TechDef] {
    &TECH_DEFS
}

fn common_researched_in_epoch(researched: &[String], epoch: u32) -> usize {
    TECH_DEFS
        .iter()
        .filter(|def| def.epoch == epoch && def.faction_only.is_none())
        .filter(|def| researched.iter().any(|id| id == &def.id))
        .count()
}

/// Techs a player of `faction` may currently start researching
/// (§4.A `getAvailableTechs`):
///
/// - not already researched;
/// - no `faction_only`, or it matches `faction`;
/// - every `requires` entry is researched;
/// - epoch ≥ 2: at least three common techs of the immediately
///   previous epoch are researched (faction-branch techs are epoch 0
///   and exempt from this gate).
#[must_use]
pub fn available_techs(researched: &[String], faction: &str) -> Vec<&'static TechDef> {
    TECH_DEFS
        .iter()
        .filter(|def| !researched.iter().any(|id| id == &def.id))
        .filter(|def| def.faction_only.as_deref().is_none_or(|only| only == faction))
        .filter(|def| def.requires.iter().all(|req| researched.iter().any(|id| id == req)))
        .filter(|def| def.epoch < 2 || common_researched_in_epoch(researched, def.epoch - 1) >= 3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_zero_techs_have_no_prerequisites() {
        for def in all_techs() {
            if def.epoch == 0 {
                assert!(def.requires.is_empty());
            }
        }
    }

    #[test]
    fn available_techs_excludes_already_researched() {
        let researched = vec!["agriculture".to_owned()];
        let available = available_techs(&researched, "solari");
        assert!(!available.iter().any(|def| def.id == "agriculture"));
    }

    #[test]
    fn available_techs_requires_prerequisite() {
        let researched: Vec<String> = vec![];
        let available = available_techs(&researched, "solari");
        assert!(!available.iter().any(|def| def.id == "bronze_working"));
    }

    #[test]
    fn available_techs_unlocks_after_prerequisites_met() {
        let researched = vec!["masonry".to_owned(), "mining".to_owned()];
        let available = available_techs(&researched, "solari");
        assert!(available.iter().any(|def| def.id == "bronze_working"));
    }

    #[test]
    fn faction_branch_tech_hidden_from_other_factions() {
        let researched: Vec<String> = vec![];
        let available = available_techs(&researched, "kesh");
        assert!(!available.iter().any(|def| def.id == "solar_rites"));
    }

    #[test]
    fn faction_branch_tech_visible_to_owning_faction() {
        let researched: Vec<String> = vec![];
        let available = available_techs(&researched, "solari");
        assert!(available.iter().any(|def| def.id == "solar_rites"));
    }

    #[test]
    fn epoch_two_blocked_below_three_common_prior_epoch_techs() {
        let researched = vec!["masonry".to_owned(), "mining".to_owned(), "bronze_working".to_owned()];
        let available = available_techs(&researched, "solari");
        assert!(!available.iter().any(|def| def.id == "currency"));
    }

    #[test]
    fn epoch_two_unlocked_at_three_common_prior_epoch_techs() {
        let researched = vec![
            "agriculture".to_owned(),
            "masonry".to_owned(),
            "pottery".to_owned(),
            "mining".to_owned(),
            "bronze_working".to_owned(),
            "irrigation".to_owned(),
            "sailing".to_owned(),
        ];
        let available = available_techs(&researched, "solari");
        assert!(available.iter().any(|def| def.id == "currency"));
    }

    #[test]
    fn unknown_tech_fails() {
        assert_eq!(tech("nonexistent"), Err(DefsError::UnknownTech("nonexistent".to_owned())));
    }
}
