//! Law tree definitions and the branch-gated availability query
//! (§4.A, §4.E.7 `getAvailableLaws`).

use std::sync::LazyLock;

use hexrealm_types::{AdvisorType, LawEffectKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DefsError;

/// Which policy branch a law belongs to. Each advisor cares about a
/// subset of branches when casting a vote (§4.E.7 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LawBranch {
    /// `General` cares about army-size effects here.
    Military,
    /// `Treasurer` cares about gold effects here.
    Economy,
    /// `Priest` cares about culture-income effects here.
    Society,
    /// `Scholar` opposes science-reducing laws regardless of branch.
    Science,
}

/// A single recorded effect a law has when passed (§4.E.7 step 4).
#[derive(Debug, Clone, Copy)]
pub struct LawEffect {
    /// Category of effect.
    pub kind: LawEffectKind,
    /// Which advisor this affects, for [`LawEffectKind::LoyaltyChange`].
    pub advisor: Option<AdvisorType>,
    /// Signed magnitude; interpretation depends on `kind`.
    pub value: i32,
}

/// A proposable law.
#[derive(Debug, Clone)]
pub struct LawDef {
    /// Stable identifier, e.g. `"conscription"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Policy branch, used for advisor voting (§4.E.7 step 3).
    pub branch: LawBranch,
    /// Culture cost to propose (§6 `proposeLaw`).
    pub culture_cost: Decimal,
    /// Effects applied when the law passes.
    pub effects: Vec<LawEffect>,
    /// If set, only players of this faction may propose this law.
    pub faction_only: Option<String>,
}

static LAW_DEFS: LazyLock<Vec<LawDef>> = LazyLock::new(|| {
    vec![
        LawDef {
            id: "conscription".to_owned(),
            name: "Conscription".to_owned(),
            branch: LawBranch::Military,
            culture_cost: dec!(40),
            effects: vec![LawEffect {
                kind: LawEffectKind::LoyaltyChange,
                advisor: Some(AdvisorType::General),
                value: 10,
            }],
            faction_only: None,
        },
        LawDef {
            id: "trade_charter".to_owned(),
            name: "Trade Charter".to_owned(),
            branch: LawBranch::Economy,
            culture_cost: dec!(30),
            effects: vec![LawEffect {
                kind: LawEffectKind::LoyaltyChange,
                advisor: Some(AdvisorType::Treasurer),
                value: 10,
            }],
            faction_only: None,
        },
        LawDef {
            id: "public_festivals".to_owned(),
            name: "Public Festivals".to_owned(),
            branch: LawBranch::Society,
            culture_cost: dec!(30),
            effects: vec![LawEffect {
                kind: LawEffectKind::LoyaltyChange,
                advisor: Some(AdvisorType::Priest),
                value: 10,
            }],
            faction_only: None,
        },
        LawDef {
            id: "peace_accord".to_owned(),
            name: "Peace Accord".to_owned(),
            branch: LawBranch::Economy,
            culture_cost: dec!(50),
            effects: vec![LawEffect {
                kind: LawEffectKind::DiplomacyChange,
                advisor: None,
                value: 0,
            }],
            faction_only: None,
        },
        LawDef {
            id: "sun_tithe".to_owned(),
            name: "Sun Tithe".to_owned(),
            branch: LawBranch::Society,
            culture_cost: dec!(35),
            effects: vec![LawEffect {
                kind: LawEffectKind::LoyaltyChange,
                advisor: Some(AdvisorType::Priest),
                value: 15,
            }],
            faction_only: Some("solari".to_owned()),
        },
        LawDef {
            id: "taxation".to_owned(),
            name: "Taxation".to_owned(),
            branch: LawBranch::Economy,
            culture_cost: dec!(50),
            effects: vec![LawEffect {
                kind: LawEffectKind::ResourceModifier,
                advisor: None,
                value: 10,
            }],
            faction_only: None,
        },
    ]
});

/// Look up a law by id.
///
/// # Errors
///
/// Returns [`DefsError::UnknownLaw`] if no law matches.
pub fn law(id: &str) -> Result<&'static LawDef, DefsError> {
    LAW_DEFS.iter().find(|law| law.id == id).ok_or_else(|| DefsError::UnknownLaw(id.to_owned()))
}

/// Laws a player of `faction` may currently propose (§4.A
/// `getAvailableLaws`): not already present in `passed_laws` (laws may
/// only be proposed once per game), and no `faction_only` or it
/// matches `faction`. Unlike `getAvailableTechs`, there is no
/// epoch-gating.
#[must_use]
pub fn available_laws(passed_laws: &[String], faction: &str) -> Vec<&'static LawDef> {
    LAW_DEFS
        .iter()
        .filter(|def| !passed_laws.iter().any(|id| id == &def.id))
        .filter(|def| def.faction_only.as_deref().is_none_or(|only| only == faction))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_laws_excludes_already_passed() {
        let passed = vec!["conscription".to_owned()];
        let available = available_laws(&passed, "solari");
        assert!(!available.iter().any(|def| def.id == "conscription"));
    }

    #[test]
    fn faction_branch_law_hidden_from_other_factions() {
        let available = available_laws(&[], "kesh");
        assert!(!available.iter().any(|def| def.id == "sun_tithe"));
    }

    #[test]
    fn faction_branch_law_visible_to_owning_faction() {
        let available = available_laws(&[], "solari");
        assert!(available.iter().any(|def| def.id == "sun_tithe"));
    }

    #[test]
    fn unknown_law_fails() {
        assert_eq!(law("nonexistent"), Err(DefsError::UnknownLaw("nonexistent".to_owned())));
    }

    #[test]
    fn conscription_raises_general_loyalty() {
        let def = law("conscription").unwrap_or_else(|error| panic!("conscription must resolve: {error}"));
        assert!(def.effects.iter().any(|effect| effect.advisor == Some(AdvisorType::General) && effect.value > 0));
    }
}
