//! Faction definitions: per-resource income modifiers and AI tuning
//! (§4.A, §4.E.1 "multiply each resource by the faction's
//! `resourceModifiers`", §4.E.2 "threshold = 20 * faction.aiModifiers.safety").

use std::sync::LazyLock;

use hexrealm_types::{ResourceBundle, ResourceKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DefsError;

/// AI tuning knobs that scale per-faction behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiModifiers {
    /// Multiplier on the unit-AI safety threshold (§4.E.2).
    pub safety: u32,
}

/// A playable faction.
#[derive(Debug, Clone)]
pub struct FactionDef {
    /// Stable identifier, e.g. `"solari"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Per-resource income multiplier, applied in §4.E.1.
    pub resource_modifiers: ResourceBundle,
    /// AI tuning.
    pub ai_modifiers: AiModifiers,
}

fn modifiers(food: Decimal, production: Decimal, gold: Decimal, science: Decimal, culture: Decimal) -> ResourceBundle {
    ResourceBundle {
        food,
        production,
        gold,
        science,
        culture,
    }
}

static FACTIONS: LazyLock<Vec<FactionDef>> = LazyLock::new(|| {
    vec![
        FactionDef {
            id: "solari".to_owned(),
            name: "Solari Concord".to_owned(),
            resource_modifiers: modifiers(dec!(1.2), dec!(1.0), dec!(1.0), dec!(1.0), dec!(1.0)),
            ai_modifiers: AiModifiers { safety: 1 },
        },
        FactionDef {
            id: "ferrovane".to_owned(),
            name: "Ferrovane Union".to_owned(),
            resource_modifiers: modifiers(dec!(1.0), dec!(1.2), dec!(1.0), dec!(1.0), dec!(1.0)),
            ai_modifiers: AiModifiers { safety: 2 },
        },
        FactionDef {
            id: "kesh".to_owned(),
            name: "Kesh Hegemony".to_owned(),
            resource_modifiers: modifiers(dec!(1.0), dec!(1.0), dec!(1.2), dec!(1.0), dec!(1.0)),
            ai_modifiers: AiModifiers { safety: 1 },
        },
        FactionDef {
            id: "veyl".to_owned(),
            name: "Veyl Assembly".to_owned(),
            resource_modifiers: modifiers(dec!(1.0), dec!(1.0), dec!(1.0), dec!(1.2), dec!(1.0)),
            ai_modifiers: AiModifiers { safety: 1 },
        },
    ]
});

/// Look up a faction by id.
///
/// # Errors
///
/// Returns [`DefsError::UnknownFaction`] if no faction matches.
pub fn faction(id: &str) -> Result<&'static FactionDef, DefsError> {
    FACTIONS
        .iter()
        .find(|faction| faction.id == id)
        .ok_or_else(|| DefsError::UnknownFaction(id.to_owned()))
}

/// Apply a faction's per-resource income modifiers to a raw income bundle
/// (§4.E.1).
#[must_use]
pub fn apply_income_modifiers(raw: ResourceBundle, faction: &FactionDef) -> ResourceBundle {
    let mut out = ResourceBundle::zero();
    for kind in ResourceKind::ALL {
        out.set(kind, raw.get(kind) * faction.resource_modifiers.get(kind));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_faction_resolves() {
        assert!(faction("solari").is_ok());
    }

    #[test]
    fn unknown_faction_fails() {
        assert_eq!(
            faction("nonexistent"),
            Err(DefsError::UnknownFaction("nonexistent".to_owned()))
        );
    }

    #[test]
    fn income_modifiers_scale_each_resource_independently() {
        let solari = faction("solari").unwrap_or_else(|error| panic!("solari must resolve: {error}"));
        let raw = ResourceBundle {
            food: dec!(100),
            production: dec!(100),
            gold: dec!(100),
            science: dec!(100),
            culture: dec!(100),
        };
        let scaled = apply_income_modifiers(raw, solari);
        assert_eq!(scaled.food, dec!(120.0));
        assert_eq!(scaled.production, dec!(100.0));
    }
}
