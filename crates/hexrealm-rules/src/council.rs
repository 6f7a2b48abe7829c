//! Council / law system: proposal validation, advisor voting, effect
//! application, and per-tick loyalty drift (§4.E.7).

use hexrealm_defs::{LawBranch, LawEffect};
use hexrealm_types::{
    AdvisorType, DiplomacyStatus, GameEvent, ProposeLawOutcome, UnitType, UserId, Vote, VoteRecord,
};

use hexrealm_world::GameState;

use crate::error::RulesError;

const LOW_LOYALTY: u8 = 30;
const HIGH_LOYALTY: u8 = 70;

/// `proposeLaw` (§4.E.7): validates availability and culture cost,
/// deducts the cost regardless of outcome, tallies the five advisor
/// votes, and applies `loyalty_change`/`diplomacy_change` effects on a
/// pass (three or more yes votes).
///
/// # Errors
///
/// Returns [`RulesError::PlayerNotFound`] or [`RulesError::LawUnavailable`]
/// if the law is unknown, already passed, or faction-gated away, or
/// [`RulesError::InsufficientResources`] if culture is short.
pub fn propose_law(
    state: &mut GameState,
    player_id: &UserId,
    law_id: &str,
    target_player_id: Option<&UserId>,
) -> Result<(ProposeLawOutcome, Vec<GameEvent>), RulesError> {
    let player = state.player(player_id).ok_or_else(|| RulesError::PlayerNotFound(player_id.clone()))?;
    let available = hexrealm_defs::available_laws(&player.passed_laws, &player.faction_id);
    let def = available.iter().find(|def| def.id == law_id).copied().ok_or_else(|| RulesError::LawUnavailable(law_id.to_owned()))?.clone();

    if player.resources.culture < def.culture_cost {
        return Err(RulesError::InsufficientResources);
    }

    if let Some(player) = state.player_mut(player_id) {
        player.resources.culture -= def.culture_cost;
    }

    let votes = cast_votes(state, player_id, &def);
    let yes_count = votes.iter().filter(|record| record.vote == Vote::Yes).count();
    let passed = yes_count >= 3;

    let mut events = Vec::new();
    if passed {
        if let Some(player) = state.player_mut(player_id) {
            player.passed_laws.push(law_id.to_owned());
        }
        for effect in &def.effects {
            apply_effect(state, player_id, target_player_id, effect, &mut events);
        }
        events.push(GameEvent::LawPassed {
            law_id: law_id.to_owned(),
            player_id: player_id.clone(),
            votes: votes.clone(),
        });
    } else {
        events.push(GameEvent::LawRejected {
            law_id: law_id.to_owned(),
            player_id: player_id.clone(),
            votes: votes.clone(),
        });
    }

    Ok((
        ProposeLawOutcome {
            passed,
            votes,
            law_id: law_id.to_owned(),
        },
        events,
    ))
}

fn own_warrior_count(state: &GameState, player_id: &UserId) -> usize {
    state.units.values().filter(|unit| unit.owner.player() == Some(player_id) && unit.unit_type == UnitType::Warrior).count()
}

fn is_at_war(state: &GameState, player_id: &UserId) -> bool {
    state.diplomacy.iter().any(|entry| (&entry.player_a == player_id || &entry.player_b == player_id) && entry.status == DiplomacyStatus::War)
}

/// A law "reduces the science multiplier" if it carries a
/// `ResourceModifier` effect with a negative value; none of the
/// currently defined laws do, so the Scholar's first clause never
/// fires today, but the check stays general rather than hardcoded to
/// "no such law exists" (§4.E.7 step 3 Scholar rule).
fn reduces_science(def: &hexrealm_defs::LawDef) -> bool {
    def.effects.iter().any(|effect| effect.kind == hexrealm_types::LawEffectKind::ResourceModifier && effect.value < 0)
}

fn cast_votes(state: &GameState, player_id: &UserId, def: &hexrealm_defs::LawDef) -> Vec<VoteRecord> {
    let Some(player) = state.player(player_id) else {
        return Vec::new();
    };
    let army = own_warrior_count(state, player_id);
    let at_war = is_at_war(state, player_id);
    let reduces_sci = reduces_science(def);

    AdvisorType::ALL
        .into_iter()
        .map(|advisor_type| {
            let loyalty = player.advisors.iter().find(|advisor| advisor.advisor_type == advisor_type).map_or(50, |advisor| advisor.loyalty);
            let (vote, reason) = match advisor_type {
                AdvisorType::General => general_vote(def.branch, army, loyalty),
                AdvisorType::Treasurer => treasurer_vote(def.branch, player.resources.gold, loyalty),
                AdvisorType::Priest => priest_vote(def.branch, player.resource_income.culture, loyalty),
                AdvisorType::Scholar => scholar_vote(reduces_sci, loyalty),
                AdvisorType::Tribune => tribune_vote(player.resources.food, at_war, loyalty),
            };
            VoteRecord {
                advisor: advisor_type,
                vote,
                reason: reason.to_owned(),
            }
        })
        .collect()
}

fn general_vote(branch: LawBranch, army: usize, loyalty: u8) -> (Vote, &'static str) {
    if loyalty < LOW_LOYALTY {
        (Vote::No, "loyalty too low to back any proposal")
    } else if loyalty >= HIGH_LOYALTY {
        (Vote::Yes, "high loyalty backs the crown regardless")
    } else if branch == LawBranch::Military {
        if army >= 3 {
            (Vote::Yes, "a strong standing army backs this")
        } else {
            (Vote::No, "the army is too weak for this")
        }
    } else {
        (Vote::Yes, "no objection to a non-military law")
    }
}

fn treasurer_vote(branch: LawBranch, gold: rust_decimal::Decimal, loyalty: u8) -> (Vote, &'static str) {
    if loyalty < LOW_LOYALTY {
        (Vote::No, "loyalty too low to back any proposal")
    } else if gold <= rust_decimal::Decimal::ZERO {
        (Vote::No, "the treasury cannot absorb this")
    } else if branch == LawBranch::Economy {
        (Vote::Yes, "an economy law with gold to spare")
    } else {
        (Vote::Yes, "gold is available")
    }
}

fn priest_vote(branch: LawBranch, culture_income: rust_decimal::Decimal, loyalty: u8) -> (Vote, &'static str) {
    let culture_positive = culture_income > rust_decimal::Decimal::ZERO;
    if branch == LawBranch::Society && culture_positive {
        (Vote::Yes, "a society law with culture flowing")
    } else if branch == LawBranch::Military {
        (Vote::No, "a military law has no bearing on faith")
    } else if loyalty < LOW_LOYALTY {
        (Vote::No, "loyalty too low to back any proposal")
    } else if culture_positive {
        (Vote::Yes, "culture income remains positive")
    } else {
        (Vote::No, "culture income is not positive")
    }
}

fn scholar_vote(reduces_science: bool, loyalty: u8) -> (Vote, &'static str) {
    if reduces_science && loyalty < 90 {
        (Vote::No, "this would weaken research")
    } else if loyalty < LOW_LOYALTY {
        (Vote::No, "loyalty too low to back any proposal")
    } else {
        (Vote::Yes, "no threat to research")
    }
}

fn tribune_vote(food: rust_decimal::Decimal, at_war: bool, loyalty: u8) -> (Vote, &'static str) {
    if food <= rust_decimal::Decimal::ZERO {
        (Vote::No, "the granaries are empty")
    } else if at_war && loyalty < HIGH_LOYALTY {
        (Vote::No, "the people distrust new laws in wartime")
    } else if loyalty < LOW_LOYALTY {
        (Vote::No, "loyalty too low to back any proposal")
    } else {
        (Vote::Yes, "the people have no objection")
    }
}

fn apply_effect(state: &mut GameState, player_id: &UserId, target_player_id: Option<&UserId>, effect: &LawEffect, events: &mut Vec<GameEvent>) {
    match effect.kind {
        hexrealm_types::LawEffectKind::LoyaltyChange => {
            let Some(player) = state.player_mut(player_id) else { return };
            #[allow(clippy::cast_possible_truncation)]
            let delta = effect.value as i16;
            match effect.advisor {
                Some(advisor_type) => {
                    if let Some(advisor) = player.advisors.iter_mut().find(|advisor| advisor.advisor_type == advisor_type) {
                        advisor.adjust_loyalty(delta);
                    }
                }
                None => {
                    for advisor in &mut player.advisors {
                        advisor.adjust_loyalty(delta);
                    }
                }
            }
        }
        hexrealm_types::LawEffectKind::DiplomacyChange => {
            let Some(target) = target_player_id else { return };
            let Some(new_status) = diplomacy_status_from_value(effect.value) else { return };
            let Some(entry) = state.diplomacy.iter_mut().find(|entry| entry.matches(player_id, target)) else { return };
            entry.status = new_status;
            match new_status {
                DiplomacyStatus::War => events.push(GameEvent::WarDeclared {
                    player_a: player_id.clone(),
                    player_b: target.clone(),
                }),
                DiplomacyStatus::Peace => events.push(GameEvent::PeaceDeclared {
                    player_a: player_id.clone(),
                    player_b: target.clone(),
                }),
                DiplomacyStatus::Tension => {}
            }
        }
        hexrealm_types::LawEffectKind::ResourceModifier
        | hexrealm_types::LawEffectKind::UnitModifier
        | hexrealm_types::LawEffectKind::SettlementModifier
        | hexrealm_types::LawEffectKind::Special => {
            // Recorded by presence in `passed_laws` only; no consumer in this version (§9).
        }
    }
}

fn diplomacy_status_from_value(value: i32) -> Option<DiplomacyStatus> {
    match value {
        0 => Some(DiplomacyStatus::Peace),
        1 => Some(DiplomacyStatus::Tension),
        2 => Some(DiplomacyStatus::War),
        _ => None,
    }
}

/// `tickAdvisorLoyalty` (§4.E.7): per non-eliminated player, each
/// advisor drifts ±1 toward its domain condition. Emits no events.
pub fn tick_advisor_loyalty(state: &mut GameState) -> Vec<GameEvent> {
    let player_ids: Vec<UserId> = state.players.iter().filter(|player| !player.eliminated).map(|player| player.user_id.clone()).collect();

    for player_id in player_ids {
        let army = own_warrior_count(state, &player_id);
        let Some(player) = state.player_mut(&player_id) else { continue };
        let gold_positive = player.resources.gold > rust_decimal::Decimal::ZERO;
        let culture_income_positive = player.resource_income.culture > rust_decimal::Decimal::ZERO;
        let researching = player.current_research.is_some();
        let food_positive = player.resources.food > rust_decimal::Decimal::ZERO;

        for advisor in &mut player.advisors {
            let favourable = match advisor.advisor_type {
                AdvisorType::General => army >= 3,
                AdvisorType::Treasurer => gold_positive,
                AdvisorType::Priest => culture_income_positive,
                AdvisorType::Scholar => researching,
                AdvisorType::Tribune => food_positive,
            };
            advisor.adjust_loyalty(if favourable { 1 } else { -1 });
        }
    }

    Vec::new()
}
