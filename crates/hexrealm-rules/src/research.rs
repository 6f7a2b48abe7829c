//! Research system: starting a tech and accumulating science toward it
//! (§4.E.6, §6 `startResearch`).

use hexrealm_types::{GameEvent, UserId};

use hexrealm_world::GameState;

use crate::error::RulesError;

/// `startResearch` (§6): the tech must be currently available to the
/// player's faction, and replaces any in-progress research (progress
/// toward the abandoned tech is discarded).
///
/// # Errors
///
/// Returns [`RulesError::PlayerNotFound`] or [`RulesError::TechUnavailable`].
pub fn start_research(state: &mut GameState, player_id: &UserId, tech_id: &str) -> Result<(), RulesError> {
    let player = state.player(player_id).ok_or_else(|| RulesError::PlayerNotFound(player_id.clone()))?;
    let available = hexrealm_defs::available_techs(&player.researched_techs, &player.faction_id);
    if !available.iter().any(|def| def.id == tech_id) {
        return Err(RulesError::TechUnavailable(tech_id.to_owned()));
    }

    if let Some(player) = state.player_mut(player_id) {
        player.current_research = Some(tech_id.to_owned());
        player.research_progress = rust_decimal::Decimal::ZERO;
    }
    Ok(())
}

/// `tickResearch` (§4.E.6): every non-eliminated player with an
/// in-progress tech accumulates this tick's science income toward it;
/// once `research_progress >= science_cost`, the tech completes,
/// moves into `researched_techs`, and research clears. Emits
/// [`GameEvent::TechResearched`] on completion.
pub fn tick_research(state: &mut GameState) -> Vec<GameEvent> {
    let player_ids: Vec<UserId> = state.players.iter().filter(|player| !player.eliminated).map(|player| player.user_id.clone()).collect();

    let mut events = Vec::new();
    for player_id in player_ids {
        let Some(player) = state.player(&player_id) else { continue };
        let Some(tech_id) = player.current_research.clone() else { continue };
        let Ok(def) = hexrealm_defs::tech(&tech_id) else { continue };

        let progress = player.research_progress + player.resource_income.science;
        if progress >= def.science_cost {
            if let Some(player) = state.player_mut(&player_id) {
                player.researched_techs.push(tech_id.clone());
                player.current_research = None;
                player.research_progress = rust_decimal::Decimal::ZERO;
            }
            events.push(GameEvent::TechResearched {
                tech_id,
                player_id,
            });
        } else if let Some(player) = state.player_mut(&player_id) {
            player.research_progress = progress;
        }
    }
    events
}
