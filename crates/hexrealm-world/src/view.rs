//! Fog-filtered per-player view construction (§4.B `getPlayerView`).

use hexrealm_types::{ClientPlayerState, UserId, VisibleSettlement, VisibleUnit};

use crate::error::WorldError;
use crate::state::GameState;

/// Build the fog-filtered view a subscriber receives each tick (§4.B
/// `getPlayerView`): own entities always visible; enemy entities visible
/// only on a tile whose `fogMap` value is `2` (visible).
///
/// # Errors
///
/// Returns [`WorldError::PlayerNotFound`] if `user_id` is not a player
/// of this game.
pub fn get_player_view(state: &GameState, user_id: &UserId) -> Result<ClientPlayerState, WorldError> {
    let player = state.player(user_id).ok_or_else(|| WorldError::PlayerNotFound(user_id.clone()))?;

    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let is_visible_tile = |q: i32, r: i32| {
        hexrealm_geometry::Axial::new(q, r)
            .flat_index(width, height)
            .and_then(|index| player.fog_map.get(index))
            .is_some_and(|&value| value == 2)
    };

    let visible_settlements = state
        .settlements
        .values()
        .filter(|settlement| &settlement.owner_id == user_id || is_visible_tile(settlement.q, settlement.r))
        .map(|settlement| VisibleSettlement {
            id: settlement.id,
            owner_id: settlement.owner_id.clone(),
            name: settlement.name.clone(),
            tier: settlement.tier,
            q: settlement.q,
            r: settlement.r,
            is_capital: settlement.is_capital,
            hp: settlement.hp,
            max_hp: settlement.max_hp,
        })
        .collect();

    let visible_units = state
        .all_units()
        .filter(|unit| unit.owner.player() == Some(user_id) || is_visible_tile(unit.q, unit.r))
        .map(|unit| VisibleUnit {
            id: unit.id,
            unit_type: unit.unit_type,
            owner_id: owner_label(unit),
            q: unit.q,
            r: unit.r,
            hp: unit.hp,
            state: unit.state,
        })
        .collect();

    Ok(ClientPlayerState {
        tick: state.tick,
        paused: state.paused,
        speed: state.speed,
        faction_id: player.faction_id.clone(),
        resources: player.resources,
        resource_income: player.resource_income,
        resource_upkeep: player.resource_upkeep,
        advisors: player.advisors,
        researched_techs: player.researched_techs.clone(),
        current_research: player.current_research.clone(),
        research_progress: player.research_progress,
        passed_laws: player.passed_laws.clone(),
        policies: player.policies,
        diplomacy: state.diplomacy.clone(),
        visible_settlements,
        visible_units,
        fog_map: player.fog_map.clone(),
    })
}

fn owner_label(unit: &crate::state::Unit) -> String {
    match &unit.owner {
        hexrealm_types::UnitOwner::Player(user_id) => user_id.to_string(),
        hexrealm_types::UnitOwner::Neutral(neutral) => neutral.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, Terrain};

    use super::*;
    use crate::construction::create;

    fn one_player_config() -> GameConfig {
        let width = 20;
        let height = 20;
        GameConfig {
            game_id: GameId::from("game-1"),
            map_width: width,
            map_height: height,
            terrain: vec![Terrain::Plains as u8; (width * height) as usize],
            elevation: vec![50u8; (width * height) as usize],
            players: vec![PlayerConfig {
                user_id: UserId::from("p0"),
                faction_id: "solari".to_owned(),
            }],
            speed: GameSpeed::Normal,
        }
    }

    #[test]
    fn view_of_unknown_player_fails() {
        let state = create(one_player_config()).unwrap_or_else(|error| panic!("test fixture construction must succeed: {error}"));
        assert!(get_player_view(&state, &UserId::from("ghost")).is_err());
    }

    #[test]
    fn view_includes_own_capital_and_fog_of_matching_length() {
        let state = create(one_player_config()).unwrap_or_else(|error| panic!("test fixture construction must succeed: {error}"));
        let view = get_player_view(&state, &UserId::from("p0")).unwrap_or_else(|error| panic!("player view must resolve: {error}"));
        assert_eq!(view.fog_map.len(), 400);
        assert_eq!(view.visible_settlements.len(), 1);
        assert!(view.visible_settlements.first().is_some_and(|settlement| settlement.is_capital));
        assert!(view.fog_map.iter().any(|&value| value > 0));
    }
}
