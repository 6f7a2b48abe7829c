//! Resource system: per-tick income, upkeep, and the food-crisis effect
//! (§4.E.1).

use hexrealm_types::{GameEvent, ResourceKind, UserId};
use rust_decimal::Decimal;

use hexrealm_world::GameState;

/// Run the resource system for one tick (§4.E.1). Emits no events.
pub fn tick_resources(state: &mut GameState) -> Vec<GameEvent> {
    let player_ids: Vec<UserId> = state
        .players
        .iter()
        .filter(|player| !player.eliminated)
        .map(|player| player.user_id.clone())
        .collect();

    for user_id in &player_ids {
        let raw_income = settlement_income(state, user_id);
        let upkeep = unit_upkeep(state, user_id);
        let income = apply_faction_modifiers(state, user_id, raw_income);

        if let Some(player) = state.player_mut(user_id) {
            player.resource_income = income;
            player.resource_upkeep = upkeep;
            for kind in ResourceKind::ALL {
                let delta = income.get(kind) - upkeep.get(kind);
                player.resources.add(kind, delta);
            }
        }

        apply_food_crisis(state, user_id);
    }

    Vec::new()
}

fn settlement_income(state: &GameState, owner_id: &UserId) -> hexrealm_types::ResourceBundle {
    let mut raw = hexrealm_types::ResourceBundle::zero();
    for settlement in state.settlements.values().filter(|settlement| &settlement.owner_id == owner_id) {
        for building_id in &settlement.buildings {
            if let Some(def) = hexrealm_defs::building_def(building_id) {
                for kind in ResourceKind::ALL {
                    raw.add(kind, def.income.get(kind));
                }
            }
        }
    }
    raw
}

fn unit_upkeep(state: &GameState, owner_id: &UserId) -> hexrealm_types::ResourceBundle {
    let mut upkeep = hexrealm_types::ResourceBundle::zero();
    for unit in state.units.values().filter(|unit| unit.owner.player() == Some(owner_id)) {
        let def = hexrealm_defs::unit_def(unit.unit_type);
        upkeep.add(ResourceKind::Food, def.food_upkeep);
    }
    upkeep
}

fn apply_faction_modifiers(
    state: &GameState,
    user_id: &UserId,
    raw_income: hexrealm_types::ResourceBundle,
) -> hexrealm_types::ResourceBundle {
    state
        .player(user_id)
        .and_then(|player| hexrealm_defs::faction(&player.faction_id).ok())
        .map_or(raw_income, |faction| hexrealm_defs::apply_income_modifiers(raw_income, faction))
}

/// If the player's food went negative this tick, every own unit's
/// `moveSpeed` drops by one, floored at `1` (§4.E.1 "Crisis effects").
fn apply_food_crisis(state: &mut GameState, user_id: &UserId) {
    let in_crisis = state.player(user_id).is_some_and(|player| player.resources.food < Decimal::ZERO);
    if !in_crisis {
        return;
    }
    for unit in state.units.values_mut().filter(|unit| unit.owner.player() == Some(user_id)) {
        unit.move_speed = unit.move_speed.saturating_sub(1).max(1);
    }
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, Terrain, UnitOwner, UnitType};
    use hexrealm_world::{create, Unit};
    use rust_decimal_macros::dec;

    use super::*;

    fn one_player_state() -> GameState {
        let width = 10;
        let height = 10;
        let config = GameConfig {
            game_id: GameId::from("g"),
            map_width: width,
            map_height: height,
            terrain: vec![Terrain::Plains as u8; (width * height) as usize],
            elevation: vec![50u8; (width * height) as usize],
            players: vec![PlayerConfig {
                user_id: UserId::from("p0"),
                faction_id: "solari".to_owned(),
            }],
            speed: GameSpeed::Normal,
        };
        create(config).unwrap_or_else(|_| {
            panic!("test fixture construction must succeed");
        })
    }

    #[test]
    fn income_from_buildings_is_scaled_by_faction_modifier() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        if let Some(settlement) = state.settlements.get_mut(&settlement_id) {
            settlement.buildings.push("granary".to_owned());
        }
        tick_resources(&mut state);
        let player = state.player(&UserId::from("p0")).unwrap_or_else(|| panic!("p0 must exist"));
        // granary yields 5 food; solari multiplies food by 1.2.
        assert_eq!(player.resource_income.food, dec!(6.0));
    }

    #[test]
    fn unit_upkeep_reduces_food() {
        let mut state = one_player_state();
        let id = state.next_unit_id();
        let unit = Unit::from_def(id, UnitType::Warrior, UnitOwner::Player(UserId::from("p0")), 5, 5);
        state.units.insert(id, unit);
        let before = state.player(&UserId::from("p0")).map(|player| player.resources.food);
        tick_resources(&mut state);
        let after = state.player(&UserId::from("p0")).map(|player| player.resources.food);
        assert!(after < before);
    }

    #[test]
    fn negative_food_reduces_move_speed_but_not_below_one() {
        let mut state = one_player_state();
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.food = dec!(-2);
        }
        let id = state.next_unit_id();
        let mut unit = Unit::from_def(id, UnitType::Scout, UnitOwner::Player(UserId::from("p0")), 5, 5);
        unit.move_speed = 1;
        state.units.insert(id, unit);
        tick_resources(&mut state);
        let unit = state.units.get(&id).unwrap_or_else(|| panic!("unit must still exist"));
        assert_eq!(unit.move_speed, 1);
    }
}
