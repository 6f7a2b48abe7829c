//! Fog system: demote-then-reveal visibility recompute, once per tick
//! (§4.E.8).

use hexrealm_geometry::Axial;
use hexrealm_types::GameEvent;

use hexrealm_world::GameState;

/// Run the fog system for one tick (§4.E.8): every previously-visible
/// tile demotes to explored, then every own unit's vision and every own
/// settlement's gather radius re-promotes its disc to visible. Emits no
/// events.
pub fn tick_fog(state: &mut GameState) -> Vec<GameEvent> {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let player_ids: Vec<hexrealm_types::UserId> =
        state.players.iter().filter(|player| !player.eliminated).map(|player| player.user_id.clone()).collect();

    for player_id in player_ids {
        let discs = visibility_discs(state, &player_id, width, height);

        let Some(player) = state.player_mut(&player_id) else { continue };
        for slot in &mut player.fog_map {
            if *slot == 2 {
                *slot = 1;
            }
        }
        for tile in discs {
            if let Some(index) = tile.flat_index(width, height) {
                if let Some(slot) = player.fog_map.get_mut(index) {
                    *slot = 2;
                }
            }
        }
    }

    Vec::new()
}

/// Every tile within vision of an own unit, or gather radius of an own
/// settlement, for `player_id` (§4.E.8 "promote every tile within
/// Euclidean disc of that radius").
fn visibility_discs(state: &GameState, player_id: &hexrealm_types::UserId, width: i32, height: i32) -> Vec<Axial> {
    let mut tiles = Vec::new();
    for unit in state.units.values().filter(|unit| unit.owner.player() == Some(player_id)) {
        tiles.extend(unit.position().euclidean_disc(f64::from(unit.vision_range), width, height));
    }
    for settlement in state.settlements.values().filter(|settlement| &settlement.owner_id == player_id) {
        tiles.extend(settlement.position().euclidean_disc(f64::from(settlement.gather_radius), width, height));
    }
    tiles
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, Terrain, UnitOwner, UnitType, UserId};
    use hexrealm_world::{create, Unit};

    use super::*;

    fn one_player_state() -> GameState {
        let width = 20;
        let height = 20;
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
        create(config).unwrap_or_else(|_| panic!("test fixture construction must succeed"))
    }

    #[test]
    fn previously_visible_tile_outside_any_vision_demotes_to_explored() {
        let mut state = one_player_state();
        let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
        let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
        let far = Axial::new(0, 0);
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            if let Some(index) = far.flat_index(width, height) {
                if let Some(slot) = player.fog_map.get_mut(index) {
                    *slot = 2;
                }
            }
        }
        tick_fog(&mut state);
        let player = state.player(&UserId::from("p0")).unwrap_or_else(|| panic!("p0 must exist"));
        let index = far.flat_index(width, height).unwrap_or_else(|| panic!("far tile must be in bounds"));
        assert_eq!(player.fog_map.get(index), Some(&1));
    }

    #[test]
    fn tile_within_unit_vision_is_visible_after_tick() {
        let mut state = one_player_state();
        let id = state.next_unit_id();
        let unit = Unit::from_def(id, UnitType::Scout, UnitOwner::Player(UserId::from("p0")), 10, 10);
        state.units.insert(id, unit);
        tick_fog(&mut state);
        let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
        let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
        let player = state.player(&UserId::from("p0")).unwrap_or_else(|| panic!("p0 must exist"));
        let index = Axial::new(10, 10).flat_index(width, height).unwrap_or_else(|| panic!("tile must be in bounds"));
        assert_eq!(player.fog_map.get(index), Some(&2));
    }
}
