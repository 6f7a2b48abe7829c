//! World construction from an externally supplied map (§4.B `create`).

use hexrealm_geometry::Axial;
use hexrealm_types::{GameConfig, Terrain};

use crate::error::WorldError;
use crate::neutrals::spawn_initial_neutrals;
use crate::state::{new_empty, GameState, Player, Settlement};

use hexrealm_defs::SETTLEMENT_NAME_POOL;

/// Construct a fresh [`GameState`] from `config` (§4.B steps 1-6).
///
/// # Errors
///
/// Returns [`WorldError::UnknownFaction`] if a configured player names a
/// faction absent from the static definitions.
pub fn create(config: GameConfig) -> Result<GameState, WorldError> {
    let width = config.map_width;
    let height = config.map_height;

    let mut state = new_empty(config.game_id, config.speed, width, height, config.terrain, config.elevation);

    let mut spawns: Vec<Axial> = Vec::with_capacity(config.players.len());
    let mut name_index = 0usize;

    for player_config in config.players {
        hexrealm_defs::faction(&player_config.faction_id)?;

        let spawn = choose_spawn(&state, &spawns, width, height);
        spawns.push(spawn);

        let mut player = Player::new(player_config.user_id.clone(), player_config.faction_id, width, height);

        let settlement_id = state.next_settlement_id();
        let name = SETTLEMENT_NAME_POOL[name_index % SETTLEMENT_NAME_POOL.len()].to_owned();
        name_index += 1;
        let settlement = Settlement::found(settlement_id, player_config.user_id.clone(), name, spawn.q, spawn.r, true);

        reveal_disc(&mut player, spawn, f64::from(settlement.gather_radius) + 1.0, width, height);

        state.players.push(player);
        state.settlements.insert(settlement_id, settlement);
    }

    seed_diplomacy(&mut state);
    spawn_initial_neutrals(&mut state);

    Ok(state)
}

/// Whether the tile at `coord` is land under the fine terrain taxonomy
/// (§3 "Land" = not water, not mountain).
fn is_land(state: &GameState, coord: Axial) -> bool {
    coord
        .flat_index(i32::try_from(state.map_width).unwrap_or(i32::MAX), i32::try_from(state.map_height).unwrap_or(i32::MAX))
        .and_then(|index| state.terrain.get(index))
        .and_then(|&byte| Terrain::from_byte(byte))
        .is_some_and(Terrain::is_land)
}

/// Candidate land tiles in the inner frame `2 ≤ q < W-2, 2 ≤ r < H-2`
/// (§4.B step 2).
fn inner_frame_land_tiles(state: &GameState, width: u32, height: u32) -> Vec<Axial> {
    let mut tiles = Vec::new();
    for r in 2..height.saturating_sub(2) {
        for q in 2..width.saturating_sub(2) {
            #[allow(clippy::cast_possible_wrap)]
            let coord = Axial::new(q as i32, r as i32);
            if is_land(state, coord) {
                tiles.push(coord);
            }
        }
    }
    tiles
}

/// Deterministic spawn selection (§4.B step 2): first player goes
/// closest to the map quarter-point; each subsequent player maximizes
/// the minimum Euclidean distance to already-chosen spawns. Falls back
/// to map centre if the inner frame has no land tiles.
fn choose_spawn(state: &GameState, already_chosen: &[Axial], width: u32, height: u32) -> Axial {
    let candidates = inner_frame_land_tiles(state, width, height);
    #[allow(clippy::cast_possible_wrap)]
    let centre = Axial::new((width / 4) as i32, (height / 4) as i32);

    if candidates.is_empty() {
        #[allow(clippy::cast_possible_wrap)]
        return Axial::new((width / 2) as i32, (height / 2) as i32);
    }

    if already_chosen.is_empty() {
        return candidates
            .into_iter()
            .min_by(|a, b| a.euclidean_distance(centre).total_cmp(&b.euclidean_distance(centre)))
            .unwrap_or(centre);
    }

    candidates
        .into_iter()
        .max_by(|a, b| {
            let min_a = already_chosen.iter().map(|spawn| a.euclidean_distance(*spawn)).fold(f64::INFINITY, f64::min);
            let min_b = already_chosen.iter().map(|spawn| b.euclidean_distance(*spawn)).fold(f64::INFINITY, f64::min);
            min_a.total_cmp(&min_b)
        })
        .unwrap_or(centre)
}

/// Promote every tile within Euclidean `radius` of `centre` to visible
/// (§4.B step 4).
fn reveal_disc(player: &mut Player, centre: Axial, radius: f64, width: u32, height: u32) {
    #[allow(clippy::cast_possible_wrap)]
    let (width_i32, height_i32) = (width as i32, height as i32);
    for tile in centre.euclidean_disc(radius, width_i32, height_i32) {
        if let Some(index) = tile.flat_index(width_i32, height_i32) {
            if let Some(slot) = player.fog_map.get_mut(index) {
                *slot = 2;
            }
        }
    }
}

/// Seed one `peace` diplomacy entry between every unordered pair of
/// human players (§4.B step 5).
fn seed_diplomacy(state: &mut GameState) {
    let ids: Vec<_> = state.players.iter().map(|player| player.user_id.clone()).collect();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            state.set_diplomacy_status(a, b, hexrealm_types::DiplomacyStatus::Peace);
        }
    }
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameId, GameSpeed, PlayerConfig, UserId};

    use super::*;

    fn plains_config(width: u32, height: u32, player_count: usize) -> GameConfig {
        let terrain = vec![Terrain::Plains as u8; (width * height) as usize];
        let elevation = vec![50u8; (width * height) as usize];
        let players = (0..player_count)
            .map(|i| PlayerConfig {
                user_id: UserId::from(format!("p{i}")),
                faction_id: "solari".to_owned(),
            })
            .collect();
        GameConfig {
            game_id: GameId::from("game-1"),
            map_width: width,
            map_height: height,
            terrain,
            elevation,
            players,
            speed: GameSpeed::Normal,
        }
    }

    #[test]
    fn create_places_one_capital_per_player() {
        let config = plains_config(30, 30, 2);
        let state = create(config).unwrap_or_else(|error| panic!("test fixture construction must succeed: {error}"));
        assert_eq!(state.players.len(), 2);
        let capitals = state.settlements.values().filter(|settlement| settlement.is_capital).count();
        assert_eq!(capitals, 2);
    }

    #[test]
    fn create_seeds_peace_diplomacy_between_all_pairs() {
        let config = plains_config(30, 30, 3);
        let state = create(config).unwrap_or_else(|error| panic!("test fixture construction must succeed: {error}"));
        assert_eq!(state.diplomacy.len(), 3);
        assert!(state.diplomacy.iter().all(|entry| entry.status == hexrealm_types::DiplomacyStatus::Peace));
    }

    #[test]
    fn create_reveals_fog_around_each_spawn() {
        let config = plains_config(30, 30, 1);
        let state = create(config).unwrap_or_else(|error| panic!("test fixture construction must succeed: {error}"));
        let player = state.players.first().unwrap_or_else(|| panic!("state must have at least one player"));
        assert!(player.fog_map.iter().any(|&value| value == 2));
    }

    #[test]
    fn create_fails_on_unknown_faction() {
        let mut config = plains_config(10, 10, 1);
        if let Some(player_config) = config.players.first_mut() {
            player_config.faction_id = "nonexistent".to_owned();
        }
        assert!(create(config).is_err());
    }

    #[test]
    fn create_falls_back_to_map_centre_with_no_land() {
        let width = 10;
        let height = 10;
        let terrain = vec![Terrain::DeepWater as u8; (width * height) as usize];
        let elevation = vec![0u8; (width * height) as usize];
        let config = GameConfig {
            game_id: GameId::from("game-2"),
            map_width: width,
            map_height: height,
            terrain,
            elevation,
            players: vec![PlayerConfig {
                user_id: UserId::from("p0"),
                faction_id: "solari".to_owned(),
            }],
            speed: GameSpeed::Normal,
        };
        let state = create(config).unwrap_or_else(|error| panic!("test fixture construction must succeed: {error}"));
        let settlement = state.settlements.values().next().unwrap_or_else(|| panic!("state must have a settlement"));
        assert_eq!((settlement.q, settlement.r), (5, 5));
    }
}
