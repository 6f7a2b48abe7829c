//! Initial neutral population spawned during world construction
//! (§4.E.10 `spawnInitialNeutrals`).
//!
//! Per-tick neutral behaviour (`tickNeutrals`, `tickBarbarianCamps`)
//! runs from the tick pipeline instead, alongside the other rule
//! systems, since it executes every tick rather than once at
//! construction; see `hexrealm_rules::neutrals`.

use hexrealm_geometry::Axial;
use hexrealm_types::{NeutralOwner, Terrain, UnitOwner, UnitType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::state::{GameState, Unit};

/// Minimum axial (hex-step) distance a barbarian camp must keep from
/// every player settlement and every previously placed camp (§4.E.10,
/// the only neutral-system distance language that names "axial"
/// explicitly rather than "Euclidean").
const CAMP_MIN_DISTANCE_FROM_SETTLEMENTS: i32 = 10;
const CAMP_MIN_DISTANCE_BETWEEN_CAMPS: i32 = 8;

/// Animal stat block (§4.E.10: "str=3, hp=15, vision=2, move=1").
const ANIMAL_STRENGTH: u32 = 3;
const ANIMAL_HP: u32 = 15;
const ANIMAL_VISION: u32 = 2;
const ANIMAL_MOVE: u32 = 1;

/// Barbarian stat block (§4.E.10: "str=8, hp=30, vision=3, move=1").
const BARBARIAN_STRENGTH: u32 = 8;
const BARBARIAN_HP: u32 = 30;
const BARBARIAN_VISION: u32 = 3;
const BARBARIAN_MOVE: u32 = 1;

/// Seed the initial wildlife and barbarian population (§4.E.10).
///
/// RNG is seeded deterministically from `mapWidth * mapHeight + tick`
/// (always `0` at construction time, since `spawnInitialNeutrals` runs
/// before the first tick), so repeated construction of an identical map
/// produces an identical initial neutral population.
pub fn spawn_initial_neutrals(state: &mut GameState) {
    let seed = u64::from(state.map_width) * u64::from(state.map_height) + state.tick;
    let mut rng = StdRng::seed_from_u64(seed);

    spawn_animals(state, &mut rng);
    spawn_barbarian_camps(state, &mut rng);
}

fn land_tiles_with_terrain(state: &GameState, byte: u8) -> Vec<Axial> {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    let mut tiles = Vec::new();
    for r in 0..height {
        for q in 0..width {
            let coord = Axial::new(q, r);
            if let Some(index) = coord.flat_index(width, height) {
                if state.terrain.get(index) == Some(&byte) {
                    tiles.push(coord);
                }
            }
        }
    }
    tiles
}

/// The literal byte value used for forest when shuffling initial spawn
/// tiles (`terrain=3`), which does not line up with [`Terrain::Forest`]'s
/// discriminant — the same quirk `hexrealm_rules::unit_ai` documents for
/// the gatherer's forest check.
const SPAWN_FOREST_BYTE: u8 = 3;

fn spawn_animals(state: &mut GameState, rng: &mut StdRng) {
    let mut forest_tiles = land_tiles_with_terrain(state, SPAWN_FOREST_BYTE);
    forest_tiles.shuffle(rng);
    let count = rng.random_range(5..=10).min(forest_tiles.len());
    for tile in forest_tiles.into_iter().take(count) {
        let id = state.next_unit_id();
        let unit = Unit::neutral(
            id,
            UnitType::Gatherer,
            UnitOwner::Neutral(NeutralOwner::Animal),
            tile.q,
            tile.r,
            ANIMAL_STRENGTH,
            ANIMAL_HP,
            ANIMAL_VISION,
            ANIMAL_MOVE,
        );
        state.neutral_units.insert(id, unit);
    }
}

fn far_from_settlements(state: &GameState, tile: Axial) -> bool {
    state
        .settlements
        .values()
        .all(|settlement| settlement.position().distance(tile) >= CAMP_MIN_DISTANCE_FROM_SETTLEMENTS)
}

fn far_from_camps(camps: &[Axial], tile: Axial) -> bool {
    camps.iter().all(|camp| camp.distance(tile) >= CAMP_MIN_DISTANCE_BETWEEN_CAMPS)
}

fn spawn_barbarian_camps(state: &mut GameState, rng: &mut StdRng) {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let mut candidates: Vec<Axial> = (0..height)
        .flat_map(|r| (0..width).map(move |q| Axial::new(q, r)))
        .filter(|&tile| {
            tile.flat_index(width, height)
                .and_then(|index| state.terrain.get(index))
                .and_then(|&byte| Terrain::from_byte(byte))
                .is_some_and(Terrain::is_land)
        })
        .filter(|&tile| far_from_settlements(state, tile))
        .collect();
    candidates.shuffle(rng);

    let camp_count = rng.random_range(2..=3);
    let mut placed: Vec<Axial> = Vec::new();

    for candidate in candidates {
        if placed.len() >= camp_count {
            break;
        }
        if far_from_camps(&placed, candidate) {
            placed.push(candidate);
            spawn_barbarian_camp(state, candidate);
        }
    }

    state.barbarian_camps.extend(placed);
}

/// Populate a single camp tile and its land neighbours with up to two
/// barbarian warriors (§4.E.10), reused by the per-tick camp respawn
/// system in `hexrealm_rules::neutrals`.
pub fn spawn_barbarian_camp(state: &mut GameState, camp: Axial) {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let mut tiles = vec![camp];
    tiles.extend(camp.neighbors());

    let mut spawned = 0;
    for tile in tiles {
        if spawned >= 2 {
            break;
        }
        let is_land = tile
            .flat_index(width, height)
            .and_then(|index| state.terrain.get(index))
            .and_then(|&byte| Terrain::from_byte(byte))
            .is_some_and(Terrain::is_land);
        if !is_land {
            continue;
        }
        let id = state.next_unit_id();
        let unit = Unit::neutral(
            id,
            UnitType::Warrior,
            UnitOwner::Neutral(NeutralOwner::Barbarian),
            tile.q,
            tile.r,
            BARBARIAN_STRENGTH,
            BARBARIAN_HP,
            BARBARIAN_VISION,
            BARBARIAN_MOVE,
        );
        state.neutral_units.insert(id, unit);
        spawned += 1;
    }
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameId, GameSpeed};

    use super::*;
    use crate::state::new_empty;

    fn forest_world(width: u32, height: u32) -> GameState {
        let terrain = vec![SPAWN_FOREST_BYTE; (width * height) as usize];
        let elevation = vec![50u8; (width * height) as usize];
        new_empty(GameId::from("g"), GameSpeed::Normal, width, height, terrain, elevation)
    }

    #[test]
    fn spawn_initial_neutrals_places_between_five_and_ten_animals() {
        let mut state = forest_world(20, 20);
        spawn_initial_neutrals(&mut state);
        let animals = state
            .neutral_units
            .values()
            .filter(|unit| unit.owner == UnitOwner::Neutral(NeutralOwner::Animal))
            .count();
        assert!((5..=10).contains(&animals));
    }

    #[test]
    fn spawn_initial_neutrals_is_deterministic_for_identical_maps() {
        let mut first = forest_world(20, 20);
        let mut second = forest_world(20, 20);
        spawn_initial_neutrals(&mut first);
        spawn_initial_neutrals(&mut second);
        assert_eq!(first.neutral_units.len(), second.neutral_units.len());
    }
}
