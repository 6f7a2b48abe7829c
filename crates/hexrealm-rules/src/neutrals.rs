//! Per-tick neutral behaviour: animal/barbarian AI and periodic camp
//! respawn (§4.E.10 `tickNeutrals`/`tickBarbarianCamps`). Initial
//! population spawn lives in `hexrealm_world::neutrals` since it runs
//! once at construction rather than every tick.

use hexrealm_geometry::Axial;
use hexrealm_types::{GameEvent, NeutralOwner, Terrain, UnitId, UnitOwner, UnitState};

use hexrealm_world::GameState;

/// Barbarians within this distance of their camp wander rather than
/// returning to it (§4.E.10 step 4 "patrol radius 5").
const PATROL_RADIUS: f64 = 5.0;
/// Barbarians beyond this distance from their camp walk back toward it
/// (§4.E.10 step 3).
const RETURN_THRESHOLD: f64 = 5.0;
/// Re-evaluate camp population every 50 ticks (§4.E.10 `tickBarbarianCamps`).
const CAMP_RESPAWN_INTERVAL: u64 = 50;
const MAX_CAMPS: usize = 5;
const CAMP_MIN_DISTANCE_FROM_SETTLEMENTS: f64 = 8.0;
const CAMP_MIN_DISTANCE_BETWEEN_CAMPS: f64 = 8.0;

/// `tickNeutrals` (§4.E.10): animals fight when wounded, barbarians run
/// a fight/approach/return/wander state machine. Runs every tick
/// alongside `tickUnitAI`. Emits no events — neutral movement is not
/// reported via [`GameEvent::UnitMoved`] since that event names a
/// human-owned unit's move only in this design.
pub fn tick_neutrals(state: &mut GameState) -> Vec<GameEvent> {
    let tick = state.tick;
    let neutral_ids: Vec<UnitId> = state.neutral_units.keys().copied().collect();

    for unit_id in neutral_ids {
        let Some(unit) = state.neutral_units.get(&unit_id) else { continue };
        let owner = match unit.owner {
            UnitOwner::Neutral(owner) => owner,
            UnitOwner::Player(_) => continue,
        };

        let next = match owner {
            NeutralOwner::Animal => animal_intent(state, unit),
            NeutralOwner::Barbarian => barbarian_intent(state, unit, tick),
        };

        if let Some(unit) = state.neutral_units.get_mut(&unit_id) {
            apply_intent(unit, next);
        }
    }

    Vec::new()
}

enum Intent {
    Idle,
    MoveTo(Axial),
    Fight(Axial),
}

fn apply_intent(unit: &mut hexrealm_world::Unit, intent: Intent) {
    match intent {
        Intent::Idle => {
            unit.state = UnitState::Idle;
            unit.target_q = None;
            unit.target_r = None;
        }
        Intent::MoveTo(tile) => {
            unit.state = UnitState::Moving;
            unit.target_q = Some(tile.q);
            unit.target_r = Some(tile.r);
        }
        Intent::Fight(tile) => {
            unit.state = UnitState::Fighting;
            unit.target_q = Some(tile.q);
            unit.target_r = Some(tile.r);
        }
    }
}

fn any_other_owner_units_in_vision(state: &GameState, unit: &hexrealm_world::Unit) -> Option<Axial> {
    let origin = unit.position();
    state
        .all_units()
        .filter(|other| other.owner != unit.owner)
        .filter(|other| origin.euclidean_distance(other.position()) <= f64::from(unit.vision_range))
        .min_by(|a, b| {
            origin
                .euclidean_distance(a.position())
                .total_cmp(&origin.euclidean_distance(b.position()))
        })
        .map(hexrealm_world::Unit::position)
}

fn animal_intent(state: &GameState, unit: &hexrealm_world::Unit) -> Intent {
    if unit.hp < unit.max_hp {
        if let Some(target) = any_other_owner_units_in_vision(state, unit) {
            return Intent::Fight(target);
        }
    }
    Intent::Idle
}

fn step_toward(from: Axial, to: Axial) -> Axial {
    from.neighbors()
        .into_iter()
        .min_by(|a, b| to.euclidean_distance(*a).total_cmp(&to.euclidean_distance(*b)))
        .unwrap_or(from)
}

fn nearest_enemy_settlement(state: &GameState, unit: &hexrealm_world::Unit) -> Option<Axial> {
    let origin = unit.position();
    state
        .settlements
        .values()
        .filter(|settlement| origin.euclidean_distance(settlement.position()) <= f64::from(unit.vision_range))
        .min_by(|a, b| {
            origin
                .euclidean_distance(a.position())
                .total_cmp(&origin.euclidean_distance(b.position()))
        })
        .map(hexrealm_world::Settlement::position)
}

fn nearest_camp(state: &GameState, origin: Axial) -> Option<Axial> {
    state
        .barbarian_camps
        .iter()
        .copied()
        .min_by(|a, b| origin.euclidean_distance(*a).total_cmp(&origin.euclidean_distance(*b)))
}

fn barbarian_intent(state: &GameState, unit: &hexrealm_world::Unit, tick: u64) -> Intent {
    let origin = unit.position();

    if let Some(target) = any_other_owner_units_in_vision(state, unit) {
        return Intent::Fight(step_toward(origin, target));
    }
    if let Some(target) = nearest_enemy_settlement(state, unit) {
        return Intent::MoveTo(step_toward(origin, target));
    }

    let camp = nearest_camp(state, origin);
    if let Some(camp) = camp {
        if origin.euclidean_distance(camp) >= RETURN_THRESHOLD {
            return Intent::MoveTo(step_toward(origin, camp));
        }
    }

    wander(state, unit, tick, camp)
}

fn wander(state: &GameState, unit: &hexrealm_world::Unit, tick: u64, camp: Option<Axial>) -> Intent {
    let origin = unit.position();
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let index = (tick.wrapping_add(u64::try_from(origin.q).unwrap_or(0).wrapping_mul(7)))
        .wrapping_add(u64::try_from(origin.r).unwrap_or(0).wrapping_mul(13))
        % 6;
    let Some(&candidate) = origin.neighbors().get(index as usize) else { return Intent::Idle };

    if !candidate.in_bounds(width, height) {
        return Intent::Idle;
    }
    if !is_land(state, candidate) {
        return Intent::Idle;
    }
    if let Some(camp) = camp {
        if candidate.euclidean_distance(camp) > PATROL_RADIUS {
            return Intent::Idle;
        }
    }
    Intent::MoveTo(candidate)
}

fn is_land(state: &GameState, tile: Axial) -> bool {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    tile.flat_index(width, height)
        .and_then(|index| state.terrain.get(index))
        .and_then(|&byte| Terrain::from_byte(byte))
        .is_some_and(Terrain::is_land)
}

/// `tickBarbarianCamps` (§4.E.10): every 50 ticks, if fewer than 5
/// camps exist, place one new camp at the land tile maximizing the
/// minimum distance to existing camps, subject to the same
/// settlement/camp separation as the initial spawn, and populate it.
pub fn tick_barbarian_camps(state: &mut GameState) -> Vec<GameEvent> {
    if state.tick == 0 || state.tick % CAMP_RESPAWN_INTERVAL != 0 {
        return Vec::new();
    }
    if state.barbarian_camps.len() >= MAX_CAMPS {
        return Vec::new();
    }

    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let candidate = (0..height)
        .flat_map(|r| (0..width).map(move |q| Axial::new(q, r)))
        .filter(|&tile| is_land(state, tile))
        .filter(|&tile| far_from_settlements(state, tile))
        .filter(|&tile| far_from_camps(state, tile))
        .max_by(|&a, &b| min_camp_distance(state, a).total_cmp(&min_camp_distance(state, b)));

    let Some(tile) = candidate else { return Vec::new() };
    state.barbarian_camps.push(tile);
    hexrealm_world::spawn_barbarian_camp(state, tile);

    Vec::new()
}

fn far_from_settlements(state: &GameState, tile: Axial) -> bool {
    state
        .settlements
        .values()
        .all(|settlement| settlement.position().euclidean_distance(tile) >= CAMP_MIN_DISTANCE_FROM_SETTLEMENTS)
}

fn far_from_camps(state: &GameState, tile: Axial) -> bool {
    state.barbarian_camps.iter().all(|&camp| camp.euclidean_distance(tile) >= CAMP_MIN_DISTANCE_BETWEEN_CAMPS)
}

fn min_camp_distance(state: &GameState, tile: Axial) -> f64 {
    state
        .barbarian_camps
        .iter()
        .map(|&camp| camp.euclidean_distance(tile))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, NeutralOwner, PlayerConfig, UnitType};
    use hexrealm_world::{create, Unit};

    use super::*;

    fn plains_world(width: u32, height: u32) -> GameState {
        let config = GameConfig {
            game_id: GameId::from("g"),
            map_width: width,
            map_height: height,
            terrain: vec![Terrain::Plains as u8; (width * height) as usize],
            elevation: vec![50u8; (width * height) as usize],
            players: vec![PlayerConfig {
                user_id: hexrealm_types::UserId::from("p0"),
                faction_id: "solari".to_owned(),
            }],
            speed: GameSpeed::Normal,
        };
        create(config).unwrap_or_else(|_| panic!("test fixture construction must succeed"))
    }

    #[test]
    fn undamaged_animal_stays_idle() {
        let mut state = plains_world(20, 20);
        let id = state.next_unit_id();
        let animal = Unit::neutral(id, UnitType::Gatherer, UnitOwner::Neutral(NeutralOwner::Animal), 5, 5, 3, 15, 2, 1);
        state.neutral_units.insert(id, animal);
        tick_neutrals(&mut state);
        let animal = state.neutral_units.get(&id).unwrap_or_else(|| panic!("animal must still exist"));
        assert_eq!(animal.state, UnitState::Idle);
    }

    #[test]
    fn damaged_animal_fights_nearby_hostile() {
        let mut state = plains_world(20, 20);
        let animal_id = state.next_unit_id();
        let mut animal = Unit::neutral(animal_id, UnitType::Gatherer, UnitOwner::Neutral(NeutralOwner::Animal), 5, 5, 3, 15, 2, 1);
        animal.hp = 5;
        state.neutral_units.insert(animal_id, animal);

        let enemy_id = state.next_unit_id();
        let enemy = Unit::neutral(enemy_id, UnitType::Warrior, UnitOwner::Neutral(NeutralOwner::Barbarian), 6, 5, 8, 30, 3, 1);
        state.neutral_units.insert(enemy_id, enemy);

        tick_neutrals(&mut state);
        let animal = state.neutral_units.get(&animal_id).unwrap_or_else(|| panic!("animal must still exist"));
        assert_eq!(animal.state, UnitState::Fighting);
    }

    #[test]
    fn camp_respawn_is_noop_before_interval_elapses() {
        let mut state = plains_world(30, 30);
        state.tick = 10;
        let events = tick_barbarian_camps(&mut state);
        assert!(events.is_empty());
        assert!(state.barbarian_camps.is_empty());
    }

    #[test]
    fn camp_respawn_places_a_camp_once_interval_elapses_with_room_on_map() {
        let mut state = plains_world(30, 30);
        state.tick = 50;
        tick_barbarian_camps(&mut state);
        assert_eq!(state.barbarian_camps.len(), 1);
    }
}
