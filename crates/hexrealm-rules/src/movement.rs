//! Movement system: BFS pathing for units with a moving-shaped state and
//! a target (§4.E.3).

use hexrealm_geometry::offset::bfs_path;
use hexrealm_geometry::Axial;
use hexrealm_types::{CoarseTerrain, GameEvent, ImprovementType, UnitId, UnitState};

use hexrealm_world::GameState;

const MOVING_STATES: [UnitState; 4] = [UnitState::Moving, UnitState::Returning, UnitState::Gathering, UnitState::Building];

struct StepOutcome {
    unit_id: UnitId,
    new_q: i32,
    new_r: i32,
    arrived: bool,
}

/// Run the movement system for one tick (§4.E.3). Emits [`GameEvent::UnitMoved`]
/// for every unit that actually advances.
pub fn tick_movement(state: &mut GameState) -> Vec<GameEvent> {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);

    let candidate_ids: Vec<UnitId> = state
        .units
        .values()
        .chain(state.neutral_units.values())
        .filter(|unit| MOVING_STATES.contains(&unit.state))
        .filter(|unit| unit.target_q.is_some() && unit.target_r.is_some())
        .map(|unit| unit.id)
        .collect();

    let mut outcomes = Vec::new();
    for unit_id in candidate_ids {
        let Some(unit) = state.units.get(&unit_id).or_else(|| state.neutral_units.get(&unit_id)) else { continue };
        let (Some(target_q), Some(target_r)) = (unit.target_q, unit.target_r) else { continue };
        let current = unit.position();
        let target = Axial::new(target_q, target_r);

        if current == target {
            outcomes.push(StepOutcome {
                unit_id,
                new_q: current.q,
                new_r: current.r,
                arrived: true,
            });
            continue;
        }

        let path = bfs_path(current, target, width, height, |tile| is_passable(state, tile));
        if path.len() <= 1 {
            continue;
        }

        let road_bonus = if state.improvements.get(&current) == Some(&ImprovementType::Road) { 1 } else { 0 };
        let effective_speed = (unit.move_speed as usize) + road_bonus;
        let step_index = effective_speed.min(path.len().saturating_sub(1));
        let Some(&next) = path.get(step_index) else { continue };
        let arrived = next == target;
        outcomes.push(StepOutcome {
            unit_id,
            new_q: next.q,
            new_r: next.r,
            arrived,
        });
    }

    let mut events = Vec::new();
    for outcome in outcomes {
        let unit = state.units.get_mut(&outcome.unit_id).or_else(|| state.neutral_units.get_mut(&outcome.unit_id));
        let Some(unit) = unit else { continue };
        let moved = unit.q != outcome.new_q || unit.r != outcome.new_r;
        unit.q = outcome.new_q;
        unit.r = outcome.new_r;
        if outcome.arrived {
            unit.state = UnitState::Idle;
            unit.target_q = None;
            unit.target_r = None;
        }
        if moved {
            events.push(GameEvent::UnitMoved {
                unit_id: outcome.unit_id,
                q: outcome.new_q,
                r: outcome.new_r,
            });
        }
    }
    events
}

fn is_passable(state: &GameState, tile: Axial) -> bool {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    tile.flat_index(width, height)
        .and_then(|index| state.terrain.get(index))
        .and_then(|&byte| CoarseTerrain::from_byte(byte))
        .is_some_and(CoarseTerrain::is_passable)
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, UnitOwner, UnitType, UserId};
    use hexrealm_world::{create, Unit};

    use super::*;

    fn state_with_terrain(terrain_byte: u8) -> GameState {
        let width = 10;
        let height = 10;
        let config = GameConfig {
            game_id: GameId::from("g"),
            map_width: width,
            map_height: height,
            terrain: vec![terrain_byte; (width * height) as usize],
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
    fn unit_advances_toward_target_on_open_terrain() {
        let mut state = state_with_terrain(3);
        let id = state.next_unit_id();
        let mut unit = Unit::from_def(id, UnitType::Scout, UnitOwner::Player(UserId::from("p0")), 0, 0);
        unit.state = UnitState::Moving;
        unit.target_q = Some(5);
        unit.target_r = Some(0);
        state.units.insert(id, unit);
        tick_movement(&mut state);
        let unit = state.units.get(&id).unwrap_or_else(|| panic!("unit must still exist after tick_movement"));
        assert!(unit.q > 0);
    }

    #[test]
    fn unit_already_at_target_goes_idle() {
        let mut state = state_with_terrain(3);
        let id = state.next_unit_id();
        let mut unit = Unit::from_def(id, UnitType::Scout, UnitOwner::Player(UserId::from("p0")), 4, 4);
        unit.state = UnitState::Moving;
        unit.target_q = Some(4);
        unit.target_r = Some(4);
        state.units.insert(id, unit);
        tick_movement(&mut state);
        let unit = state.units.get(&id).unwrap_or_else(|| panic!("unit must still exist after tick_movement"));
        assert_eq!(unit.state, UnitState::Idle);
        assert!(unit.target_q.is_none());
    }

    #[test]
    fn unit_blocked_by_water_stays_in_place() {
        let mut state = state_with_terrain(0);
        let id = state.next_unit_id();
        let mut unit = Unit::from_def(id, UnitType::Scout, UnitOwner::Player(UserId::from("p0")), 0, 0);
        unit.state = UnitState::Moving;
        unit.target_q = Some(5);
        unit.target_r = Some(0);
        state.units.insert(id, unit);
        tick_movement(&mut state);
        let unit = state.units.get(&id).unwrap_or_else(|| panic!("unit must still exist after tick_movement"));
        assert_eq!((unit.q, unit.r), (0, 0));
    }
}
