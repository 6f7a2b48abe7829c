//! The 9-system tick pipeline (§4.D `executeTick`).
//!
//! Each non-paused tick runs the rule systems in a fixed
//! order: resources must precede unit AI (AI reads this tick's income
//! signs), AI sets movement intent before movement executes it, combat
//! resolves after movement so adjacency reflects the tick's new
//! positions, research and loyalty only depend on post-combat state,
//! and fog runs last before elimination/victory so they see a
//! consistent visibility.

use hexrealm_types::GameEvent;
use hexrealm_world::GameState;
use tracing::debug;

/// Execute one tick of the simulation (§4.D).
///
/// If the game is paused, returns an empty event list without
/// advancing the tick counter. Otherwise increments `tick`, runs the
/// nine systems in order, and returns every event they emitted.
pub fn execute_tick(state: &mut GameState) -> Vec<GameEvent> {
    if state.paused {
        return Vec::new();
    }

    state.tick += 1;
    let tick = state.tick;

    let mut events = Vec::new();
    events.extend(hexrealm_rules::tick_resources(state));
    events.extend(hexrealm_rules::tick_unit_ai(state));
    events.extend(hexrealm_rules::tick_neutrals(state));
    events.extend(hexrealm_rules::tick_barbarian_camps(state));
    events.extend(hexrealm_rules::tick_movement(state));
    events.extend(hexrealm_rules::tick_combat(state));
    events.extend(hexrealm_rules::tick_settlements(state));
    events.extend(hexrealm_rules::tick_research(state));
    events.extend(hexrealm_rules::tick_advisor_loyalty(state));
    events.extend(hexrealm_rules::tick_fog(state));
    events.extend(hexrealm_rules::check_victory(state));

    debug!(tick, event_count = events.len(), "tick completed");
    events
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, Terrain, UserId};
    use hexrealm_world::create;

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
    fn paused_tick_does_not_advance_counter_or_emit_events() {
        let mut state = one_player_state();
        state.paused = true;
        let events = execute_tick(&mut state);
        assert!(events.is_empty());
        assert_eq!(state.tick, 0);
    }

    #[test]
    fn unpaused_tick_advances_counter_exactly_once() {
        let mut state = one_player_state();
        execute_tick(&mut state);
        assert_eq!(state.tick, 1);
        execute_tick(&mut state);
        assert_eq!(state.tick, 2);
    }

    #[test]
    fn sole_player_losing_their_only_settlement_is_eliminated_by_tick() {
        let mut state = one_player_state();
        state.settlements.clear();
        let events = execute_tick(&mut state);
        assert!(events.iter().any(|event| matches!(event, GameEvent::PlayerEliminated { .. })));
    }
}
