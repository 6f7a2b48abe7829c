//! Elimination and victory checks (§4.E.9).

use hexrealm_types::{GameEvent, UserId, VictoryType};

use hexrealm_world::GameState;

/// `checkElimination` (§4.E.9): a non-eliminated player who owns no
/// settlement is eliminated. Emits [`GameEvent::PlayerEliminated`] per
/// newly eliminated player.
pub fn check_elimination(state: &mut GameState) -> Vec<GameEvent> {
    let candidates: Vec<UserId> = state
        .players
        .iter()
        .filter(|player| !player.eliminated)
        .filter(|player| !state.owns_any_settlement(&player.user_id))
        .map(|player| player.user_id.clone())
        .collect();

    let mut events = Vec::new();
    for player_id in candidates {
        if let Some(player) = state.player_mut(&player_id) {
            player.eliminated = true;
        }
        events.push(GameEvent::PlayerEliminated {
            player_id,
        });
    }
    events
}

/// `checkVictory` (§4.E.9): runs elimination first, then checks
/// last-standing, then scans players in insertion order for the first
/// of domination/prosperity/influence/enlightenment that any of them
/// meets. Emits [`GameEvent::Victory`] at most once per call.
pub fn check_victory(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = check_elimination(state);

    let survivors: Vec<UserId> = state.players.iter().filter(|player| !player.eliminated).map(|player| player.user_id.clone()).collect();

    if let [winner_id] = survivors.as_slice() {
        events.push(GameEvent::Victory {
            winner_id: winner_id.clone(),
            victory_type: VictoryType::LastStanding,
        });
        return events;
    }

    for player_id in &survivors {
        if let Some(victory_type) = winning_condition(state, player_id) {
            events.push(GameEvent::Victory {
                winner_id: player_id.clone(),
                victory_type,
            });
            return events;
        }
    }

    events
}

fn winning_condition(state: &GameState, player_id: &UserId) -> Option<VictoryType> {
    if owns_all_capitals(state, player_id) {
        return Some(VictoryType::Domination);
    }
    let player = state.player(player_id)?;
    if player.resources.gold >= rust_decimal::Decimal::from(10_000) {
        return Some(VictoryType::Prosperity);
    }
    if player.resources.culture >= rust_decimal::Decimal::from(10_000) {
        return Some(VictoryType::Influence);
    }
    if has_researched_every_available_tech(player) {
        return Some(VictoryType::Enlightenment);
    }
    None
}

fn owns_all_capitals(state: &GameState, player_id: &UserId) -> bool {
    let capitals: Vec<_> = state.settlements.values().filter(|settlement| settlement.is_capital).collect();
    !capitals.is_empty() && capitals.iter().all(|settlement| &settlement.owner_id == player_id)
}

fn has_researched_every_available_tech(player: &hexrealm_world::Player) -> bool {
    hexrealm_defs::all_techs()
        .iter()
        .filter(|def| def.faction_only.as_deref().is_none_or(|only| only == player.faction_id))
        .all(|def| player.researched_techs.iter().any(|id| id == &def.id))
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, Terrain};
    use hexrealm_world::create;
    use rust_decimal_macros::dec;

    use super::*;

    fn two_player_state() -> GameState {
        let width = 30;
        let height = 30;
        let config = GameConfig {
            game_id: GameId::from("g"),
            map_width: width,
            map_height: height,
            terrain: vec![Terrain::Plains as u8; (width * height) as usize],
            elevation: vec![50u8; (width * height) as usize],
            players: vec![
                PlayerConfig {
                    user_id: UserId::from("p0"),
                    faction_id: "solari".to_owned(),
                },
                PlayerConfig {
                    user_id: UserId::from("p1"),
                    faction_id: "kesh".to_owned(),
                },
            ],
            speed: GameSpeed::Normal,
        };
        create(config).unwrap_or_else(|_| panic!("test fixture construction must succeed"))
    }

    #[test]
    fn player_without_settlements_is_eliminated() {
        let mut state = two_player_state();
        state.settlements.retain(|_, settlement| settlement.owner_id != UserId::from("p1"));
        let events = check_elimination(&mut state);
        assert_eq!(events.len(), 1);
        let player = state.player(&UserId::from("p1")).unwrap_or_else(|| panic!("p1 must exist"));
        assert!(player.eliminated);
    }

    #[test]
    fn last_standing_declares_sole_survivor() {
        let mut state = two_player_state();
        state.settlements.retain(|_, settlement| settlement.owner_id != UserId::from("p1"));
        let events = check_victory(&mut state);
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::Victory { victory_type: VictoryType::LastStanding, .. }
        )));
    }

    #[test]
    fn prosperity_triggers_at_ten_thousand_gold_not_before() {
        let mut state = two_player_state();
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.gold = dec!(9999);
        }
        let events = check_victory(&mut state);
        assert!(events.iter().all(|event| !matches!(event, GameEvent::Victory { .. })));

        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.gold = dec!(10000);
        }
        let events = check_victory(&mut state);
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::Victory { winner_id, victory_type: VictoryType::Prosperity, .. } if winner_id == &UserId::from("p0")
        )));
    }

    #[test]
    fn domination_requires_owning_every_capital() {
        let mut state = two_player_state();
        let other_capital = state
            .settlements
            .values()
            .find(|settlement| settlement.is_capital && settlement.owner_id == UserId::from("p1"))
            .map(|settlement| settlement.id);
        if let Some(id) = other_capital {
            if let Some(settlement) = state.settlements.get_mut(&id) {
                settlement.owner_id = UserId::from("p0");
            }
        }
        let events = check_victory(&mut state);
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::Victory { winner_id, victory_type: VictoryType::Domination, .. } if winner_id == &UserId::from("p0")
        )));
    }
}
