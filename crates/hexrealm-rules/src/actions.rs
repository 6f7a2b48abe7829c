//! Action handlers not already hosted by their owning system module
//! (§6 `buyUnit`, `setPolicies`). `constructBuilding`, `startResearch`,
//! and `proposeLaw` live in [`crate::settlements`], [`crate::research`],
//! and [`crate::council`] respectively, next to the tick systems they
//! share state with.

use hexrealm_types::{Policies, SettlementId, UnitType};
use hexrealm_types::{UnitOwner, UserId};

use hexrealm_world::{GameState, Unit};

use crate::error::RulesError;

/// `buyUnit` (§6): the settlement must exist and be owned by
/// `player_id`; the player must afford the unit's gold and production
/// cost; a `warrior` additionally requires a `barracks` in the
/// settlement. Spends the cost and inserts a fresh unit at the
/// settlement's tile in `idle` state.
///
/// # Errors
///
/// Returns [`RulesError::SettlementNotFound`], [`RulesError::Forbidden`],
/// [`RulesError::MissingBarracks`], or [`RulesError::InsufficientResources`].
pub fn buy_unit(state: &mut GameState, player_id: &UserId, settlement_id: SettlementId, unit_type: UnitType) -> Result<(), RulesError> {
    let settlement = state.settlements.get(&settlement_id).ok_or(RulesError::SettlementNotFound(settlement_id))?;
    if &settlement.owner_id != player_id {
        return Err(RulesError::Forbidden(player_id.clone()));
    }
    if unit_type == UnitType::Warrior && !settlement.buildings.iter().any(|building| building == "barracks") {
        return Err(RulesError::MissingBarracks(settlement_id));
    }

    let def = hexrealm_defs::unit_def(unit_type);
    let player = state.player(player_id).ok_or_else(|| RulesError::PlayerNotFound(player_id.clone()))?;
    if player.resources.gold < def.gold_cost || player.resources.production < def.production_cost {
        return Err(RulesError::InsufficientResources);
    }

    let (q, r) = (settlement.q, settlement.r);
    if let Some(player) = state.player_mut(player_id) {
        player.resources.gold -= def.gold_cost;
        player.resources.production -= def.production_cost;
    }

    let id = state.next_unit_id();
    let unit = Unit::from_def(id, unit_type, UnitOwner::Player(player_id.clone()), q, r);
    state.units.insert(id, unit);

    Ok(())
}

/// `setPolicies` (§6): overwrite the player's policy record wholesale.
///
/// # Errors
///
/// Returns [`RulesError::PlayerNotFound`].
pub fn set_policies(state: &mut GameState, player_id: &UserId, policies: Policies) -> Result<(), RulesError> {
    let player = state.player_mut(player_id).ok_or_else(|| RulesError::PlayerNotFound(player_id.clone()))?;
    player.policies = policies;
    Ok(())
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{CombatPolicy, GameConfig, GameId, GameSpeed, PlayerConfig, Terrain};
    use hexrealm_world::create;
    use rust_decimal::Decimal;

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
    fn buy_warrior_without_barracks_fails() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.gold = Decimal::from(1000);
            player.resources.production = Decimal::from(1000);
        }
        let result = buy_unit(&mut state, &UserId::from("p0"), settlement_id, UnitType::Warrior);
        assert_eq!(result, Err(RulesError::MissingBarracks(settlement_id)));
    }

    #[test]
    fn buy_scout_with_sufficient_funds_inserts_unit() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.gold = Decimal::from(1000);
            player.resources.production = Decimal::from(1000);
        }
        let before = state.units.len();
        buy_unit(&mut state, &UserId::from("p0"), settlement_id, UnitType::Scout)
            .unwrap_or_else(|_| panic!("purchase must succeed with sufficient funds"));
        assert_eq!(state.units.len(), before + 1);
    }

    #[test]
    fn buy_unit_without_funds_fails() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        let result = buy_unit(&mut state, &UserId::from("p0"), settlement_id, UnitType::Scout);
        assert_eq!(result, Err(RulesError::InsufficientResources));
    }

    #[test]
    fn set_policies_overwrites_record() {
        let mut state = one_player_state();
        let policies = Policies {
            aggression: 80,
            expansion: 10,
            spending: 50,
            combat_policy: CombatPolicy::Aggressive,
        };
        set_policies(&mut state, &UserId::from("p0"), policies).unwrap_or_else(|_| panic!("player must exist"));
        let player = state.player(&UserId::from("p0")).unwrap_or_else(|| panic!("p0 must exist"));
        assert_eq!(player.policies.combat_policy, CombatPolicy::Aggressive);
        assert_eq!(player.policies.aggression, 80);
    }
}
