//! Settlement founding, building construction, and per-tick growth
//! (§4.E.5, §6 `foundSettlement`/`constructBuilding`).

use hexrealm_geometry::Axial;
use hexrealm_types::{GameEvent, SettlementId, Terrain, UserId};

use hexrealm_defs::SETTLEMENT_NAME_POOL;
use hexrealm_world::{GameState, Settlement};

use crate::error::RulesError;

fn is_land(state: &GameState, tile: Axial) -> bool {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    tile.flat_index(width, height)
        .and_then(|index| state.terrain.get(index))
        .and_then(|&byte| Terrain::from_byte(byte))
        .is_some_and(Terrain::is_land)
}

/// `foundSettlement` (§6): the target tile must be land, and at least
/// Euclidean distance 5 from every existing settlement (the same rule
/// the settler-AI's own candidate search enforces).
///
/// # Errors
///
/// Returns [`RulesError::PlayerNotFound`] if `player_id` is unknown, or
/// [`RulesError::InvalidTile`] if the tile is not land or is too close
/// to an existing settlement.
pub fn found_settlement(state: &mut GameState, player_id: &UserId, q: i32, r: i32) -> Result<(SettlementId, Vec<GameEvent>), RulesError> {
    if state.player(player_id).is_none() {
        return Err(RulesError::PlayerNotFound(player_id.clone()));
    }
    let tile = Axial::new(q, r);
    if !is_land(state, tile) {
        return Err(RulesError::InvalidTile(q, r));
    }
    let far_enough = state.settlements.values().all(|settlement| settlement.position().euclidean_distance(tile) >= 5.0);
    if !far_enough {
        return Err(RulesError::InvalidTile(q, r));
    }

    let settlement_id = state.next_settlement_id();
    #[allow(clippy::cast_possible_truncation)]
    let name = SETTLEMENT_NAME_POOL[settlement_id.value() as usize % SETTLEMENT_NAME_POOL.len()].to_owned();
    let settlement = Settlement::found(settlement_id, player_id.clone(), name, q, r, false);
    state.settlements.insert(settlement_id, settlement);

    let event = GameEvent::SettlementFounded {
        settlement_id,
        owner_id: player_id.clone(),
        q,
        r,
    };
    Ok((settlement_id, vec![event]))
}

/// `constructBuilding` (§6): the settlement must exist and be owned by
/// `player_id`, have a free building slot, and the player must afford
/// the building's production cost. There is no tier gate here — the
/// defs crate's `buildings_available_at_tier` is an unconsumed query,
/// not a validation step this handler applies.
///
/// # Errors
///
/// Returns [`RulesError::SettlementNotFound`], [`RulesError::Forbidden`],
/// [`RulesError::BuildingNotFound`], [`RulesError::NoBuildingSlot`], or
/// [`RulesError::InsufficientResources`].
pub fn construct_building(
    state: &mut GameState,
    settlement_id: SettlementId,
    building_id: &str,
    player_id: &UserId,
) -> Result<Vec<GameEvent>, RulesError> {
    let def = hexrealm_defs::building_def(building_id).ok_or_else(|| RulesError::BuildingNotFound(building_id.to_owned()))?;

    let settlement = state.settlements.get(&settlement_id).ok_or(RulesError::SettlementNotFound(settlement_id))?;
    if &settlement.owner_id != player_id {
        return Err(RulesError::Forbidden(player_id.clone()));
    }
    if settlement.buildings.len() as u32 >= settlement.building_slots {
        return Err(RulesError::NoBuildingSlot(settlement_id));
    }

    let player = state.player(player_id).ok_or_else(|| RulesError::PlayerNotFound(player_id.clone()))?;
    if player.resources.production < def.production_cost {
        return Err(RulesError::InsufficientResources);
    }

    if let Some(player) = state.player_mut(player_id) {
        player.resources.production -= def.production_cost;
    }
    if let Some(settlement) = state.settlements.get_mut(&settlement_id) {
        settlement.buildings.push(building_id.to_owned());
    }

    Ok(vec![GameEvent::BuildingCompleted {
        settlement_id,
        building_id: building_id.to_owned(),
    }])
}

/// `tickSettlements` (§4.E.5): grow an outpost to a settlement at 200
/// owner food, and a settlement to a city at 500 owner food. Growth is
/// gated on the owner's current food stockpile, not a population
/// counter — food is not deducted by growth. Emits no events.
pub fn tick_settlements(state: &mut GameState) -> Vec<GameEvent> {
    let settlement_ids: Vec<SettlementId> = state.settlements.keys().copied().collect();

    for settlement_id in settlement_ids {
        let Some(settlement) = state.settlements.get(&settlement_id) else { continue };
        let Some(owner) = state.player(&settlement.owner_id) else { continue };
        if owner.eliminated {
            continue;
        }

        let next_tier = match settlement.tier {
            hexrealm_types::SettlementTier::Outpost if owner.resources.food >= rust_decimal::Decimal::from(200) => {
                Some(hexrealm_types::SettlementTier::Settlement)
            }
            hexrealm_types::SettlementTier::Settlement if owner.resources.food >= rust_decimal::Decimal::from(500) => {
                Some(hexrealm_types::SettlementTier::City)
            }
            _ => None,
        };

        if let Some(tier) = next_tier {
            if let Some(settlement) = state.settlements.get_mut(&settlement_id) {
                settlement.apply_tier(tier);
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, SettlementTier, Terrain};
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
    fn found_settlement_rejects_tile_within_distance_five() {
        let mut state = one_player_state();
        let capital = state.settlements.values().next().cloned().unwrap_or_else(|| panic!("state must have a settlement"));
        let result = found_settlement(&mut state, &UserId::from("p0"), capital.q + 4, capital.r);
        assert!(result.is_err());
    }

    #[test]
    fn found_settlement_accepts_tile_at_distance_five() {
        let mut state = one_player_state();
        let capital = state.settlements.values().next().cloned().unwrap_or_else(|| panic!("state must have a settlement"));
        let result = found_settlement(&mut state, &UserId::from("p0"), capital.q + 5, capital.r);
        assert!(result.is_ok());
    }

    #[test]
    fn construct_building_fails_without_funds() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        let result = construct_building(&mut state, settlement_id, "granary", &UserId::from("p0"));
        assert_eq!(result, Err(RulesError::InsufficientResources));
    }

    #[test]
    fn construct_building_succeeds_and_deducts_production() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.production = rust_decimal::Decimal::from(100);
        }
        let events = construct_building(&mut state, settlement_id, "granary", &UserId::from("p0"))
            .unwrap_or_else(|_| panic!("construction must succeed with sufficient funds"));
        assert_eq!(events.len(), 1);
        let settlement = state.settlements.get(&settlement_id).unwrap_or_else(|| panic!("settlement must still exist"));
        assert!(settlement.buildings.iter().any(|id| id == "granary"));
    }

    #[test]
    fn settlement_grows_to_settlement_tier_at_two_hundred_food() {
        let mut state = one_player_state();
        let settlement_id = state.settlements.keys().next().copied().unwrap_or_else(|| panic!("state must have a settlement"));
        if let Some(player) = state.player_mut(&UserId::from("p0")) {
            player.resources.food = rust_decimal::Decimal::from(200);
        }
        tick_settlements(&mut state);
        let settlement = state.settlements.get(&settlement_id).unwrap_or_else(|| panic!("settlement must still exist"));
        assert_eq!(settlement.tier, SettlementTier::Settlement);
        assert_eq!(settlement.hp, settlement.max_hp);
    }
}
