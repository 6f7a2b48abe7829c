//! Unit-AI system: hunger/safety bookkeeping, per-type action selection,
//! and the builder placement sub-step (§4.E.2).

use hexrealm_geometry::Axial;
use hexrealm_types::{GameEvent, Terrain, UnitId, UnitOwner, UnitState, UnitType, UserId};

use hexrealm_defs::SETTLEMENT_NAME_POOL;
use hexrealm_world::{GameState, Player, Settlement, Unit};

struct UnitIntent {
    unit_id: UnitId,
    hunger: u8,
    safety: u8,
    state: UnitState,
    target_q: Option<i32>,
    target_r: Option<i32>,
}

/// Run the unit-AI system for one tick, followed by the builder placement
/// and settler founding sub-steps (§4.E.2). Emits [`GameEvent::SettlementFounded`]
/// for any settler that founds this tick.
pub fn tick_unit_ai(state: &mut GameState) -> Vec<GameEvent> {
    let intents = compute_intents(state);
    for intent in intents {
        if let Some(unit) = state.units.get_mut(&intent.unit_id) {
            unit.hunger = intent.hunger;
            unit.safety = intent.safety;
            unit.state = intent.state;
            unit.target_q = intent.target_q;
            unit.target_r = intent.target_r;
        }
    }
    tick_builder_improvements(state);
    tick_settler_founding(state)
}

fn compute_intents(state: &GameState) -> Vec<UnitIntent> {
    let mut intents = Vec::new();
    for player in state.players.iter().filter(|player| !player.eliminated) {
        let unit_ids: Vec<UnitId> =
            state.units.values().filter(|unit| unit.owner.player() == Some(&player.user_id)).map(|unit| unit.id).collect();
        for unit_id in unit_ids {
            if let Some(unit) = state.units.get(&unit_id) {
                intents.push(compute_intent(state, player, unit));
            }
        }
    }
    intents
}

fn is_hostile(state: &GameState, self_owner: &UserId, other: &Unit) -> bool {
    match &other.owner {
        UnitOwner::Neutral(_) => true,
        UnitOwner::Player(other_id) => {
            other_id != self_owner && state.diplomacy_status(self_owner, other_id) == hexrealm_types::DiplomacyStatus::War
        }
    }
}

fn visible_hostiles<'a>(state: &'a GameState, self_owner: &UserId, unit: &Unit) -> Vec<&'a Unit> {
    state
        .all_units()
        .filter(|other| other.id != unit.id)
        .filter(|other| is_hostile(state, self_owner, other))
        .filter(|other| unit.position().euclidean_distance(other.position()) <= f64::from(unit.vision_range))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn recompute_safety(unit: &Unit, hostiles: &[&Unit]) -> u8 {
    let vision_range = f64::from(unit.vision_range).max(1.0);
    let mut safety = 100.0_f64;
    for hostile in hostiles {
        let dist = unit.position().euclidean_distance(hostile.position());
        let strength_ratio = f64::from(hostile.strength) / f64::from(unit.strength.max(1));
        safety -= strength_ratio * 20.0 * ((vision_range - dist + 1.0) / vision_range);
    }
    // `safety` is clamped to [0, 100] immediately before the cast.
    safety.round().clamp(0.0, 100.0) as u8
}

fn nearest_own_settlement(state: &GameState, owner_id: &UserId, from: Axial) -> Option<Axial> {
    state
        .settlements
        .values()
        .filter(|settlement| &settlement.owner_id == owner_id)
        .map(|settlement| settlement.position())
        .min_by(|a, b| from.euclidean_distance(*a).total_cmp(&from.euclidean_distance(*b)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn retreat_target(state: &GameState, unit: &Unit, hostiles: &[&Unit]) -> Axial {
    let current = unit.position();
    if hostiles.is_empty() {
        return current;
    }
    let count = hostiles.len() as f64;
    let mean_q = hostiles.iter().map(|hostile| f64::from(hostile.q)).sum::<f64>() / count;
    let mean_r = hostiles.iter().map(|hostile| f64::from(hostile.r)).sum::<f64>() / count;

    let dq = f64::from(current.q) - mean_q;
    let dr = f64::from(current.r) - mean_r;
    let length = dq.hypot(dr);
    if length < f64::EPSILON {
        return current;
    }
    let scale = f64::from(unit.move_speed.max(1));
    let new_q = f64::from(current.q) + (dq / length) * scale;
    let new_r = f64::from(current.r) + (dr / length) * scale;

    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX).saturating_sub(1).max(0);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX).saturating_sub(1).max(0);
    // Map coordinates never approach i32's range; the round-trip through
    // i32 is exact for any in-bounds tile.
    let clamped_q = (new_q.round() as i32).clamp(0, width);
    let clamped_r = (new_r.round() as i32).clamp(0, height);
    Axial::new(clamped_q, clamped_r)
}

fn raw_terrain_byte(state: &GameState, tile: Axial) -> Option<u8> {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    tile.flat_index(width, height).and_then(|index| state.terrain.get(index)).copied()
}

fn is_land_tile(state: &GameState, tile: Axial) -> bool {
    raw_terrain_byte(state, tile).and_then(Terrain::from_byte).is_some_and(Terrain::is_land)
}

/// The builder-execution gatherer/builder terrain check uses literal byte
/// values (forest = 3, hills = 2), which do not line up with either the
/// ten-value fine taxonomy or the six-value coarse taxonomy's variant
/// names — a preserved quirk, not a bug.
fn is_gatherer_forest_tile(state: &GameState, tile: Axial) -> bool {
    raw_terrain_byte(state, tile) == Some(3)
}

fn nearest_unexplored_tile(state: &GameState, player: &Player, from: Axial) -> Option<Axial> {
    let width = i32::try_from(state.map_width).unwrap_or(0);
    let height = i32::try_from(state.map_height).unwrap_or(0);
    let mut best: Option<(Axial, f64)> = None;
    for r in 0..height {
        for q in 0..width {
            let tile = Axial::new(q, r);
            let Some(index) = tile.flat_index(width, height) else { continue };
            if player.fog_map.get(index).copied().unwrap_or(0) != 0 {
                continue;
            }
            let dist = from.euclidean_distance(tile);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((tile, dist));
            }
        }
    }
    best.map(|(tile, _)| tile)
}

fn gather_candidates(state: &GameState, owner_id: &UserId) -> Vec<Axial> {
    let mut tiles = Vec::new();
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    for settlement in state.settlements.values().filter(|settlement| &settlement.owner_id == owner_id) {
        let centre = settlement.position();
        for tile in centre.euclidean_disc(f64::from(settlement.gather_radius), width, height) {
            if tile != centre {
                tiles.push(tile);
            }
        }
    }
    tiles
}

fn nearest_gather_tile(state: &GameState, owner_id: &UserId, from: Axial) -> Option<Axial> {
    let candidates = gather_candidates(state, owner_id);
    let forest = candidates
        .iter()
        .copied()
        .filter(|&tile| is_gatherer_forest_tile(state, tile))
        .min_by(|a, b| from.euclidean_distance(*a).total_cmp(&from.euclidean_distance(*b)));
    forest.or_else(|| {
        candidates.into_iter().filter(|&tile| is_land_tile(state, tile)).min_by(|a, b| {
            from.euclidean_distance(*a).total_cmp(&from.euclidean_distance(*b))
        })
    })
}

fn patrol_tile(state: &GameState, owner_id: &UserId, from: Axial) -> Option<Axial> {
    let centre = nearest_own_settlement(state, owner_id, from)?;
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    // "Exactly patrol-radius 3" read as nearest-integer Euclidean distance,
    // since a hex grid rarely lands a tile on an exact radius of 3.0.
    centre
        .euclidean_disc(3.5, width, height)
        .into_iter()
        .filter(|&tile| (centre.euclidean_distance(tile).round() - 3.0).abs() < f64::EPSILON)
        .filter(|&tile| is_land_tile(state, tile))
        .min_by(|a, b| from.euclidean_distance(*a).total_cmp(&from.euclidean_distance(*b)))
}

fn settle_candidate(state: &GameState, from: Axial) -> Option<Axial> {
    let width = i32::try_from(state.map_width).unwrap_or(0);
    let height = i32::try_from(state.map_height).unwrap_or(0);
    let mut best: Option<(Axial, f64)> = None;
    for r in 0..height {
        for q in 0..width {
            let tile = Axial::new(q, r);
            if !is_land_tile(state, tile) {
                continue;
            }
            let far_enough = state.settlements.values().all(|settlement| settlement.position().distance(tile) >= 5);
            if !far_enough {
                continue;
            }
            let dist = from.euclidean_distance(tile);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((tile, dist));
            }
        }
    }
    best.map(|(tile, _)| tile)
}

fn nearest_hostile(hostiles: &[&Unit], from: Axial) -> Option<Axial> {
    hostiles.iter().map(|hostile| hostile.position()).min_by(|a, b| from.euclidean_distance(*a).total_cmp(&from.euclidean_distance(*b)))
}

#[allow(clippy::too_many_lines)]
fn compute_intent(state: &GameState, player: &Player, unit: &Unit) -> UnitIntent {
    let hunger = unit.hunger.saturating_add(1).min(100);
    let hostiles = visible_hostiles(state, &player.user_id, unit);
    let safety = recompute_safety(unit, &hostiles);
    let from = unit.position();

    if hunger > 80 {
        return match nearest_own_settlement(state, &player.user_id, from) {
            Some(target) => moving_intent(unit.id, hunger, safety, UnitState::Returning, target),
            None => idle_intent(unit.id, hunger, safety),
        };
    }

    let faction = hexrealm_defs::faction(&player.faction_id).ok();
    let safety_modifier = faction.map_or(1.0, |faction| f64::from(faction.ai_modifiers.safety));
    let threshold = 20.0 * safety_modifier * (1.0 - f64::from(player.policies.aggression) / 200.0);
    if f64::from(safety) < threshold {
        let target = retreat_target(state, unit, &hostiles);
        return if target == from {
            idle_intent(unit.id, hunger, safety)
        } else {
            moving_intent(unit.id, hunger, safety, UnitState::Moving, target)
        };
    }

    match unit.unit_type {
        UnitType::Scout => match nearest_unexplored_tile(state, player, from) {
            Some(target) => moving_intent(unit.id, hunger, safety, UnitState::Moving, target),
            None => idle_intent(unit.id, hunger, safety),
        },
        UnitType::Gatherer => match nearest_gather_tile(state, &player.user_id, from) {
            Some(target) => moving_intent(unit.id, hunger, safety, UnitState::Gathering, target),
            None => idle_intent(unit.id, hunger, safety),
        },
        UnitType::Warrior => {
            if let Some(target) = nearest_hostile(&hostiles, from) {
                moving_intent(unit.id, hunger, safety, UnitState::Fighting, target)
            } else {
                match patrol_tile(state, &player.user_id, from) {
                    Some(target) => moving_intent(unit.id, hunger, safety, UnitState::Moving, target),
                    None => idle_intent(unit.id, hunger, safety),
                }
            }
        }
        UnitType::Settler => match settle_candidate(state, from) {
            Some(target) => moving_intent(unit.id, hunger, safety, UnitState::Moving, target),
            None => idle_intent(unit.id, hunger, safety),
        },
        UnitType::Builder => match nearest_buildable_tile(state, &player.user_id, from) {
            Some(target) => moving_intent(unit.id, hunger, safety, UnitState::Building, target),
            None => idle_intent(unit.id, hunger, safety),
        },
    }
}

fn nearest_buildable_tile(state: &GameState, owner_id: &UserId, from: Axial) -> Option<Axial> {
    gather_candidates(state, owner_id)
        .into_iter()
        .filter(|&tile| is_land_tile(state, tile) && !state.improvements.contains_key(&tile))
        .min_by(|a, b| from.euclidean_distance(*a).total_cmp(&from.euclidean_distance(*b)))
}

fn idle_intent(unit_id: UnitId, hunger: u8, safety: u8) -> UnitIntent {
    UnitIntent {
        unit_id,
        hunger,
        safety,
        state: UnitState::Idle,
        target_q: None,
        target_r: None,
    }
}

fn moving_intent(unit_id: UnitId, hunger: u8, safety: u8, state: UnitState, target: Axial) -> UnitIntent {
    UnitIntent {
        unit_id,
        hunger,
        safety,
        state,
        target_q: Some(target.q),
        target_r: Some(target.r),
    }
}

/// Builder placement sub-step (§4.E.2 `tickBuilderImprovements`): a
/// builder already at its target with `state == Building` places an
/// improvement and returns to idle.
fn tick_builder_improvements(state: &mut GameState) {
    let builder_ids: Vec<UnitId> = state
        .units
        .values()
        .filter(|unit| unit.unit_type == UnitType::Builder && unit.state == UnitState::Building)
        .filter(|unit| unit.target_q == Some(unit.q) && unit.target_r == Some(unit.r))
        .map(|unit| unit.id)
        .collect();

    for unit_id in builder_ids {
        let Some(unit) = state.units.get(&unit_id) else { continue };
        let tile = unit.position();
        if state.improvements.contains_key(&tile) {
            if let Some(unit) = state.units.get_mut(&unit_id) {
                unit.state = UnitState::Idle;
                unit.target_q = None;
                unit.target_r = None;
            }
            continue;
        }
        let improvement = match raw_terrain_byte(state, tile) {
            Some(3) => hexrealm_types::ImprovementType::FarmImprovement,
            Some(2) => hexrealm_types::ImprovementType::Mine,
            _ => hexrealm_types::ImprovementType::Road,
        };
        state.improvements.insert(tile, improvement);
        if let Some(unit) = state.units.get_mut(&unit_id) {
            unit.state = UnitState::Idle;
            unit.target_q = None;
            unit.target_r = None;
        }
    }
}

/// Settler founding sub-step: a settler already on its target tile with
/// `state == Moving` (`settle_candidate` picks the settler's own tile
/// once it sits on a valid site, so intent and arrival coincide the
/// same tick) founds a settlement there and is consumed (§4.E.2/§4.E.5
/// `foundSettlement`, standard convention that the founding unit does
/// not survive its own settlement).
fn tick_settler_founding(state: &mut GameState) -> Vec<GameEvent> {
    let settler_ids: Vec<UnitId> = state
        .units
        .values()
        .filter(|unit| unit.unit_type == UnitType::Settler && unit.state == UnitState::Moving)
        .filter(|unit| unit.target_q == Some(unit.q) && unit.target_r == Some(unit.r))
        .map(|unit| unit.id)
        .collect();

    let mut events = Vec::new();
    for unit_id in settler_ids {
        let Some(unit) = state.units.get(&unit_id) else { continue };
        let owner_id = match &unit.owner {
            UnitOwner::Player(owner_id) => owner_id.clone(),
            UnitOwner::Neutral(_) => continue,
        };
        let tile = unit.position();
        if !is_land_tile(state, tile) {
            continue;
        }
        let far_enough = state.settlements.values().all(|settlement| settlement.position().distance(tile) >= 5);
        if !far_enough {
            continue;
        }

        let settlement_id = state.next_settlement_id();
        #[allow(clippy::cast_possible_truncation)]
        let name = SETTLEMENT_NAME_POOL[settlement_id.value() as usize % SETTLEMENT_NAME_POOL.len()].to_owned();
        let settlement = Settlement::found(settlement_id, owner_id.clone(), name, tile.q, tile.r, false);
        state.settlements.insert(settlement_id, settlement);
        state.units.remove(&unit_id);

        events.push(GameEvent::SettlementFounded {
            settlement_id,
            owner_id,
            q: tile.q,
            r: tile.r,
        });
    }
    events
}
