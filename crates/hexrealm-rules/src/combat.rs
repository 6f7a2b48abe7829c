//! Combat system: adjacency-driven, symmetric damage between hostile
//! units (§4.E.4).

use std::collections::HashSet;

use hexrealm_geometry::Axial;
use hexrealm_types::{CoarseTerrain, DiplomacyStatus, GameEvent, UnitId, UnitOwner};
use rand::Rng;

use hexrealm_world::{GameState, Unit};

/// Run the combat system for one tick (§4.E.4), drawing the random
/// factor from the platform's non-deterministic PRNG.
pub fn tick_combat(state: &mut GameState) -> Vec<GameEvent> {
    let mut rng = rand::rng();
    tick_combat_with_random(state, || rng.random_range(0.8..=1.2))
}

/// Run the combat system for one tick with an injectable random source,
/// so the damage formula's `randomFactor` term can be pinned for tests
/// (§4.E.4 "An injectable random source allows deterministic tests").
pub fn tick_combat_with_random(state: &mut GameState, mut random_factor: impl FnMut() -> f64) -> Vec<GameEvent> {
    let pairs = combat_pairs(state);
    let mut events = Vec::with_capacity(pairs.len() * 2);

    for (a_id, b_id) in pairs {
        let (Some(unit_a), Some(unit_b)) = (find_unit(state, a_id).cloned(), find_unit(state, b_id).cloned()) else {
            continue;
        };
        let damage_ab = compute_damage(state, &unit_a, &unit_b, &mut random_factor);
        let damage_ba = compute_damage(state, &unit_b, &unit_a, &mut random_factor);
        apply_damage(state, b_id, damage_ab);
        apply_damage(state, a_id, damage_ba);
        let killed_b = find_unit(state, b_id).is_none_or(|unit| unit.hp == 0);
        let killed_a = find_unit(state, a_id).is_none_or(|unit| unit.hp == 0);
        events.push(GameEvent::CombatResult {
            attacker_id: a_id,
            defender_id: b_id,
            damage: damage_ab,
            killed: killed_b,
        });
        events.push(GameEvent::CombatResult {
            attacker_id: b_id,
            defender_id: a_id,
            damage: damage_ba,
            killed: killed_a,
        });
    }

    remove_dead(state);
    events
}

/// Every unordered pair of adjacent, hostile units that should fight
/// this tick (§4.E.4 steps 1-2).
fn combat_pairs(state: &GameState) -> Vec<(UnitId, UnitId)> {
    let entities: Vec<(UnitId, UnitOwner, Axial, u32)> =
        state.all_units().map(|unit| (unit.id, unit.owner.clone(), unit.position(), unit.strength)).collect();

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for (i, (id_a, owner_a, pos_a, str_a)) in entities.iter().enumerate() {
        for (id_b, owner_b, pos_b, str_b) in entities.iter().skip(i + 1) {
            if owner_a == owner_b {
                continue;
            }
            if pos_a.distance(*pos_b) > 1 {
                continue;
            }
            if !should_fight(state, owner_a, owner_b, *str_a, *str_b) {
                continue;
            }
            let key = if id_a < id_b { (*id_a, *id_b) } else { (*id_b, *id_a) };
            if seen.insert(key) {
                pairs.push(key);
            }
        }
    }
    pairs
}

/// `shouldFight` (§4.E.4): both sides must have positive strength, and
/// either side is non-player (neutrals are always hostile), or the two
/// players are at war.
fn should_fight(state: &GameState, owner_a: &UnitOwner, owner_b: &UnitOwner, str_a: u32, str_b: u32) -> bool {
    if str_a == 0 || str_b == 0 {
        return false;
    }
    if owner_a.is_neutral() || owner_b.is_neutral() {
        return true;
    }
    match (owner_a.player(), owner_b.player()) {
        (Some(a), Some(b)) => state.diplomacy_status(a, b) == DiplomacyStatus::War,
        _ => false,
    }
}

fn find_unit(state: &GameState, id: UnitId) -> Option<&Unit> {
    state.units.get(&id).or_else(|| state.neutral_units.get(&id))
}

fn apply_damage(state: &mut GameState, id: UnitId, damage: u32) {
    if let Some(unit) = state.units.get_mut(&id).or_else(|| state.neutral_units.get_mut(&id)) {
        unit.hp = unit.hp.saturating_sub(damage);
    }
}

fn remove_dead(state: &mut GameState) {
    state.units.retain(|_, unit| unit.hp > 0);
    state.neutral_units.retain(|_, unit| unit.hp > 0);
}

/// Count `attacker`'s own allies (same owner, any unit including
/// neutrals) within axial distance `<= 2`, excluding itself, for the
/// damage formula's `groupMod` term.
fn ally_count_within(state: &GameState, attacker_id: UnitId, attacker_owner: &UnitOwner, pos: Axial) -> usize {
    state
        .all_units()
        .filter(|unit| unit.id != attacker_id && &unit.owner == attacker_owner && pos.distance(unit.position()) <= 2)
        .count()
}

/// The defender terrain's defense divisor under the coarse taxonomy,
/// reading the same raw byte array the movement system does (§4.E.4,
/// §9 "Terrain taxonomy confusion"). Out-of-bounds or an unrecognised
/// byte defaults to plains (`1.0`).
fn defender_terrain_defense(state: &GameState, tile: Axial) -> f64 {
    let width = i32::try_from(state.map_width).unwrap_or(i32::MAX);
    let height = i32::try_from(state.map_height).unwrap_or(i32::MAX);
    tile.flat_index(width, height)
        .and_then(|index| state.terrain.get(index))
        .and_then(|&byte| CoarseTerrain::from_byte(byte))
        .map_or(1.0, CoarseTerrain::defense)
}

/// One direction's damage (§4.E.4 damage formula):
/// `baseStrength · terrainMod · healthMod · groupMod · randomFactor`,
/// floored at `1`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn compute_damage(state: &GameState, attacker: &Unit, defender: &Unit, random_factor: &mut impl FnMut() -> f64) -> u32 {
    if attacker.strength == 0 {
        return 0;
    }
    let terrain_mod = 1.0 / defender_terrain_defense(state, defender.position());
    let health_mod = f64::from(attacker.hp) / f64::from(attacker.max_hp.max(1));
    let allies = ally_count_within(state, attacker.id, &attacker.owner, attacker.position());
    #[allow(clippy::cast_precision_loss)]
    let group_mod = 1.0 + 0.1 * allies as f64;
    let raw = f64::from(attacker.strength) * terrain_mod * health_mod * group_mod * random_factor();
    // `rounded` is clamped into u32 range immediately before the cast.
    let rounded = raw.round().max(1.0);
    rounded.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, GameId, GameSpeed, PlayerConfig, Terrain, UnitOwner, UnitType, UserId};
    use hexrealm_world::create;

    use super::*;

    fn two_player_state() -> GameState {
        let width = 10;
        let height = 10;
        let config = GameConfig {
            game_id: GameId::from("g"),
            map_width: width,
            map_height: height,
            terrain: vec![Terrain::Plains as u8; (width * height) as usize],
            elevation: vec![50u8; (width * height) as usize],
            players: vec![
                PlayerConfig { user_id: UserId::from("p0"), faction_id: "solari".to_owned() },
                PlayerConfig { user_id: UserId::from("p1"), faction_id: "kesh".to_owned() },
            ],
            speed: GameSpeed::Normal,
        };
        create(config).unwrap_or_else(|_| panic!("test fixture construction must succeed"))
    }

    #[test]
    fn at_peace_adjacent_warriors_do_not_fight() {
        let mut state = two_player_state();
        let id_a = state.next_unit_id();
        let mut unit_a = hexrealm_world::Unit::from_def(id_a, UnitType::Warrior, UnitOwner::Player(UserId::from("p0")), 5, 5);
        unit_a.hp = unit_a.max_hp;
        let id_b = state.next_unit_id();
        let mut unit_b = hexrealm_world::Unit::from_def(id_b, UnitType::Warrior, UnitOwner::Player(UserId::from("p1")), 6, 5);
        unit_b.hp = unit_b.max_hp;
        state.units.insert(id_a, unit_a);
        state.units.insert(id_b, unit_b);
        let events = tick_combat_with_random(&mut state, || 1.0);
        assert!(events.is_empty());
    }

    #[test]
    fn at_war_adjacent_warriors_fight_symmetrically() {
        let mut state = two_player_state();
        state.set_diplomacy_status(&UserId::from("p0"), &UserId::from("p1"), DiplomacyStatus::War);
        let id_a = state.next_unit_id();
        let mut unit_a = hexrealm_world::Unit::from_def(id_a, UnitType::Warrior, UnitOwner::Player(UserId::from("p0")), 5, 5);
        unit_a.hp = 5;
        unit_a.max_hp = 5;
        let id_b = state.next_unit_id();
        let mut unit_b = hexrealm_world::Unit::from_def(id_b, UnitType::Warrior, UnitOwner::Player(UserId::from("p1")), 6, 5);
        unit_b.hp = 5;
        unit_b.max_hp = 5;
        state.units.insert(id_a, unit_a);
        state.units.insert(id_b, unit_b);
        let events = tick_combat_with_random(&mut state, || 1.0);
        assert_eq!(events.len(), 2);
        assert!(state.units.get(&id_a).is_none());
        assert!(state.units.get(&id_b).is_none());
    }

    #[test]
    fn neutral_units_always_fight_regardless_of_diplomacy() {
        let mut state = two_player_state();
        let id_a = state.next_unit_id();
        let unit_a = hexrealm_world::Unit::neutral(id_a, UnitType::Warrior, UnitOwner::Neutral(hexrealm_types::NeutralOwner::Barbarian), 5, 5, 8, 30, 3, 1);
        let id_b = state.next_unit_id();
        let unit_b = hexrealm_world::Unit::from_def(id_b, UnitType::Warrior, UnitOwner::Player(UserId::from("p0")), 6, 5);
        state.neutral_units.insert(id_a, unit_a);
        state.units.insert(id_b, unit_b);
        let events = tick_combat_with_random(&mut state, || 1.0);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn settlers_never_fight() {
        let mut state = two_player_state();
        state.set_diplomacy_status(&UserId::from("p0"), &UserId::from("p1"), DiplomacyStatus::War);
        let id_a = state.next_unit_id();
        let unit_a = hexrealm_world::Unit::from_def(id_a, UnitType::Settler, UnitOwner::Player(UserId::from("p0")), 5, 5);
        let id_b = state.next_unit_id();
        let unit_b = hexrealm_world::Unit::from_def(id_b, UnitType::Warrior, UnitOwner::Player(UserId::from("p1")), 6, 5);
        state.units.insert(id_a, unit_a);
        state.units.insert(id_b, unit_b);
        let events = tick_combat_with_random(&mut state, || 1.0);
        assert!(events.is_empty());
    }
}
