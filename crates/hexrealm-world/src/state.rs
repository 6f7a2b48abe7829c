//! The canonical mutable game state and its nested entities (§3).

use std::collections::{BTreeMap, HashMap};

use hexrealm_geometry::Axial;
use hexrealm_types::{
    Advisor, AdvisorType, DiplomacyEntry, DiplomacyStatus, GameId, ImprovementType, Policies,
    ResourceBundle, SettlementId, SettlementTier, UnitId, UnitOwner, UnitState, UnitType, UserId,
};
use rust_decimal::Decimal;

use hexrealm_types::GameSpeed;

/// One human player's mutable, per-game record (§3 `Player`).
#[derive(Debug, Clone)]
pub struct Player {
    /// The player's identifier.
    pub user_id: UserId,
    /// The player's chosen faction.
    pub faction_id: String,
    /// Current resource stockpiles.
    pub resources: ResourceBundle,
    /// This tick's resource income, refreshed each resource-system pass.
    pub resource_income: ResourceBundle,
    /// This tick's resource upkeep, refreshed each resource-system pass.
    pub resource_upkeep: ResourceBundle,
    /// Tunable policy sliders plus combat stance.
    pub policies: Policies,
    /// The five advisor seats, one of each type.
    pub advisors: [Advisor; 5],
    /// Techs already researched, in completion order.
    pub researched_techs: Vec<String>,
    /// Tech currently being researched, if any.
    pub current_research: Option<String>,
    /// Accumulated progress toward `current_research`.
    pub research_progress: Decimal,
    /// Laws already passed, in passage order.
    pub passed_laws: Vec<String>,
    /// Set once the player owns no settlement (§4.E.9).
    pub eliminated: bool,
    /// Per-tile visibility state, `fog_map[r*W + q] ∈ {0,1,2}`.
    pub fog_map: Vec<u8>,
}

impl Player {
    /// A fresh player record: zero resources, neutral advisors, an
    /// all-unexplored fog map of `width * height` tiles.
    #[must_use]
    pub fn new(user_id: UserId, faction_id: String, width: u32, height: u32) -> Self {
        Self {
            user_id,
            faction_id,
            resources: ResourceBundle::zero(),
            resource_income: ResourceBundle::zero(),
            resource_upkeep: ResourceBundle::zero(),
            policies: Policies::default(),
            advisors: AdvisorType::ALL.map(Advisor::new),
            researched_techs: Vec::new(),
            current_research: None,
            research_progress: Decimal::ZERO,
            passed_laws: Vec::new(),
            eliminated: false,
            fog_map: vec![0; (width as usize) * (height as usize)],
        }
    }
}

/// A settlement (§3 `Settlement`).
#[derive(Debug, Clone)]
pub struct Settlement {
    /// The settlement's identifier.
    pub id: SettlementId,
    /// Owning player.
    pub owner_id: UserId,
    /// Display name, drawn from the fixed name pool.
    pub name: String,
    /// Growth tier.
    pub tier: SettlementTier,
    /// Axial column.
    pub q: i32,
    /// Axial row.
    pub r: i32,
    /// Constructed buildings, in construction order.
    pub buildings: Vec<String>,
    /// Number of building slots at the current tier.
    pub building_slots: u32,
    /// Gather radius at the current tier.
    pub gather_radius: u32,
    /// Whether this is its owner's capital.
    pub is_capital: bool,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points at the current tier.
    pub max_hp: u32,
    /// Defense multiplier at the current tier (§4.E.4 terrain/defense).
    pub defense: f64,
}

impl Settlement {
    /// A freshly founded settlement at [`SettlementTier::Outpost`],
    /// stats drawn from the tier definition table.
    #[must_use]
    pub fn found(id: SettlementId, owner_id: UserId, name: String, q: i32, r: i32, is_capital: bool) -> Self {
        let tier_def = hexrealm_defs::settlement_tier_def(SettlementTier::Outpost);
        Self {
            id,
            owner_id,
            name,
            tier: SettlementTier::Outpost,
            q,
            r,
            buildings: Vec::new(),
            building_slots: tier_def.building_slots,
            gather_radius: tier_def.gather_radius,
            is_capital,
            hp: tier_def.max_hp,
            max_hp: tier_def.max_hp,
            defense: tier_def.defense,
        }
    }

    /// Refresh tier-derived stats after growth and fully heal (§4.E.5:
    /// "upgrade slots, gatherRadius, maxHp, defense to the new tier and
    /// fully heal").
    pub fn apply_tier(&mut self, tier: SettlementTier) {
        let tier_def = hexrealm_defs::settlement_tier_def(tier);
        self.tier = tier;
        self.building_slots = tier_def.building_slots;
        self.gather_radius = tier_def.gather_radius;
        self.max_hp = tier_def.max_hp;
        self.defense = tier_def.defense;
        self.hp = tier_def.max_hp;
    }

    /// This settlement's axial position.
    #[must_use]
    pub const fn position(&self) -> Axial {
        Axial::new(self.q, self.r)
    }
}

/// A unit, player-owned or neutral (§3 `Unit`).
#[derive(Debug, Clone)]
pub struct Unit {
    /// The unit's identifier, unique within this game's owning map
    /// (`units` or `neutral_units`).
    pub id: UnitId,
    /// Unit archetype.
    pub unit_type: UnitType,
    /// Owner: a human player or a neutral camp.
    pub owner: UnitOwner,
    /// Axial column.
    pub q: i32,
    /// Axial row.
    pub r: i32,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Hunger, 0..=100 (§3 invariant 3).
    pub hunger: u8,
    /// Safety, 0..=100, recomputed by the unit-AI system each tick.
    pub safety: u8,
    /// Combat strength; always 0 for a settler (§3 invariant 7).
    pub strength: u32,
    /// Vision radius in hexes.
    pub vision_range: u32,
    /// Current movement speed (may be reduced by the food crisis).
    pub move_speed: u32,
    /// Current activity state.
    pub state: UnitState,
    /// Movement target column, if moving/gathering/building/returning.
    pub target_q: Option<i32>,
    /// Movement target row, if moving/gathering/building/returning.
    pub target_r: Option<i32>,
}

impl Unit {
    /// A fresh unit of `unit_type`, stats drawn from the static unit
    /// definition table, placed at `(q, r)` in `Idle` state (§6 `buyUnit`).
    #[must_use]
    pub fn from_def(id: UnitId, unit_type: UnitType, owner: UnitOwner, q: i32, r: i32) -> Self {
        let def = hexrealm_defs::unit_def(unit_type);
        Self {
            id,
            unit_type,
            owner,
            q,
            r,
            hp: def.max_hp,
            max_hp: def.max_hp,
            hunger: 0,
            safety: 100,
            strength: def.strength,
            vision_range: def.vision_range,
            move_speed: def.move_speed,
            state: UnitState::Idle,
            target_q: None,
            target_r: None,
        }
    }

    /// A neutral unit with explicit stats, used by the initial spawn
    /// (§4.E.10 animal/barbarian stat blocks, which do not match any
    /// playable unit definition).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn neutral(
        id: UnitId,
        unit_type: UnitType,
        owner: UnitOwner,
        q: i32,
        r: i32,
        strength: u32,
        max_hp: u32,
        vision_range: u32,
        move_speed: u32,
    ) -> Self {
        Self {
            id,
            unit_type,
            owner,
            q,
            r,
            hp: max_hp,
            max_hp,
            hunger: 0,
            safety: 100,
            strength,
            vision_range,
            move_speed,
            state: UnitState::Idle,
            target_q: None,
            target_r: None,
        }
    }

    /// This unit's axial position.
    #[must_use]
    pub const fn position(&self) -> Axial {
        Axial::new(self.q, self.r)
    }
}

/// The authoritative state of one match (§3 `GameState`).
#[derive(Debug, Clone)]
pub struct GameState {
    /// The match identifier.
    pub game_id: GameId,
    /// Current tick counter; advances once per non-paused pipeline run.
    pub tick: u64,
    /// Current tick-rate multiplier.
    pub speed: GameSpeed,
    /// Whether the tick pipeline is currently suspended.
    pub paused: bool,
    /// Map width in tiles.
    pub map_width: u32,
    /// Map height in tiles.
    pub map_height: u32,
    /// Flattened fine-taxonomy terrain bytes, immutable after construction.
    pub terrain: Vec<u8>,
    /// Flattened elevation bytes, immutable after construction.
    pub elevation: Vec<u8>,
    /// Human players, in join order.
    pub players: Vec<Player>,
    /// Settlements, keyed by id (ids are monotonic, so iteration order
    /// matches creation order).
    pub settlements: BTreeMap<SettlementId, Settlement>,
    /// Player-owned units.
    pub units: BTreeMap<UnitId, Unit>,
    /// Neutral (animal/barbarian) units.
    pub neutral_units: BTreeMap<UnitId, Unit>,
    /// Tile improvements, keyed by tile.
    pub improvements: HashMap<Axial, ImprovementType>,
    /// Diplomacy entries, in creation order; absence of a pair is
    /// implicit peace (§3 invariant 6).
    pub diplomacy: Vec<DiplomacyEntry>,
    /// Barbarian camp tiles, in placement order.
    pub barbarian_camps: Vec<Axial>,
    next_settlement_id: u64,
    next_unit_id: u64,
}

impl GameState {
    /// Mint the next settlement id for this game.
    pub fn next_settlement_id(&mut self) -> SettlementId {
        let id = SettlementId(self.next_settlement_id);
        self.next_settlement_id += 1;
        id
    }

    /// Mint the next unit id for this game, shared between `units` and
    /// `neutral_units` so ids never collide across the two maps.
    pub fn next_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    /// Look up a player by id.
    #[must_use]
    pub fn player(&self, user_id: &UserId) -> Option<&Player> {
        self.players.iter().find(|player| &player.user_id == user_id)
    }

    /// Look up a player by id, mutably.
    pub fn player_mut(&mut self, user_id: &UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| &player.user_id == user_id)
    }

    /// The diplomatic status between two players; absence of an entry
    /// is implicit peace (§3 `diplomacy`).
    #[must_use]
    pub fn diplomacy_status(&self, a: &UserId, b: &UserId) -> DiplomacyStatus {
        self.diplomacy
            .iter()
            .find(|entry| entry.matches(a, b))
            .map_or(DiplomacyStatus::Peace, |entry| entry.status)
    }

    /// Set the diplomatic status between two players, inserting a new
    /// entry if none exists yet (§3 invariant 6: at most one entry per
    /// unordered pair).
    pub fn set_diplomacy_status(&mut self, a: &UserId, b: &UserId, status: DiplomacyStatus) {
        if let Some(entry) = self.diplomacy.iter_mut().find(|entry| entry.matches(a, b)) {
            entry.status = status;
        } else {
            self.diplomacy.push(DiplomacyEntry {
                player_a: a.clone(),
                player_b: b.clone(),
                status,
            });
        }
    }

    /// All units, player-owned and neutral, as an iterator of references.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values().chain(self.neutral_units.values())
    }

    /// Whether `owner_id` owns at least one settlement (§4.E.9
    /// `checkElimination`).
    #[must_use]
    pub fn owns_any_settlement(&self, owner_id: &UserId) -> bool {
        self.settlements.values().any(|settlement| &settlement.owner_id == owner_id)
    }
}

/// Internal constructor, used only by [`crate::construction::create`];
/// kept crate-private so every `GameState` is always built through the
/// validated construction path.
pub(crate) fn new_empty(
    game_id: GameId,
    speed: GameSpeed,
    map_width: u32,
    map_height: u32,
    terrain: Vec<u8>,
    elevation: Vec<u8>,
) -> GameState {
    GameState {
        game_id,
        tick: 0,
        speed,
        paused: false,
        map_width,
        map_height,
        terrain,
        elevation,
        players: Vec::new(),
        settlements: BTreeMap::new(),
        units: BTreeMap::new(),
        neutral_units: BTreeMap::new(),
        improvements: HashMap::new(),
        diplomacy: Vec::new(),
        barbarian_camps: Vec::new(),
        next_settlement_id: 0,
        next_unit_id: 0,
    }
}
