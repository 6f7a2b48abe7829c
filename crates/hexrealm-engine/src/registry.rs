//! The process-wide game registry and scheduler (component F, §4.F):
//! `activeGames` plus the handful of procedures the §6 external
//! interface needs to drive it.
//!
//! Mirrors [`hexrealm_bus::EventBus`]'s own registry: a
//! [`tokio::sync::RwLock`] around a [`HashMap`] keyed by id, entries
//! are `Arc`-shared so a lookup can be released before the entry's own
//! lock is taken.

use std::collections::HashMap;
use std::sync::Arc;

use futures::Stream;
use hexrealm_bus::{Cancellation, EventBus, Topic};
use hexrealm_types::{
    ClientPlayerState, GameConfig, GameEvent, GameId, GameSpeed, Policies, ProposeLawOutcome, SettlementId, UnitType, UserId,
};

use crate::error::EngineError;
use crate::handle::GameHandle;

/// Process-wide mapping `gameId -> {manager, timerHandle}` (§4.F),
/// plus the single process-global event bus every registered game's
/// tick loop publishes through.
#[derive(Debug)]
pub struct GameRegistry {
    bus: Arc<EventBus>,
    games: tokio::sync::RwLock<HashMap<GameId, Arc<GameHandle>>>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    /// An empty registry backed by a fresh event bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bus: Arc::new(EventBus::default()),
            games: tokio::sync::RwLock::new(HashMap::new()),
        }
    }

    /// The event bus every registered game publishes through.
    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// `startGame` (§4.F): construct world state from `config`, insert
    /// it, and start its tick loop at `config.speed`'s interval.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Conflict`] if `config.game_id` is
    /// already registered, or a world-construction error (unknown
    /// faction) otherwise.
    pub async fn start_game(&self, config: GameConfig) -> Result<GameId, EngineError> {
        let game_id = config.game_id.clone();
        let mut games = self.games.write().await;
        if games.contains_key(&game_id) {
            return Err(EngineError::Conflict(format!("game {game_id} is already registered")));
        }

        let state = hexrealm_world::create(config)?;
        let handle = GameHandle::new(state);
        handle.spawn_loop(Arc::clone(&self.bus));
        games.insert(game_id.clone(), handle);
        Ok(game_id)
    }

    /// `pauseGame` (§4.F).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] if `game_id` is absent.
    pub async fn pause_game(&self, game_id: &GameId) -> Result<(), EngineError> {
        self.lookup(game_id).await?.pause();
        Ok(())
    }

    /// `resumeGame` (§4.F).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] if `game_id` is absent.
    pub async fn resume_game(&self, game_id: &GameId) -> Result<(), EngineError> {
        self.lookup(game_id).await?.resume();
        Ok(())
    }

    /// `changeSpeed` (§4.F): takes effect on the loop's next sleep.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] if `game_id` is absent.
    pub async fn change_speed(&self, game_id: &GameId, speed: GameSpeed) -> Result<(), EngineError> {
        self.lookup(game_id).await?.set_speed(speed);
        Ok(())
    }

    /// `stopGame` (§4.F): cancel the tick loop and drop the entry. Any
    /// action handler already holding the entry's lock finishes
    /// normally; one newly looking it up after this call observes
    /// "game gone" (§5).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] if `game_id` is absent.
    pub async fn stop_game(&self, game_id: &GameId) -> Result<(), EngineError> {
        let handle = self.games.write().await.remove(game_id).ok_or_else(|| EngineError::GameNotFound(game_id.clone()))?;
        handle.stop().await;
        Ok(())
    }

    /// `getGame` (§4.F): the live handle, if registered. Exposed so a
    /// caller can hold its own reference across several operations
    /// without re-locking the registry each time.
    #[must_use]
    pub async fn get_game(&self, game_id: &GameId) -> Option<Arc<GameHandle>> {
        self.games.read().await.get(game_id).cloned()
    }

    async fn lookup(&self, game_id: &GameId) -> Result<Arc<GameHandle>, EngineError> {
        self.games.read().await.get(game_id).cloned().ok_or_else(|| EngineError::GameNotFound(game_id.clone()))
    }

    /// `subscribe(gameId, playerId, cancel)` (§6): a one-shot
    /// `mapReady` primer plus this player's live tick-snapshot stream.
    /// The primer is read under the game's lock so it reflects the
    /// map at subscription time; the map itself never changes after
    /// construction (§3), so no race with later ticks is possible.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] if `game_id` is absent.
    pub async fn subscribe_player(
        &self,
        game_id: &GameId,
        player_id: &UserId,
        cancellation: Cancellation,
    ) -> Result<(GameEvent, impl Stream<Item = GameEvent>), EngineError> {
        let handle = self.lookup(game_id).await?;
        let map_ready = map_ready_event(&handle).await;
        let stream = self.bus.subscribe(Topic::player(game_id, player_id), cancellation).await;
        Ok((map_ready, stream))
    }

    /// `subscribe(gameId, playerId, cancel)` (§6) for the broadcast
    /// topic: discrete events only, no per-player tick snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] if `game_id` is absent.
    pub async fn subscribe_broadcast(&self, game_id: &GameId, cancellation: Cancellation) -> Result<(GameEvent, impl Stream<Item = GameEvent>), EngineError> {
        let handle = self.lookup(game_id).await?;
        let map_ready = map_ready_event(&handle).await;
        let stream = self.bus.subscribe(Topic::game(game_id), cancellation).await;
        Ok((map_ready, stream))
    }

    /// `buyUnit` (§6).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] or the converted
    /// `RulesError` on validation failure.
    pub async fn buy_unit(&self, game_id: &GameId, player_id: &UserId, settlement_id: SettlementId, unit_type: UnitType) -> Result<(), EngineError> {
        let handle = self.lookup(game_id).await?;
        let mut state = handle.lock().await;
        hexrealm_rules::buy_unit(&mut state, player_id, settlement_id, unit_type)?;
        Ok(())
    }

    /// `buildBuilding` (§6), delegating to §4.E.5's
    /// `constructBuilding`. The resulting `buildingCompleted` event is
    /// published to the broadcast topic immediately rather than
    /// waiting for the next tick, matching how a proposed law's
    /// outcome event is published synchronously in [`Self::propose_law`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] or the converted
    /// `RulesError` on validation failure.
    pub async fn build_building(&self, game_id: &GameId, player_id: &UserId, settlement_id: SettlementId, building_id: &str) -> Result<(), EngineError> {
        let handle = self.lookup(game_id).await?;
        let mut state = handle.lock().await;
        let events = hexrealm_rules::construct_building(&mut state, settlement_id, building_id, player_id)?;
        drop(state);
        self.publish_all(game_id, events).await;
        Ok(())
    }

    /// `foundSettlement`, exposed alongside `buildBuilding` though §6
    /// does not list it as its own RPC; the request gateway's
    /// `buyUnit`-style settler action resolves to this (§4.E.5).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] or [`EngineError::BadRequest`]
    /// if the tile is not a valid founding site.
    pub async fn found_settlement(&self, game_id: &GameId, player_id: &UserId, q: i32, r: i32) -> Result<SettlementId, EngineError> {
        let handle = self.lookup(game_id).await?;
        let mut state = handle.lock().await;
        let (settlement_id, events) = hexrealm_rules::found_settlement(&mut state, player_id, q, r)?;
        drop(state);
        self.publish_all(game_id, events).await;
        Ok(settlement_id)
    }

    /// `setPolicies` (§6).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] or [`EngineError::NotFound`]
    /// if the player does not exist.
    pub async fn set_policies(&self, game_id: &GameId, player_id: &UserId, policies: Policies) -> Result<(), EngineError> {
        let handle = self.lookup(game_id).await?;
        let mut state = handle.lock().await;
        hexrealm_rules::set_policies(&mut state, player_id, policies)?;
        Ok(())
    }

    /// `startResearch` (§6, §4.E.6).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`], [`EngineError::NotFound`],
    /// or [`EngineError::Eliminated`].
    pub async fn start_research(&self, game_id: &GameId, player_id: &UserId, tech_id: &str) -> Result<(), EngineError> {
        let handle = self.lookup(game_id).await?;
        let mut state = handle.lock().await;
        hexrealm_rules::start_research(&mut state, player_id, tech_id)?;
        Ok(())
    }

    /// `proposeLaw` (§6, §4.E.7). Its `lawPassed`/`lawRejected` event
    /// is published to the broadcast topic before this call returns,
    /// so a subscriber learns the outcome without waiting on the next
    /// tick snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`], [`EngineError::NotFound`],
    /// or [`EngineError::BadRequest`] if culture is short.
    pub async fn propose_law(&self, game_id: &GameId, player_id: &UserId, law_id: &str, target_player_id: Option<&UserId>) -> Result<ProposeLawOutcome, EngineError> {
        let handle = self.lookup(game_id).await?;
        let mut state = handle.lock().await;
        let (outcome, events) = hexrealm_rules::propose_law(&mut state, player_id, law_id, target_player_id)?;
        drop(state);
        self.publish_all(game_id, events).await;
        Ok(outcome)
    }

    /// `getPlayerView` (§4.B), for a caller that wants a snapshot
    /// outside the regular tick-publish cadence (e.g. on first
    /// connect, before `subscribe`'s own stream starts producing).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] or [`EngineError::NotFound`]
    /// if the player does not exist.
    pub async fn get_player_view(&self, game_id: &GameId, player_id: &UserId) -> Result<ClientPlayerState, EngineError> {
        let handle = self.lookup(game_id).await?;
        let state = handle.lock().await;
        Ok(hexrealm_world::get_player_view(&state, player_id)?)
    }

    async fn publish_all(&self, game_id: &GameId, events: Vec<GameEvent>) {
        let topic = Topic::game(game_id);
        for event in events {
            self.bus.publish(&topic, event).await;
        }
    }
}

async fn map_ready_event(handle: &GameHandle) -> GameEvent {
    let state = handle.lock().await;
    GameEvent::MapReady {
        width: state.map_width,
        height: state.map_height,
        terrain: state.terrain.clone(),
        elevation: state.elevation.clone(),
    }
}
