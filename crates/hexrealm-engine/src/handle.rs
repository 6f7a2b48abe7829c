//! Per-game runtime handle: owns the state, its tick loop task, and the
//! pause/resume/speed controls the loop reads (§4.F).
//!
//! Lock-free atomics on the hot path, a [`Notify`] to wake a sleeping
//! loop on resume, and a [`Mutex`] only around the state the loop
//! actually mutates.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hexrealm_types::{GameEvent, GameId, GameSpeed, UserId};
use hexrealm_world::GameState;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use hexrealm_bus::{EventBus, Topic};

/// A running game: its state behind a single-writer lock, plus the
/// atomics its tick loop polls every iteration.
#[derive(Debug)]
pub struct GameHandle {
    game_id: GameId,
    state: Mutex<GameState>,
    paused: AtomicBool,
    /// Encodes [`GameSpeed`] as its `interval_ms()` so the loop can read
    /// it lock-free; converted back via [`speed_from_interval_ms`].
    speed_interval_ms: AtomicU64,
    resume: Notify,
    /// Populated once [`GameHandle::spawn_loop`] starts the tick task;
    /// `stop` aborts it. A plain `std::sync::Mutex` rather than
    /// `tokio::sync::Mutex` so `spawn_loop` can store the handle
    /// synchronously before it returns, with no second spawned task and
    /// no window for `stop` to race ahead of the store.
    loop_handle: std::sync::Mutex<Option<JoinHandle<()>>>,
    /// Wall-clock moment this handle was created, for operator-facing
    /// "how long has this game been running" bookkeeping.
    started_at: DateTime<Utc>,
}

impl GameHandle {
    /// Wrap `state` in a fresh, unpaused handle at its configured speed.
    #[must_use]
    pub fn new(state: GameState) -> Arc<Self> {
        let game_id = state.game_id.clone();
        let speed = state.speed;
        Arc::new(Self {
            game_id,
            state: Mutex::new(state),
            paused: AtomicBool::new(false),
            speed_interval_ms: AtomicU64::new(speed.interval_ms()),
            resume: Notify::new(),
            loop_handle: std::sync::Mutex::new(None),
            started_at: Utc::now(),
        })
    }

    /// This game's identifier.
    #[must_use]
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Wall-clock moment this game was registered.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// `pauseGame` (§4.F): the tick loop stops advancing but stays
    /// alive, parked on [`Notify`] until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// `resumeGame` (§4.F): wake the tick loop if it is parked.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume.notify_one();
    }

    /// Whether the game is currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// `changeSpeed` (§4.F): takes effect from the loop's next sleep
    /// onward, no restart of an in-flight sleep.
    pub fn set_speed(&self, speed: GameSpeed) {
        self.speed_interval_ms.store(speed.interval_ms(), Ordering::Release);
    }

    /// The tick interval currently in effect.
    #[must_use]
    pub fn tick_interval_ms(&self) -> u64 {
        self.speed_interval_ms.load(Ordering::Acquire)
    }

    async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume.notified().await;
        }
    }

    /// Exclusive access to the underlying state, for action handlers
    /// invoked between ticks (§6).
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, GameState> {
        self.state.lock().await
    }

    /// Start this game's tick loop: sleep for the current speed
    /// interval, run one tick, publish its events, repeat. Runs until
    /// the returned task is aborted by [`GameHandle::stop`].
    ///
    /// A panicking tick is caught so one game's invariant violation
    /// cannot crash the process or any other game's loop (§7 "isolate
    /// faults per game"); the loop logs the fault and continues rather
    /// than exiting, since a mid-game fatal condition has no safe
    /// recovery besides skipping the corrupted tick.
    pub fn spawn_loop(self: &Arc<Self>, bus: Arc<EventBus>) {
        let handle = Arc::clone(self);
        let task = tokio::spawn(async move {
            loop {
                let interval = handle.tick_interval_ms();
                tokio::time::sleep(std::time::Duration::from_millis(interval)).await;
                handle.wait_if_paused().await;

                match handle.run_one_tick(&bus).await {
                    Ok(()) => {}
                    Err(fault) => error!(game_id = %handle.game_id, fault = %fault, "tick pipeline panicked, game continues from last good state"),
                }
            }
        });

        // Stored synchronously, before this function returns: no second
        // spawned task, so `stop` can never observe the slot still empty.
        *self.loop_handle.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(task);
    }

    /// Abort this game's tick loop task.
    pub async fn stop(&self) {
        let task = self.loop_handle.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take();
        if let Some(task) = task {
            task.abort();
        }
        let uptime = Utc::now().signed_duration_since(self.started_at);
        debug!(game_id = %self.game_id, uptime_seconds = uptime.num_seconds(), "game stopped");
    }

    async fn run_one_tick(&self, bus: &EventBus) -> Result<(), String> {
        let mut guard = self.state.lock().await;
        let tick_result = std::panic::catch_unwind(AssertUnwindSafe(|| hexrealm_core::execute_tick(&mut guard)));

        let events = match tick_result {
            Ok(events) => events,
            Err(payload) => {
                return Err(panic_message(&payload));
            }
        };

        let tick = guard.tick;
        let player_ids: Vec<UserId> = guard.players.iter().map(|player| player.user_id.clone()).collect();

        for player_id in player_ids {
            match hexrealm_world::get_player_view(&guard, &player_id) {
                Ok(view) => {
                    let topic = Topic::player(&self.game_id, &player_id);
                    bus.publish(
                        &topic,
                        GameEvent::Tick {
                            tick,
                            player_state: Box::new(view),
                        },
                    )
                    .await;
                }
                Err(error) => warn!(game_id = %self.game_id, %player_id, %error, "failed to build player view for tick snapshot"),
            }
        }
        drop(guard);

        let broadcast_topic = Topic::game(&self.game_id);
        for event in events {
            bus.publish(&broadcast_topic, event).await;
        }

        debug!(game_id = %self.game_id, tick, "tick published");
        Ok(())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use hexrealm_types::{GameConfig, PlayerConfig, Terrain};
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

    #[tokio::test]
    async fn new_handle_starts_unpaused_at_configured_speed() {
        let handle = GameHandle::new(one_player_state());
        assert!(!handle.is_paused());
        assert_eq!(handle.tick_interval_ms(), GameSpeed::Normal.interval_ms());
    }

    #[tokio::test]
    async fn pause_then_resume_round_trips() {
        let handle = GameHandle::new(one_player_state());
        handle.pause();
        assert!(handle.is_paused());
        handle.resume();
        assert!(!handle.is_paused());
    }

    #[tokio::test]
    async fn set_speed_changes_reported_interval() {
        let handle = GameHandle::new(one_player_state());
        handle.set_speed(GameSpeed::Triple);
        assert_eq!(handle.tick_interval_ms(), GameSpeed::Triple.interval_ms());
    }

    #[tokio::test]
    async fn run_one_tick_publishes_a_snapshot_per_player() {
        use futures::StreamExt;

        let handle = GameHandle::new(one_player_state());
        let bus = Arc::new(EventBus::default());
        let (_cancel_handle, cancellation) = hexrealm_bus::cancellation_pair();
        let topic = Topic::player(&GameId::from("g"), &UserId::from("p0"));
        let stream = bus.subscribe(topic, cancellation).await;
        tokio::pin!(stream);

        handle.run_one_tick(&bus).await.unwrap_or_else(|fault| panic!("tick must not fault: {fault}"));

        let received = stream.next().await;
        assert!(matches!(received, Some(GameEvent::Tick { tick: 1, .. })));
    }
}
