//! Hexrealm server binary.
//!
//! Wires the game registry (component F) to a demonstration game and
//! runs until interrupted. The request gateway that would translate
//! authenticated RPCs into [`hexrealm_engine::GameRegistry`] calls is
//! out of scope for this core (§1); this binary stands in for it with
//! a single hard-coded match so the registry, tick loop, and event bus
//! can be exercised end to end.
//!
//! # Startup sequence
//!
//! 1. Initialize structured logging (tracing).
//! 2. Build a placeholder map (the real map generator is an opaque
//!    out-of-scope collaborator, §1).
//! 3. Start a two-player game through the registry.
//! 4. Log each broadcast event as it arrives.
//! 5. Run until `ctrl_c`, then stop the game and exit.

use std::sync::Arc;

use hexrealm_engine::GameRegistry;
use hexrealm_types::{GameConfig, GameEvent, GameId, GameSpeed, PlayerConfig, Terrain, UserId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point for the Hexrealm server.
///
/// # Errors
///
/// Returns an error if the demonstration game fails to start.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("hexrealm-engine starting");

    let registry = Arc::new(GameRegistry::new());

    let game_id = registry.start_game(demo_config()).await?;
    info!(%game_id, "demo game started");

    spawn_broadcast_logger(Arc::clone(&registry), game_id.clone());

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping demo game");
    registry.stop_game(&game_id).await?;

    Ok(())
}

/// A placeholder `{width, height, terrain[], elevation[]}` map (§1):
/// a 40x40 plains-and-grassland expanse with a scattering of forest
/// and hills, ringed by water so every land tile is reachable without
/// edge-of-map special casing.
fn demo_config() -> GameConfig {
    let width = 40u32;
    let height = 40u32;
    let tile_count = width.saturating_mul(height) as usize;
    let mut terrain = vec![Terrain::Plains as u8; tile_count];
    let mut elevation = vec![60u8; tile_count];
    let last_column = width.saturating_sub(1);
    let last_row = height.saturating_sub(1);

    for (index, cell) in terrain.iter_mut().enumerate() {
        let flat = u32::try_from(index).unwrap_or(u32::MAX);
        let q = flat % width;
        let r = flat / width;
        let on_edge = q == 0 || r == 0 || q == last_column || r == last_row;
        if on_edge {
            *cell = Terrain::ShallowWater as u8;
        } else if (q.saturating_add(r.saturating_mul(3))) % 11 == 0 {
            *cell = Terrain::Forest as u8;
        } else if (q.saturating_mul(5).saturating_add(r)) % 13 == 0 {
            *cell = Terrain::Hills as u8;
        } else if (q.saturating_add(r)) % 7 == 0 {
            *cell = Terrain::Grassland as u8;
        }

        if let Some(height_byte) = elevation.get_mut(index) {
            *height_byte = if *cell == Terrain::Hills as u8 { 140 } else { 60 };
        }
    }

    GameConfig {
        game_id: GameId::from("demo"),
        map_width: width,
        map_height: height,
        terrain,
        elevation,
        players: vec![
            PlayerConfig {
                user_id: UserId::from("p0"),
                faction_id: "solari".to_owned(),
            },
            PlayerConfig {
                user_id: UserId::from("p1"),
                faction_id: "ferrovane".to_owned(),
            },
        ],
        speed: GameSpeed::Normal,
    }
}

/// Logs every discrete broadcast event for the demo game as it
/// arrives; a stand-in for the gateway's own subscriber (§6 `subscribe`).
fn spawn_broadcast_logger(registry: Arc<GameRegistry>, game_id: GameId) {
    tokio::spawn(async move {
        use futures::StreamExt as _;

        let (_cancel_handle, cancellation) = hexrealm_bus::cancellation_pair();
        let subscription = match registry.subscribe_broadcast(&game_id, cancellation).await {
            Ok(subscription) => subscription,
            Err(error) => {
                warn!(%game_id, %error, "failed to subscribe demo logger");
                return;
            }
        };
        let (primer, stream) = subscription;
        log_event(&game_id, &primer);

        tokio::pin!(stream);
        while let Some(event) = stream.next().await {
            log_event(&game_id, &event);
        }
    });
}

fn log_event(game_id: &GameId, event: &GameEvent) {
    match event {
        GameEvent::MapReady { width, height, .. } => info!(%game_id, width, height, "map ready"),
        GameEvent::CombatResult { attacker_id, defender_id, damage, killed } => {
            info!(%game_id, %attacker_id, %defender_id, damage, killed, "combat result");
        }
        GameEvent::SettlementFounded { settlement_id, owner_id, q, r } => {
            info!(%game_id, %settlement_id, %owner_id, q, r, "settlement founded");
        }
        GameEvent::TechResearched { tech_id, player_id } => info!(%game_id, tech_id, %player_id, "tech researched"),
        GameEvent::PlayerEliminated { player_id } => info!(%game_id, %player_id, "player eliminated"),
        GameEvent::Victory { winner_id, victory_type } => info!(%game_id, %winner_id, ?victory_type, "victory"),
        other => info!(%game_id, event = ?other, "game event"),
    }
}
