//! The discrete event shapes carried through the event bus (§6 "Event
//! shapes").
//!
//! `GameEvent::Tick` additionally wraps a per-player [`ClientPlayerState`]
//! and is published once per player per tick (§4.F); every other variant
//! is published once to the game's broadcast topic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DiplomacyStatus, Vote, VictoryType};
use crate::ids::{SettlementId, UnitId, UserId};
use crate::structs::ClientPlayerState;

/// One advisor's recorded vote plus its free-text rationale (§4.E.7).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VoteRecord {
    /// Which advisor cast this vote.
    pub advisor: crate::enums::AdvisorType,
    /// The vote itself.
    pub vote: Vote,
    /// A short human-readable rationale.
    pub reason: String,
}

/// Every event the simulation core can emit, either to a per-player
/// topic (`Tick`) or to a game's broadcast topic (everything else).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Delivered once per player per tick, fog-filtered (§4.F).
    Tick {
        /// The tick number this snapshot reflects.
        tick: u64,
        /// The receiving player's filtered view.
        player_state: Box<ClientPlayerState>,
    },
    /// Delivered once to a new subscriber ahead of the tick stream (§6
    /// `subscribe`).
    MapReady {
        /// Map width in tiles.
        width: u32,
        /// Map height in tiles.
        height: u32,
        /// Flattened terrain bytes.
        terrain: Vec<u8>,
        /// Flattened elevation bytes.
        elevation: Vec<u8>,
    },
    /// One direction of a resolved combat pair (§4.E.4).
    CombatResult {
        /// The attacking unit.
        attacker_id: UnitId,
        /// The defending unit.
        defender_id: UnitId,
        /// Damage dealt this direction.
        damage: u32,
        /// Whether the defender's hp reached zero.
        killed: bool,
    },
    /// A new settlement was founded (§4.E.5).
    SettlementFounded {
        /// The new settlement's identifier.
        settlement_id: SettlementId,
        /// Its owner.
        owner_id: UserId,
        /// Axial column.
        q: i32,
        /// Axial row.
        r: i32,
    },
    /// A building finished construction (§4.E.5).
    BuildingCompleted {
        /// The settlement that gained the building.
        settlement_id: SettlementId,
        /// The building's static identifier.
        building_id: String,
    },
    /// A tech finished researching (§4.E.6).
    TechResearched {
        /// The tech's static identifier.
        tech_id: String,
        /// The player who completed it.
        player_id: UserId,
    },
    /// A proposed law passed its council vote (§4.E.7).
    LawPassed {
        /// The law's static identifier.
        law_id: String,
        /// The proposing player.
        player_id: UserId,
        /// How each advisor voted.
        votes: Vec<VoteRecord>,
    },
    /// A proposed law failed its council vote (§4.E.7).
    LawRejected {
        /// The law's static identifier.
        law_id: String,
        /// The proposing player.
        player_id: UserId,
        /// How each advisor voted.
        votes: Vec<VoteRecord>,
    },
    /// A diplomacy pair moved to war (§4.E.7 `diplomacy_change`).
    WarDeclared {
        /// One side of the pair.
        player_a: UserId,
        /// The other side of the pair.
        player_b: UserId,
    },
    /// A diplomacy pair moved to peace (§4.E.7 `diplomacy_change`).
    PeaceDeclared {
        /// One side of the pair.
        player_a: UserId,
        /// The other side of the pair.
        player_b: UserId,
    },
    /// A player lost their last settlement (§4.E.9).
    PlayerEliminated {
        /// The eliminated player.
        player_id: UserId,
    },
    /// A victory condition was met (§4.E.9).
    Victory {
        /// The winning player.
        winner_id: UserId,
        /// Which condition triggered.
        victory_type: VictoryType,
    },
    /// The game was paused (§4.F `pauseGame`).
    Paused,
    /// The game was resumed (§4.F `resumeGame`).
    Resumed,
    /// A unit finished a movement step (§4.E.3), useful for client
    /// animation; not required by any invariant.
    UnitMoved {
        /// The moved unit.
        unit_id: UnitId,
        /// New axial column.
        q: i32,
        /// New axial row.
        r: i32,
    },
}

/// The outcome of a `proposeLaw` call, returned synchronously to the
/// caller in addition to the `LawPassed`/`LawRejected` event (§4.E.7).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProposeLawOutcome {
    /// Whether at least three of five advisors voted yes.
    pub passed: bool,
    /// Every advisor's vote.
    pub votes: Vec<VoteRecord>,
    /// The law that was proposed.
    pub law_id: String,
}

/// A diplomacy status change request carried by a passed law's
/// `diplomacy_change` effect (§4.E.7 step 4).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DiplomacyChange {
    /// The target player (the law's `targetPlayerId`).
    pub target_player_id: UserId,
    /// The new status to set for the pair.
    pub new_status: DiplomacyStatus,
}

/// A loyalty adjustment carried by a passed law's `loyalty_change` effect.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LoyaltyChange {
    /// The advisor to adjust, or every advisor if `None` (§4.E.7 step 4:
    /// "if target absent, apply to all five").
    pub advisor: Option<crate::enums::AdvisorType>,
    /// The signed amount to add to loyalty.
    pub value: i16,
}

/// Research progress, kept as a [`Decimal`] so accumulation never drifts.
pub type ResearchProgress = Decimal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_event_serializes_with_type_tag() {
        let event = GameEvent::PlayerEliminated {
            player_id: UserId::from("p1"),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"type\":\"PlayerEliminated\""));
    }
}
