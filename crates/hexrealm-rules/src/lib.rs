//! Per-system simulation algorithms (§4.E.1–§4.E.10) and the action
//! handlers invoked between ticks (§6), all operating on a
//! [`hexrealm_world::GameState`] under the same per-game exclusion as
//! the tick pipeline.

pub mod actions;
pub mod combat;
pub mod council;
pub mod error;
pub mod fog;
pub mod movement;
pub mod neutrals;
pub mod research;
pub mod resources;
pub mod settlements;
pub mod unit_ai;
pub mod victory;

pub use actions::{buy_unit, set_policies};
pub use combat::tick_combat;
pub use council::{propose_law, tick_advisor_loyalty};
pub use error::RulesError;
pub use fog::tick_fog;
pub use movement::tick_movement;
pub use neutrals::{tick_barbarian_camps, tick_neutrals};
pub use research::{start_research, tick_research};
pub use resources::tick_resources;
pub use settlements::{construct_building, found_settlement, tick_settlements};
pub use unit_ai::tick_unit_ai;
pub use victory::{check_elimination, check_victory};
