//! The canonical, mutable per-game world state: construction from a
//! generated map, the entities it owns, and the fog-filtered view
//! handed to subscribers (§3, §4.B).
//!
//! Every write to a [`GameState`] happens either from inside the tick
//! pipeline (`hexrealm-core`) or from an action handler
//! (`hexrealm-rules::actions`) invoked under the same per-game
//! exclusion; this crate only defines the shape and the two
//! entry points (`create`, `get_player_view`) that do not depend on the
//! rule systems.

pub mod construction;
pub mod error;
pub mod neutrals;
pub mod state;
pub mod view;

pub use construction::create;
pub use error::WorldError;
pub use neutrals::spawn_barbarian_camp;
pub use state::{GameState, Player, Settlement, Unit};
pub use view::get_player_view;
