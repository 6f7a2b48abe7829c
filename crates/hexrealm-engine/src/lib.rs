//! Process-wide game registry and scheduler (component F): wires the
//! tick pipeline (`hexrealm-core`) and rule systems (`hexrealm-rules`)
//! to the event bus (`hexrealm-bus`) behind the §6 external interface.

pub mod error;
pub mod handle;
pub mod registry;

pub use error::EngineError;
pub use handle::GameHandle;
pub use registry::GameRegistry;
