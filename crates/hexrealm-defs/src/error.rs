//! Error types for static-definition lookups (§7 `NotFound`).

/// Errors returned by lookups against the static definition tables.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DefsError {
    /// No faction is registered under this identifier.
    #[error("unknown faction: {0}")]
    UnknownFaction(String),
    /// No tech is registered under this identifier.
    #[error("unknown tech: {0}")]
    UnknownTech(String),
    /// No law is registered under this identifier.
    #[error("unknown law: {0}")]
    UnknownLaw(String),
    /// No building is registered under this identifier.
    #[error("unknown building: {0}")]
    UnknownBuilding(String),
}
