//! Hex-grid coordinate math for the Hexrealm simulation (§4.C).
//!
//! Two neighbour conventions coexist deliberately and must not be mixed
//! within one system (§9 "Dual hex-neighbour conventions"):
//!
//! - [`axial`] — the six-direction axial convention used by all gameplay
//!   logic (adjacency, vision, combat range).
//! - [`offset`] — the even/odd-row offset convention used only by the
//!   movement system's BFS pathing.

pub mod axial;
pub mod offset;

pub use axial::Axial;
pub use offset::{bfs_path, offset_neighbors};
