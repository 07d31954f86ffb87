//! Developer tooling: read-only inspection of worlds and builders.
//!
//! # Invariants
//! - Inspection never mutates the world.

pub mod inspector;

pub use inspector::{BuilderInfo, TileInfo, WorldInspector, WorldSummary};
