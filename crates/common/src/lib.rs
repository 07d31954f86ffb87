//! Shared types for the blockworld engine: block descriptors and tile handles.
//!
//! # Invariants
//! - Ground blocks are always diggable and never moveable.
//! - Every constructed block has its own identity.

pub mod block;
pub mod types;

pub use block::{Block, BlockKind, GroundKind, ParseBlockKindError};
pub use types::{BlockId, TileId};
