//! Blockworld kernel: tile stacks, the tile arena, and builders.
//!
//! # Invariants
//! - A tile never holds more than `MAX_HEIGHT` blocks.
//! - No ground block sits at stack index `GROUND_CEILING` or above.
//! - Every builder inventory block is carryable.
//! - A failed operation leaves every participant in its pre-call state.

pub mod builder;
pub mod error;
pub mod tile;
pub mod world;

pub use blockworld_common::{Block, BlockId, BlockKind, GroundKind, TileId};
pub use builder::Builder;
pub use error::{BlockFault, BlockWorldError, ErrorKind, ExitFault};
pub use tile::{GROUND_CEILING, MAX_HEIGHT, Tile};
pub use world::{World, WorldEvent};
