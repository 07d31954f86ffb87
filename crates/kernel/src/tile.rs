use crate::error::{BlockFault, BlockWorldError, ExitFault};
use blockworld_common::{Block, TileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of blocks on any tile.
pub const MAX_HEIGHT: usize = 8;

/// Ground blocks may only be placed while a tile is shorter than this.
pub const GROUND_CEILING: usize = 3;

/// A stack of blocks plus named exits to other tiles.
///
/// Index 0 of the stack is the bottom block. Exits hold handles, not tiles,
/// so cycles (self-loops included) are plain data. Exits use a BTreeMap for
/// deterministic iteration.
///
/// Deserialization rebuilds the stack through `with_blocks`, so a decoded
/// tile obeys the same height rules as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TileData")]
pub struct Tile {
    blocks: Vec<Block>,
    exits: BTreeMap<String, TileId>,
}

/// Unvalidated wire form of a `Tile`.
#[derive(Deserialize)]
struct TileData {
    blocks: Vec<Block>,
    exits: BTreeMap<String, TileId>,
}

impl TryFrom<TileData> for Tile {
    type Error = BlockWorldError;

    fn try_from(data: TileData) -> Result<Self, Self::Error> {
        let mut tile = Self::with_blocks(data.blocks)?;
        for (name, target) in data.exits {
            tile.add_exit(name, target)?;
        }
        Ok(tile)
    }
}

impl Tile {
    /// A tile holding soil, soil, grass (bottom to top) and no exits.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::soil(), Block::soil(), Block::grass()],
            exits: BTreeMap::new(),
        }
    }

    /// A tile holding `blocks` (bottom to top) and no exits.
    ///
    /// Blocks are placed one at a time through the normal placement rules, so
    /// more than `MAX_HEIGHT` blocks, or a ground block at index
    /// `GROUND_CEILING` or above, fails with `TooHigh`.
    pub fn with_blocks(blocks: impl IntoIterator<Item = Block>) -> Result<Self, BlockWorldError> {
        let mut tile = Self::empty();
        for block in blocks {
            tile.place_block(block)?;
        }
        Ok(tile)
    }

    /// A tile with no blocks and no exits.
    pub fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            exits: BTreeMap::new(),
        }
    }

    /// Blocks from bottom to top.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    pub fn exits(&self) -> &BTreeMap<String, TileId> {
        &self.exits
    }

    pub fn exit(&self, name: &str) -> Option<TileId> {
        self.exits.get(name).copied()
    }

    /// Whether any exit, under any name, points at `target`.
    pub fn leads_to(&self, target: TileId) -> bool {
        self.exits.values().any(|id| *id == target)
    }

    pub fn top_block(&self) -> Result<&Block, BlockWorldError> {
        self.blocks.last().ok_or(BlockWorldError::TooLow)
    }

    pub fn remove_top_block(&mut self) -> Result<(), BlockWorldError> {
        self.blocks.pop().map(drop).ok_or(BlockWorldError::TooLow)
    }

    /// Add or overwrite the exit called `name`.
    pub fn add_exit(&mut self, name: impl Into<String>, target: TileId) -> Result<(), BlockWorldError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BlockWorldError::NoExit(ExitFault::EmptyName));
        }
        self.exits.insert(name, target);
        Ok(())
    }

    pub fn remove_exit(&mut self, name: &str) -> Result<(), BlockWorldError> {
        if name.is_empty() {
            return Err(BlockWorldError::NoExit(ExitFault::EmptyName));
        }
        self.exits
            .remove(name)
            .map(drop)
            .ok_or_else(|| BlockWorldError::NoExit(ExitFault::Unknown(name.to_string())))
    }

    /// Remove and return the top block if it is diggable.
    pub fn dig(&mut self) -> Result<Block, BlockWorldError> {
        let top = self.top_block()?;
        if !top.is_diggable() {
            return Err(BlockWorldError::InvalidBlock(BlockFault::NotDiggable(
                top.kind(),
            )));
        }
        self.blocks.pop().ok_or(BlockWorldError::TooLow)
    }

    /// Check whether `block` could be placed on top of this tile right now.
    ///
    /// This is the only place the height ceilings are evaluated.
    pub fn check_placement(&self, block: &Block) -> Result<(), BlockWorldError> {
        let ceiling = if block.is_ground() {
            GROUND_CEILING
        } else {
            MAX_HEIGHT
        };
        let height = self.height();
        if height >= ceiling {
            return Err(BlockWorldError::TooHigh { height, ceiling });
        }
        Ok(())
    }

    pub fn place_block(&mut self, block: Block) -> Result<(), BlockWorldError> {
        self.check_placement(&block)?;
        self.blocks.push(block);
        Ok(())
    }

    /// Pop the top block after the caller has validated the move.
    pub(crate) fn take_top(&mut self) -> Option<Block> {
        self.blocks.pop()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new()
    }
}
