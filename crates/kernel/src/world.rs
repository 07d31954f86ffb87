use crate::error::{BlockFault, BlockWorldError, ExitFault};
use crate::tile::Tile;
use blockworld_common::{Block, TileId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A record of one successful mutation of the world.
///
/// The journal is the basis for replay. A failed operation never produces
/// an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A tile was added to the arena with the given contents.
    TileAdded { id: TileId, tile: Tile },
    BlockPlaced { tile: TileId, block: Block },
    BlockRemoved { tile: TileId },
    BlockDug { tile: TileId },
    /// The top block of `from` moved through `exit` onto `to`.
    BlockMoved {
        from: TileId,
        exit: String,
        to: TileId,
    },
    ExitAdded {
        from: TileId,
        name: String,
        to: TileId,
    },
    ExitRemoved { from: TileId, name: String },
}

/// Arena owning every tile of a world.
///
/// Tiles are addressed by `TileId` and never removed, so handles held by
/// exits and builders stay valid. All mutations of tiles in the arena go
/// through the operations below.
///
/// A decoded world starts with an empty journal. Each tile is validated on
/// its own, and every exit must name a tile of the same world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "WorldData")]
pub struct World {
    tiles: Vec<Tile>,
    /// Journal of successful mutations.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

/// Wire form of a `World`; tiles are already validated by `Tile`'s decoder.
#[derive(Deserialize)]
struct WorldData {
    tiles: Vec<Tile>,
}

impl TryFrom<WorldData> for World {
    type Error = BlockWorldError;

    fn try_from(data: WorldData) -> Result<Self, Self::Error> {
        let count = data.tiles.len();
        if let Some(target) = data
            .tiles
            .iter()
            .flat_map(|tile| tile.exits().values().copied())
            .find(|target| target.index() >= count)
        {
            return Err(BlockWorldError::NoExit(ExitFault::DanglingTarget(target)));
        }
        Ok(Self {
            tiles: data.tiles,
            event_log: Vec::new(),
        })
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn contains(&self, id: TileId) -> bool {
        id.index() < self.tiles.len()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile, BlockWorldError> {
        self.get(id).ok_or(BlockWorldError::UnknownTile(id))
    }

    /// All tiles in handle order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles.iter().enumerate().map(|(i, t)| (TileId(i), t))
    }

    /// Read-only access to the journal.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the journal.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Add a tile and return its handle.
    ///
    /// Any exits the tile already carries must point at existing tiles or at
    /// the tile itself.
    pub fn add_tile(&mut self, tile: Tile) -> Result<TileId, BlockWorldError> {
        let id = TileId(self.tiles.len());
        if let Some(target) = tile
            .exits()
            .values()
            .copied()
            .find(|target| target.index() > id.index())
        {
            trace!(%id, %target, "rejected tile with dangling exit");
            return Err(BlockWorldError::NoExit(ExitFault::DanglingTarget(target)));
        }
        Ok(self.push_tile(tile))
    }

    /// Add a tile holding soil, soil, grass.
    pub fn add_default_tile(&mut self) -> TileId {
        self.push_tile(Tile::new())
    }

    fn push_tile(&mut self, tile: Tile) -> TileId {
        let id = TileId(self.tiles.len());
        self.event_log.push(WorldEvent::TileAdded {
            id,
            tile: tile.clone(),
        });
        self.tiles.push(tile);
        debug!(%id, "tile added");
        id
    }

    /// Add or overwrite exit `name` on `from`, leading to `to`.
    pub fn add_exit(
        &mut self,
        from: TileId,
        name: impl Into<String>,
        to: TileId,
    ) -> Result<(), BlockWorldError> {
        let name = name.into();
        if !self.contains(to) {
            self.tile(from)?;
            trace!(%from, %to, "rejected exit to missing tile");
            return Err(BlockWorldError::NoExit(ExitFault::DanglingTarget(to)));
        }
        self.tile_mut(from)?.add_exit(name.clone(), to)?;
        debug!(%from, %to, exit = %name, "exit added");
        self.event_log
            .push(WorldEvent::ExitAdded { from, name, to });
        Ok(())
    }

    pub fn remove_exit(&mut self, from: TileId, name: &str) -> Result<(), BlockWorldError> {
        self.tile_mut(from)?.remove_exit(name)?;
        debug!(%from, exit = name, "exit removed");
        self.event_log.push(WorldEvent::ExitRemoved {
            from,
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn place_block(&mut self, tile: TileId, block: Block) -> Result<(), BlockWorldError> {
        let record = block.clone();
        self.tile_mut(tile)?
            .place_block(block)
            .inspect_err(|err| trace!(%tile, %err, "placement rejected"))?;
        debug!(%tile, kind = %record.kind(), "block placed");
        self.event_log.push(WorldEvent::BlockPlaced {
            tile,
            block: record,
        });
        Ok(())
    }

    pub fn remove_top_block(&mut self, tile: TileId) -> Result<(), BlockWorldError> {
        self.tile_mut(tile)?.remove_top_block()?;
        debug!(%tile, "top block removed");
        self.event_log.push(WorldEvent::BlockRemoved { tile });
        Ok(())
    }

    /// Dig the top block of `tile` and hand it to the caller.
    pub fn dig(&mut self, tile: TileId) -> Result<Block, BlockWorldError> {
        let block = self
            .tile_mut(tile)?
            .dig()
            .inspect_err(|err| trace!(%tile, %err, "dig rejected"))?;
        debug!(%tile, kind = %block.kind(), "block dug");
        self.event_log.push(WorldEvent::BlockDug { tile });
        Ok(block)
    }

    /// Move the top block of `source` onto the tile behind `exit`.
    ///
    /// Checks run in a fixed order: the exit must exist, the target must be
    /// strictly shorter than the source, and the top block must be moveable.
    /// Nothing changes unless all checks pass.
    pub fn move_block(&mut self, source: TileId, exit: &str) -> Result<(), BlockWorldError> {
        let to = self
            .validate_move(source, exit)
            .inspect_err(|err| trace!(%source, exit, %err, "move rejected"))?;

        let Some(block) = self.tiles[source.index()].take_top() else {
            return Err(BlockWorldError::TooLow);
        };
        let kind = block.kind();
        self.tiles[to.index()].place_block(block)?;

        debug!(from = %source, %to, exit, %kind, "block moved");
        self.event_log.push(WorldEvent::BlockMoved {
            from: source,
            exit: exit.to_string(),
            to,
        });
        Ok(())
    }

    fn validate_move(&self, source: TileId, exit: &str) -> Result<TileId, BlockWorldError> {
        let from = self.tile(source)?;
        if exit.is_empty() {
            return Err(BlockWorldError::NoExit(ExitFault::EmptyName));
        }
        let to = from
            .exit(exit)
            .ok_or_else(|| BlockWorldError::NoExit(ExitFault::Unknown(exit.to_string())))?;
        let target = self
            .get(to)
            .ok_or(BlockWorldError::NoExit(ExitFault::DanglingTarget(to)))?;

        if target.height() >= from.height() {
            return Err(BlockWorldError::TooHigh {
                height: target.height(),
                ceiling: from.height(),
            });
        }

        // Unreachable while the height check holds; kept explicit.
        let top = from.top_block()?;
        if !top.is_moveable() {
            return Err(BlockWorldError::InvalidBlock(BlockFault::NotMoveable(
                top.kind(),
            )));
        }
        target.check_placement(top)?;
        Ok(to)
    }

    /// Rebuild a world by re-running a journal through the validated
    /// operations.
    pub fn replay(events: &[WorldEvent]) -> Result<Self, BlockWorldError> {
        let mut world = Self::new();
        for event in events {
            match event {
                WorldEvent::TileAdded { id, tile } => {
                    if world.add_tile(tile.clone())? != *id {
                        return Err(BlockWorldError::UnknownTile(*id));
                    }
                }
                WorldEvent::BlockPlaced { tile, block } => {
                    world.place_block(*tile, block.clone())?;
                }
                WorldEvent::BlockRemoved { tile } => {
                    world.remove_top_block(*tile)?;
                }
                WorldEvent::BlockDug { tile } => {
                    world.dig(*tile)?;
                }
                WorldEvent::BlockMoved { from, exit, .. } => {
                    world.move_block(*from, exit)?;
                }
                WorldEvent::ExitAdded { from, name, to } => {
                    world.add_exit(*from, name.clone(), *to)?;
                }
                WorldEvent::ExitRemoved { from, name } => {
                    world.remove_exit(*from, name)?;
                }
            }
        }
        Ok(world)
    }

    /// Deterministic hash of every tile's blocks and exits, for comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, tile) in self.tiles() {
            mix(&mut h, &(id.index() as u64).to_le_bytes());
            mix(&mut h, &(tile.height() as u64).to_le_bytes());
            for block in tile.blocks() {
                mix(&mut h, block.id().0.as_bytes());
                mix(&mut h, block.block_type().as_bytes());
            }
            for (name, target) in tile.exits() {
                mix(&mut h, name.as_bytes());
                mix(&mut h, &(target.index() as u64).to_le_bytes());
            }
        }
        h
    }

    fn tile_mut(&mut self, id: TileId) -> Result<&mut Tile, BlockWorldError> {
        self.tiles
            .get_mut(id.index())
            .ok_or(BlockWorldError::UnknownTile(id))
    }
}
