use crate::error::{BlockFault, BlockWorldError, ExitFault};
use crate::world::World;
use blockworld_common::{Block, TileId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// An actor standing on a tile, carrying an inventory of blocks.
///
/// The builder holds a handle to its current tile; every operation that
/// touches tiles takes the world the handle belongs to.
///
/// Decoding goes through `with_inventory`, so a decoded builder never carries
/// a block it could not have picked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BuilderData")]
pub struct Builder {
    name: String,
    inventory: Vec<Block>,
    current: TileId,
}

#[derive(Deserialize)]
struct BuilderData {
    name: String,
    inventory: Vec<Block>,
    current: TileId,
}

impl TryFrom<BuilderData> for Builder {
    type Error = BlockWorldError;

    fn try_from(data: BuilderData) -> Result<Self, Self::Error> {
        Self::with_inventory(data.name, data.current, data.inventory)
    }
}

impl Builder {
    /// A builder with an empty inventory standing on `start`.
    pub fn new(name: impl Into<String>, start: TileId) -> Self {
        Self {
            name: name.into(),
            inventory: Vec::new(),
            current: start,
        }
    }

    /// A builder starting with `inventory`.
    ///
    /// Fails with `InvalidBlock` if any block is not carryable; no builder is
    /// produced in that case.
    pub fn with_inventory(
        name: impl Into<String>,
        start: TileId,
        inventory: Vec<Block>,
    ) -> Result<Self, BlockWorldError> {
        if let Some(block) = inventory.iter().find(|b| !b.is_carryable()) {
            return Err(BlockWorldError::InvalidBlock(BlockFault::NotCarryable(
                block.kind(),
            )));
        }
        Ok(Self {
            name: name.into(),
            inventory,
            current: start,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_tile(&self) -> TileId {
        self.current
    }

    pub fn inventory(&self) -> &[Block] {
        &self.inventory
    }

    /// Place inventory block `index` on top of the current tile.
    ///
    /// The block only leaves the inventory once the tile has accepted it.
    pub fn drop_from_inventory(
        &mut self,
        world: &mut World,
        index: usize,
    ) -> Result<(), BlockWorldError> {
        let len = self.inventory.len();
        let block = self
            .inventory
            .get(index)
            .ok_or(BlockWorldError::InvalidBlock(BlockFault::IndexOutOfRange {
                index,
                len,
            }))?;
        world.tile(self.current)?.check_placement(block)?;

        let block = self.inventory.remove(index);
        world.place_block(self.current, block)?;
        debug!(builder = %self.name, tile = %self.current, index, "dropped from inventory");
        Ok(())
    }

    /// Dig the top block of the current tile.
    ///
    /// A carryable block goes to the end of the inventory. Anything else is
    /// destroyed.
    pub fn dig_on_current_tile(&mut self, world: &mut World) -> Result<(), BlockWorldError> {
        let block = world.dig(self.current)?;
        if block.is_carryable() {
            debug!(builder = %self.name, kind = %block.kind(), "picked up");
            self.inventory.push(block);
        } else {
            debug!(builder = %self.name, kind = %block.kind(), "discarded");
        }
        Ok(())
    }

    /// Whether the builder may step from its current tile onto `target`.
    ///
    /// Some exit of the current tile must lead to `target` (under any name)
    /// and the heights may differ by at most one.
    pub fn can_enter(&self, world: &World, target: TileId) -> bool {
        let (Some(current), Some(next)) = (world.get(self.current), world.get(target)) else {
            return false;
        };
        current.leads_to(target) && current.height().abs_diff(next.height()) <= 1
    }

    pub fn move_to(&mut self, world: &World, target: TileId) -> Result<(), BlockWorldError> {
        if !self.can_enter(world, target) {
            trace!(builder = %self.name, from = %self.current, to = %target, "move rejected");
            return Err(BlockWorldError::NoExit(ExitFault::Unreachable(target)));
        }
        debug!(builder = %self.name, from = %self.current, to = %target, "moved");
        self.current = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;
    use blockworld_common::BlockKind;

    fn world_with(tile: Tile) -> (World, TileId) {
        let mut w = World::new();
        let id = w.add_tile(tile).unwrap();
        (w, id)
    }

    #[test]
    fn new_builder() {
        let (_, t) = world_with(Tile::new());
        let b = Builder::new("name", t);
        assert_eq!(b.name(), "name");
        assert_eq!(b.current_tile(), t);
        assert!(b.inventory().is_empty());
    }

    #[test]
    fn starting_inventory_must_be_carryable() {
        let (_, t) = world_with(Tile::new());
        assert_eq!(
            Builder::with_inventory("name", t, vec![Block::stone()]),
            Err(BlockWorldError::InvalidBlock(BlockFault::NotCarryable(
                BlockKind::Stone
            )))
        );
        assert!(Builder::with_inventory("name", t, vec![Block::wood(), Block::grass()]).is_err());

        let items = vec![Block::wood(), Block::wood(), Block::soil()];
        let b = Builder::with_inventory("name", t, items.clone()).unwrap();
        assert_eq!(b.inventory(), items.as_slice());
    }

    #[test]
    fn drop_from_inventory() {
        let the_block = Block::wood();
        let items = vec![Block::soil(), the_block.clone(), Block::wood(), Block::wood()];
        let (mut w, t) = world_with(Tile::new());
        let mut b = Builder::with_inventory("test name", t, items).unwrap();

        assert_eq!(
            b.drop_from_inventory(&mut w, 4),
            Err(BlockWorldError::InvalidBlock(BlockFault::IndexOutOfRange {
                index: 4,
                len: 4
            }))
        );

        b.drop_from_inventory(&mut w, 1).unwrap();
        assert_eq!(w.tile(t).unwrap().top_block().unwrap(), &the_block);
        assert!(!b.inventory().contains(&the_block));
        assert_eq!(b.inventory().len(), 3);
    }

    #[test]
    fn failed_drop_keeps_inventory() {
        let (mut w, t) = world_with(Tile::new());
        let items = vec![Block::soil(), Block::wood()];
        let mut b = Builder::with_inventory("b", t, items.clone()).unwrap();

        // Soil cannot go on top of a 3 high tile.
        assert!(matches!(
            b.drop_from_inventory(&mut w, 0),
            Err(BlockWorldError::TooHigh { height: 3, ceiling: 3 })
        ));
        assert_eq!(b.inventory(), items.as_slice());
        assert_eq!(w.tile(t).unwrap().height(), 3);

        let full: Vec<Block> = (0..8).map(|_| Block::wood()).collect();
        let (mut w, t) = world_with(Tile::with_blocks(full).unwrap());
        let mut b = Builder::with_inventory("b", t, items.clone()).unwrap();
        assert!(matches!(
            b.drop_from_inventory(&mut w, 1),
            Err(BlockWorldError::TooHigh { height: 8, ceiling: 8 })
        ));
        assert_eq!(b.inventory(), items.as_slice());
    }

    #[test]
    fn dig_on_empty_tile_is_too_low() {
        let (mut w, t) = world_with(Tile::empty());
        let mut b = Builder::new("b", t);
        assert_eq!(b.dig_on_current_tile(&mut w), Err(BlockWorldError::TooLow));
    }

    #[test]
    fn dig_stone_is_invalid() {
        let (mut w, t) = world_with(Tile::with_blocks([Block::stone()]).unwrap());
        let mut b = Builder::new("b", t);
        assert!(matches!(
            b.dig_on_current_tile(&mut w),
            Err(BlockWorldError::InvalidBlock(BlockFault::NotDiggable(_)))
        ));
        assert_eq!(w.tile(t).unwrap().height(), 1);
    }

    #[test]
    fn dig_grass_discards_it() {
        let (mut w, t) = world_with(Tile::new());
        let mut b = Builder::new("b", t);
        b.dig_on_current_tile(&mut w).unwrap();
        assert_eq!(w.tile(t).unwrap().height(), 2);
        assert!(b.inventory().is_empty());

        // Soil underneath is carryable.
        b.dig_on_current_tile(&mut w).unwrap();
        assert_eq!(b.inventory().len(), 1);
        assert_eq!(b.inventory()[0].kind(), BlockKind::SOIL);
    }

    #[test]
    fn dig_wood_adds_to_inventory() {
        let wood = Block::wood();
        let (mut w, t) = world_with(Tile::with_blocks([Block::soil(), wood.clone()]).unwrap());
        let mut b = Builder::with_inventory("b", t, vec![Block::soil()]).unwrap();
        b.dig_on_current_tile(&mut w).unwrap();
        assert_eq!(b.inventory().last(), Some(&wood));
        assert_eq!(w.tile(t).unwrap().height(), 1);
    }

    #[test]
    fn can_enter_height_boundary() {
        let mut w = World::new();
        let a = w.add_default_tile();
        let b = w.add_default_tile();
        w.add_exit(a, "east", b).unwrap();
        let builder = Builder::new("b", a);

        assert!(builder.can_enter(&w, b));
        w.place_block(a, Block::wood()).unwrap();
        assert!(builder.can_enter(&w, b));
        w.place_block(a, Block::wood()).unwrap();
        assert!(!builder.can_enter(&w, b));

        // Shorter current tile, same rule.
        w.dig(a).unwrap();
        w.dig(a).unwrap();
        w.dig(a).unwrap();
        assert!(builder.can_enter(&w, b));
        w.dig(a).unwrap();
        assert!(!builder.can_enter(&w, b));
    }

    #[test]
    fn can_enter_requires_an_exit() {
        let mut w = World::new();
        let a = w.add_default_tile();
        let b = w.add_default_tile();
        w.add_exit(a, "east", b).unwrap();

        // One-directional connectivity.
        assert!(Builder::new("x", a).can_enter(&w, b));
        assert!(!Builder::new("y", b).can_enter(&w, a));

        // Dangling handles are never enterable.
        assert!(!Builder::new("x", a).can_enter(&w, TileId(9)));
        assert!(!Builder::new("z", TileId(9)).can_enter(&w, a));
    }

    #[test]
    fn can_enter_ignores_exit_name() {
        let mut w = World::new();
        let a = w.add_default_tile();
        let b = w.add_default_tile();
        w.add_exit(a, "east", b).unwrap();
        w.add_exit(a, "door", b).unwrap();
        w.remove_exit(a, "east").unwrap();
        assert!(Builder::new("x", a).can_enter(&w, b));
    }

    #[test]
    fn move_to() {
        let mut w = World::new();
        let a = w.add_default_tile();
        let b = w.add_default_tile();
        let c = w.add_default_tile();
        w.add_exit(a, "east", b).unwrap();
        let mut builder = Builder::with_inventory("b", a, vec![Block::wood()]).unwrap();

        assert_eq!(
            builder.move_to(&w, c),
            Err(BlockWorldError::NoExit(ExitFault::Unreachable(c)))
        );
        assert_eq!(builder.current_tile(), a);

        let hash = w.state_hash();
        builder.move_to(&w, b).unwrap();
        assert_eq!(builder.current_tile(), b);
        assert_eq!(builder.inventory().len(), 1);
        assert_eq!(w.state_hash(), hash);
    }

    #[test]
    fn dig_move_drop_scenario() {
        let mut w = World::new();
        let a = w.add_default_tile();
        let b = w.add_tile(Tile::with_blocks([Block::soil(), Block::soil()]).unwrap()).unwrap();
        w.add_exit(a, "east", b).unwrap();
        let wood = Block::wood();
        w.place_block(a, wood.clone()).unwrap();

        let mut builder = Builder::new("b", a);
        builder.dig_on_current_tile(&mut w).unwrap();
        assert_eq!(builder.inventory(), &[wood.clone()]);

        builder.move_to(&w, b).unwrap();
        builder.drop_from_inventory(&mut w, 0).unwrap();
        assert!(builder.inventory().is_empty());
        assert_eq!(w.tile(b).unwrap().top_block().unwrap(), &wood);
        assert_eq!(w.tile(b).unwrap().height(), 3);
    }

    #[test]
    fn decoding_keeps_valid_builder() {
        let b = Builder::with_inventory("b", TileId(2), vec![Block::wood(), Block::soil()]).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        let restored: Builder = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, b);
    }

    #[test]
    fn decoding_rejects_uncarryable_inventory() {
        let b = Builder::new("b", TileId(0));
        let mut json = serde_json::to_value(&b).unwrap();
        json["inventory"] = serde_json::to_value(vec![Block::stone()]).unwrap();

        let err = serde_json::from_value::<Builder>(json).unwrap_err();
        assert!(err.to_string().contains("stone is not carryable"));
    }
}
