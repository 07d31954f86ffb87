use blockworld_common::{BlockKind, TileId};
use blockworld_kernel::{Builder, World};

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            tile_count: world.tile_count(),
            block_count: world.tiles().map(|(_, t)| t.height()).sum(),
            exit_count: world.tiles().map(|(_, t)| t.exits().len()).sum(),
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    /// Describe one tile: its stack bottom to top and its exits.
    pub fn inspect_tile(world: &World, id: TileId) -> Option<TileInfo> {
        world.get(id).map(|tile| TileInfo {
            id,
            stack: tile.blocks().iter().map(|b| b.kind()).collect(),
            exits: tile
                .exits()
                .iter()
                .map(|(name, target)| (name.clone(), *target))
                .collect(),
        })
    }

    /// Describe a builder and where it could step next.
    pub fn inspect_builder(world: &World, builder: &Builder) -> BuilderInfo {
        let enterable = world
            .get(builder.current_tile())
            .map(|tile| {
                let mut targets: Vec<TileId> = tile
                    .exits()
                    .values()
                    .copied()
                    .filter(|target| builder.can_enter(world, *target))
                    .collect();
                targets.sort();
                targets.dedup();
                targets
            })
            .unwrap_or_default();
        BuilderInfo {
            name: builder.name().to_string(),
            tile: builder.current_tile(),
            inventory: builder.inventory().iter().map(|b| b.kind()).collect(),
            enterable,
        }
    }

    /// List all tile handles in the world.
    pub fn list_tiles(world: &World) -> Vec<TileId> {
        world.tiles().map(|(id, _)| id).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub tile_count: usize,
    pub block_count: usize,
    pub exit_count: usize,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tiles={} blocks={} exits={} pending_events={} hash={:#018x}",
            self.tile_count, self.block_count, self.exit_count, self.pending_events, self.state_hash
        )
    }
}

/// Detailed info about a single tile.
#[derive(Debug, Clone)]
pub struct TileInfo {
    pub id: TileId,
    /// Block kinds, bottom first.
    pub stack: Vec<BlockKind>,
    pub exits: Vec<(String, TileId)>,
}

impl std::fmt::Display for TileInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stack: Vec<&str> = self.stack.iter().map(|k| k.block_type()).collect();
        write!(f, "{} h={} [{}]", self.id, self.stack.len(), stack.join(" "))?;
        for (name, target) in &self.exits {
            write!(f, " {name}->{target}")?;
        }
        Ok(())
    }
}

/// Detailed info about a builder.
#[derive(Debug, Clone)]
pub struct BuilderInfo {
    pub name: String,
    pub tile: TileId,
    pub inventory: Vec<BlockKind>,
    /// Tiles reachable in one legal move.
    pub enterable: Vec<TileId>,
}

impl std::fmt::Display for BuilderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inventory: Vec<&str> = self.inventory.iter().map(|k| k.block_type()).collect();
        let enterable: Vec<String> = self.enterable.iter().map(|t| t.to_string()).collect();
        write!(
            f,
            "Builder {:?} on {} inventory=[{}] can_enter=[{}]",
            self.name,
            self.tile,
            inventory.join(" "),
            enterable.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockworld_kernel::{Block, Tile};

    #[test]
    fn summary_empty_world() {
        let world = World::new();
        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tile_count, 0);
        assert_eq!(summary.block_count, 0);
    }

    #[test]
    fn summary_with_tiles() {
        let mut world = World::new();
        let a = world.add_default_tile();
        let b = world.add_default_tile();
        world.add_exit(a, "east", b).unwrap();

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.tile_count, 2);
        assert_eq!(summary.block_count, 6);
        assert_eq!(summary.exit_count, 1);
        assert_eq!(summary.pending_events, 3); // 2 tiles + 1 exit
        assert_eq!(summary.state_hash, world.state_hash());
    }

    #[test]
    fn inspect_tile_found() {
        let mut world = World::new();
        let id = world.add_default_tile();
        world.add_exit(id, "loop", id).unwrap();

        let info = WorldInspector::inspect_tile(&world, id).unwrap();
        assert_eq!(
            info.stack,
            vec![BlockKind::SOIL, BlockKind::SOIL, BlockKind::GRASS]
        );
        assert_eq!(info.to_string(), "tile#0 h=3 [soil soil grass] loop->tile#0");
    }

    #[test]
    fn inspect_tile_not_found() {
        let world = World::new();
        assert!(WorldInspector::inspect_tile(&world, TileId(3)).is_none());
    }

    #[test]
    fn inspect_builder_lists_enterable_tiles() {
        let mut world = World::new();
        let a = world.add_default_tile();
        let b = world.add_default_tile();
        let c = world.add_tile(Tile::empty()).unwrap();
        world.add_exit(a, "east", b).unwrap();
        world.add_exit(a, "door", b).unwrap();
        world.add_exit(a, "pit", c).unwrap();

        let builder = Builder::with_inventory("bob", a, vec![Block::wood()]).unwrap();
        let info = WorldInspector::inspect_builder(&world, &builder);
        assert_eq!(info.enterable, vec![b]);
        assert_eq!(info.inventory, vec![BlockKind::Wood]);
        assert_eq!(
            info.to_string(),
            "Builder \"bob\" on tile#0 inventory=[wood] can_enter=[tile#1]"
        );
    }

    #[test]
    fn list_tiles() {
        let mut world = World::new();
        let a = world.add_default_tile();
        let b = world.add_default_tile();
        assert_eq!(WorldInspector::list_tiles(&world), vec![a, b]);
    }

    #[test]
    fn summary_display() {
        let world = World::new();
        let s = format!("{}", WorldInspector::summary(&world));
        assert!(s.contains("tiles=0"));
    }
}
