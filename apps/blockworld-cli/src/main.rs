use anyhow::Context;
use blockworld_common::{Block, BlockKind, TileId};
use blockworld_kernel::{BlockWorldError, Builder, GROUND_CEILING, MAX_HEIGHT, Tile, World};
use blockworld_tools::WorldInspector;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockworld-cli", about = "CLI driver for the blockworld engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and rule constants
    Info,
    /// Run the scripted builder demo, printing the world after each step
    Demo,
    /// Run the demo, then rebuild the world from its journal and compare
    Replay,
    /// Validate a tile stack given bottom to top, e.g. `stack soil soil grass wood`
    Stack {
        /// Block types: grass, soil, stone or wood
        #[arg(required = true)]
        blocks: Vec<BlockKind>,
    },
    /// Print the demo world and builder as JSON
    Dump,
}

/// One scripted action of the demo.
#[derive(Debug, Clone, Copy)]
enum Step {
    Dig,
    Drop(usize),
    MoveTo(usize),
    MoveBlock { from: usize, exit: &'static str },
}

const TILE_NAMES: [&str; 3] = ["home", "field", "hill"];

const SCRIPT: [Step; 9] = [
    Step::Dig,
    Step::Dig,
    Step::Drop(1),
    Step::MoveTo(1),
    Step::MoveTo(2),
    Step::Drop(0),
    Step::MoveTo(2),
    Step::MoveBlock {
        from: 2,
        exit: "south",
    },
    Step::Dig,
];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("blockworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("max height: {MAX_HEIGHT}");
            println!("ground ceiling: {GROUND_CEILING}");
        }
        Commands::Demo => {
            let (world, builder, _) = run_demo(true)?;
            println!("{}", WorldInspector::summary(&world));
            println!("{}", WorldInspector::inspect_builder(&world, &builder));
        }
        Commands::Replay => {
            let (world, _, _) = run_demo(false)?;
            let replayed =
                World::replay(world.events()).context("journal failed to replay")?;
            println!(
                "Run:    tiles={}, events={}, hash={:#018x}",
                world.tile_count(),
                world.events().len(),
                world.state_hash()
            );
            println!(
                "Replay: tiles={}, events={}, hash={:#018x}",
                replayed.tile_count(),
                replayed.events().len(),
                replayed.state_hash()
            );
            if world.state_hash() != replayed.state_hash() {
                anyhow::bail!("replayed world does not match");
            }
            println!("Match: OK");
        }
        Commands::Stack { blocks } => {
            let stack = blocks.iter().map(|kind| Block::new(*kind));
            let tile = Tile::with_blocks(stack).context("invalid stack")?;
            let mut world = World::new();
            let id = world.add_tile(tile)?;
            if let Some(info) = WorldInspector::inspect_tile(&world, id) {
                println!("valid: {info}");
            }
        }
        Commands::Dump => {
            let (world, builder, _) = run_demo(false)?;
            let dump = serde_json::json!({
                "world": world,
                "builder": builder,
            });
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
    }

    Ok(())
}

/// Three tiles in a line, `home <-> field <-> hill`, and a builder on `home`
/// carrying one wood block.
fn demo_world() -> Result<(World, Builder, [TileId; 3]), BlockWorldError> {
    let mut world = World::new();
    let home = world.add_default_tile();
    let field = world.add_default_tile();
    let hill = world.add_tile(Tile::with_blocks([
        Block::soil(),
        Block::soil(),
        Block::grass(),
        Block::stone(),
        Block::wood(),
    ])?)?;

    world.add_exit(home, "east", field)?;
    world.add_exit(field, "west", home)?;
    world.add_exit(field, "north", hill)?;
    world.add_exit(hill, "south", field)?;

    let builder = Builder::with_inventory("bob", home, vec![Block::wood()])?;
    Ok((world, builder, [home, field, hill]))
}

fn run_demo(print: bool) -> anyhow::Result<(World, Builder, [TileId; 3])> {
    let (mut world, mut builder, tiles) = demo_world().context("demo world is invalid")?;
    if print {
        for id in tiles {
            if let Some(tile) = WorldInspector::inspect_tile(&world, id) {
                println!("{tile}");
            }
        }
    }

    for (n, step) in SCRIPT.into_iter().enumerate() {
        let label = match step {
            Step::Dig => "dig".to_string(),
            Step::Drop(index) => format!("drop inventory[{index}]"),
            Step::MoveTo(t) => format!("move to {}", TILE_NAMES[t]),
            Step::MoveBlock { from, exit } => {
                format!("move top block of {} via {exit:?}", TILE_NAMES[from])
            }
        };
        let result = match step {
            Step::Dig => builder.dig_on_current_tile(&mut world),
            Step::Drop(index) => builder.drop_from_inventory(&mut world, index),
            Step::MoveTo(t) => builder.move_to(&world, tiles[t]),
            Step::MoveBlock { from, exit } => world.move_block(tiles[from], exit),
        };
        match &result {
            Ok(()) => info!(step = n + 1, action = %label, "ok"),
            Err(err) => warn!(step = n + 1, action = %label, %err, "rejected"),
        }
        if print {
            let outcome = match result {
                Ok(()) => "ok".to_string(),
                Err(err) => format!("rejected ({err})"),
            };
            println!("[{}] {label}: {outcome}", n + 1);
            println!("    {}", WorldInspector::inspect_builder(&world, &builder));
            if let Some(tile) = WorldInspector::inspect_tile(&world, builder.current_tile()) {
                println!("    {tile}");
            }
        }
    }

    Ok((world, builder, tiles))
}
