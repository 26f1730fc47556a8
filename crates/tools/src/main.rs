use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use companion_core::{
    ContentPack, FishingTuning, Inventory, Leader, LogEvent, Map, Pos, Session, Tick, TileKind,
    World,
};

/// Headless session runner: builds a small lakeside world, lets the
/// companion roster fish for a while, and prints the event log plus the
/// leader's haul.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the session's random stream
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of scheduler ticks to simulate
    #[arg(short, long, default_value_t = 2000)]
    ticks: u32,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 50)]
    tick_ms: u32,

    /// Leader fishing skill, 0-10
    #[arg(long, default_value_t = 5)]
    skill: u8,

    /// Optional path to a tuning JSON file overriding the defaults
    #[arg(long)]
    tuning: Option<String>,
}

fn load_tuning(path: Option<&str>) -> Result<FishingTuning> {
    let Some(path) = path else {
        return Ok(FishingTuning::default());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read tuning file: {path}"))?;
    FishingTuning::from_json_str(&json)
        .with_context(|| format!("failed to parse tuning file: {path}"))
}

fn lakeside_world(skill: u8) -> World {
    let mut map = Map::new(24, 18);
    // A pond in the eastern half, with open shoreline on both banks.
    for y in 5..=11 {
        for x in 14..=17 {
            map.set_tile(Pos { y, x }, TileKind::Water);
        }
    }
    let leader =
        Leader { pos: Pos { y: 8, x: 10 }, fishing_skill: skill, inventory: Inventory::with_capacity(36) };
    let mut world = World::new(map, leader);
    world.spawn_companion("willow", Pos { y: 8, x: 11 });
    world.spawn_companion("marlin", Pos { y: 9, x: 11 });
    world
}

fn main() -> Result<()> {
    let args = Args::parse();
    let tuning = load_tuning(args.tuning.as_deref())?;
    let content = ContentPack::default();

    let mut world = lakeside_world(args.skill);
    let mut session = Session::new(&world, &tuning, &content, args.seed);

    for _ in 0..args.ticks {
        session.tick(Tick { delta_ms: args.tick_ms }, &mut world);
    }
    session.deactivate_all(&mut world);
    session.collect_rewards(&mut world);

    for note in session.log() {
        println!("[{}] {:?}", note.companion, note.event);
    }

    let caught = session
        .log()
        .iter()
        .filter(|note| matches!(note.event, LogEvent::RewardProduced { .. }))
        .count();
    println!();
    println!("Ticks simulated: {}", session.ticks());
    println!("Rewards produced: {caught}");
    println!("Leader inventory ({} items):", world.leader.inventory.items().len());
    for fish in world.leader.inventory.items() {
        println!("  {} ({:?})", fish.species, fish.quality);
    }

    Ok(())
}
