#![forbid(unsafe_code)]

mod config;
mod event;
mod raycast;
mod sandbox;
mod scenario;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sails_blocks::BlockRegistry;
use sails_geom::Vec3;
use sails_mast::{BlockBehavior, MastBlock, OrientationState, PlacementMode};

use config::SandboxConfig;
use sandbox::Sandbox;
use scenario::Scenario;

#[derive(Parser)]
#[command(name = "sails")]
#[command(about = "Mast placement sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a placement scenario against an empty world
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Sandbox config file
        #[arg(long, default_value = "assets/sails.toml")]
        config: PathBuf,

        /// Default log filter when RUST_LOG is unset
        #[arg(long, default_value = "info")]
        log_level: String,
    },
    /// Print the collision box of every valid orientation
    Shapes,
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            scenario,
            config,
            log_level,
        } => {
            init_logging(&log_level);
            run(&scenario, &config)
        }
        Commands::Shapes => {
            init_logging("warn");
            print_shapes();
            Ok(())
        }
    }
}

fn run(scenario_path: &Path, config_path: &Path) -> Result<(), Box<dyn Error>> {
    let cfg = SandboxConfig::load_or_default(config_path)?;
    let reg = BlockRegistry::load_from_path(&cfg.blocks_path)?;
    log::info!(
        "loaded {} block type(s) from {}",
        reg.blocks.len(),
        cfg.blocks_path
    );
    let sc = Scenario::load(scenario_path)?;
    log::info!(
        "scenario {}: {} block(s), {} placement(s)",
        scenario_path.display(),
        sc.blocks.len(),
        sc.placements.len()
    );

    let mut sb = Sandbox::new(cfg, reg)?;
    sb.load_scenario(&sc)?;
    sb.run();

    for (actor, msg) in &sb.outbox.messages {
        println!("[{actor}] {msg}");
    }
    for (actor, reason) in &sb.refusals {
        println!("[{actor}] refused: {reason}");
    }
    for r in &sb.records {
        // World-space collision box of the placed cell
        let cell = Vec3::new(r.pos.x as f32, r.pos.y as f32, r.pos.z as f32);
        let shape = sb.mast.compute_shape(r.state).translated(cell);
        let tag = match r.mode {
            PlacementMode::Preview => " (preview)",
            PlacementMode::Authoritative => "",
        };
        println!(
            "tick {:>3} {} {}: {} box={:?}..{:?}{}",
            r.tick,
            r.actor,
            r.pos,
            r.state,
            shape.min,
            shape.max,
            tag
        );
    }
    Ok(())
}

fn print_shapes() {
    let mast = MastBlock::default();
    for state in OrientationState::all_valid() {
        let b = mast.compute_shape(state);
        println!(
            "{:<28} [{:.4}, {:.4}, {:.4}] - [{:.4}, {:.4}, {:.4}]",
            state.to_string(),
            b.min.x,
            b.min.y,
            b.min.z,
            b.max.x,
            b.max.y,
            b.max.z
        );
    }
}
