use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use turtle::{Game, GameConfig, TurtleGame};
use turtle_creature::TurtleMorphology;
use turtle_physics::RapierWorld;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to load instead of ./turtle.ron
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Seconds per tick
    #[arg(long)]
    timestep: Option<f32>,

    /// Turtle scale
    #[arg(long)]
    scale: Option<f32>,

    /// Print the turtle body plan as RON and exit
    #[arg(long)]
    dump_morphology: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load_from(path)?,
        None => GameConfig::load()?,
    };

    let default_filter = if args.verbose || config.debug.verbose_logging {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if let Some(timestep) = args.timestep {
        config.simulation.timestep = timestep;
    }
    if let Some(scale) = args.scale {
        config.scene.turtle_scale = scale;
    }

    if config.simulation.timestep <= 0.0 {
        anyhow::bail!(
            "Timestep must be positive, got {}",
            config.simulation.timestep
        );
    }

    if args.dump_morphology {
        let morphology =
            TurtleMorphology::new(config.scene.turtle_position(), config.scene.turtle_scale);
        morphology
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid turtle body plan")?;
        let ron = ron::ser::to_string_pretty(&morphology, ron::ser::PrettyConfig::default())
            .context("Failed to serialize turtle body plan")?;
        println!("{}", ron);
        return Ok(());
    }

    log::info!("Starting Turtle");
    run(config)
}

fn run(config: GameConfig) -> anyhow::Result<()> {
    let ticks = config.simulation.ticks;
    let timestep = config.simulation.timestep;

    let mut game: TurtleGame<RapierWorld> = TurtleGame::new(config);
    if !game.initialise() {
        anyhow::bail!("Failed to initialise turtle scene");
    }

    let mut flips = 0;
    for _ in 0..ticks {
        game.update(timestep);
        if game.last_report().is_some_and(|report| report.flipped) {
            flips += 1;
        }
    }

    if let Some(report) = game.last_report() {
        log::info!(
            "Finished {} ticks ({:.2}s): distance to ball {:.2}, head off by {:.1} degrees, {} shell flip(s)",
            game.frames(),
            game.elapsed(),
            report.distance_to_target,
            report.head_aim.degrees,
            flips
        );
    }

    game.cleanup();
    Ok(())
}
