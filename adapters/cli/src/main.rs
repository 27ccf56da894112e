#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Frost Defence battlefield and runs a
//! headless session on it.

mod map;
mod simulation;

use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use frost_defence_core::{config::GameConfig, BuildKind, EntityKind, Event};
use frost_defence_system_bootstrap::Bootstrap;
use frost_defence_world::query;
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use simulation::Simulation;

/// Command-line arguments accepted by the adapter.
#[derive(Debug, Parser)]
#[command(name = "frost-defence", about = "Headless Frost Defence session runner")]
struct Args {
    /// Seed driving terrain generation and enemy spawning.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML file overriding the default configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Simulated milliseconds per frame.
    #[arg(long = "dt-ms", default_value_t = 100)]
    dt_ms: u64,

    /// Defenders to build on the first free platforms before the session starts.
    #[arg(long, default_value_t = 0)]
    defenders: usize,

    /// Builds a tower on the platform nearest to `X,Z`; may be repeated.
    #[arg(long = "place", value_name = "X,Z")]
    place: Vec<Point>,

    /// Prints an ASCII map of the battlefield when the session ends.
    #[arg(long)]
    map: bool,
}

/// Ground-plane coordinate parsed from `X,Z`.
#[derive(Clone, Copy, Debug)]
struct Point {
    x: f32,
    z: f32,
}

impl FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let Some((x, z)) = value.split_once(',') else {
            bail!("expected X,Z but found {value:?}");
        };
        Ok(Self {
            x: x.trim().parse().context("invalid X coordinate")?,
            z: z.trim().parse().context("invalid Z coordinate")?,
        })
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Entry point for the Frost Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let bootstrap = Bootstrap;
    println!("{}", bootstrap.welcome_banner());

    let layout = bootstrap.generate(&config.generation, args.seed);
    let mut simulation = Simulation::new(layout, &config, args.seed);

    let mut built = simulation.fill_sites(BuildKind::Defender, args.defenders);
    for point in &args.place {
        built.extend(simulation.place_near(BuildKind::Tower, Vec3::new(point.x, 0.0, point.z)));
    }
    for event in &built {
        if let Event::BuildRejected { kind, site, reason } = event {
            tracing::warn!(?kind, x = site.x(), z = site.z(), ?reason, "build rejected");
        }
    }

    let dt = Duration::from_millis(args.dt_ms);
    let mut destroyed = 0_usize;
    for _ in 0..args.ticks {
        let events = simulation.step(dt);
        destroyed += events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::EntityDestroyed {
                        kind: EntityKind::Enemy,
                        ..
                    }
                )
            })
            .count();
        if events.contains(&Event::ObjectiveDestroyed) {
            tracing::info!(tick = query::tick_index(simulation.world()), "objective destroyed");
            break;
        }
    }

    let summary = query::summary(simulation.world());
    println!("ticks:        {}", summary.tick_index);
    println!("session:      {:?}", summary.session);
    println!("structures:   {}", summary.structures);
    println!("enemies:      {} alive, {} destroyed", summary.enemies_alive, destroyed);
    println!("projectiles:  {}", summary.projectiles_in_flight);
    match summary.objective_health {
        Some(health) => println!("objective:    {:.1}/{:.1}", health.current(), health.max()),
        None => println!("objective:    destroyed"),
    }

    if args.map {
        print!("{}", map::render(simulation.world()));
    }
    Ok(())
}
