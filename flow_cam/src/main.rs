//! flow_cam: command-line entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flow_cam::app::{run, AppConfig};
use flow_core::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "flow_cam", version, about = "Motion-reactive flow-field particle visualizer")]
struct Cli {
    /// JSON file with simulation settings; missing fields use defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Seed for particle placement, colors and noise (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second produced by the capture thread
    #[arg(long, default_value_t = 30)]
    camera_fps: u32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (cli.verbose, cli.quiet) {
        (_, true) => log::LevelFilter::Error,
        (0, _)    => log::LevelFilter::Warn,
        (1, _)    => log::LevelFilter::Info,
        (2, _)    => log::LevelFilter::Debug,
        _         => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    let mut sim = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("could not load config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if cli.seed.is_some() {
        sim.seed = cli.seed;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Flow Cam: motion-reactive flow-field particles      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Canvas {}x{}, up to {} particles, camera {}x{} @ {} fps",
        cli.width, cli.height, sim.max_particles,
        sim.source_width, sim.source_height, cli.camera_fps);
    match sim.seed {
        Some(seed) => println!("  Seed {}", seed),
        None       => println!("  Seed from entropy"),
    }
    println!("  Press Esc or Q to quit.");
    println!();

    run(AppConfig {
        sim,
        width:      cli.width.max(1),
        height:     cli.height.max(1),
        camera_fps: cli.camera_fps,
    })
}
