mod scenario;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use scenario::{FrameLine, Scenario};

#[derive(Parser)]
#[command(name = "liminal-cli", about = "Run perspective manipulation scenarios")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Grab a cube five units away and carry it to a wall
    Demo {
        /// Distance from the viewer to the wall
        #[arg(short, long, default_value = "10")]
        far: f32,
    },
    /// Simulate a scenario file frame by frame
    Run {
        /// YAML scenario to load
        #[arg(short, long)]
        scenario: PathBuf,
        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("liminal-cli v{}", env!("CARGO_PKG_VERSION"));
            let config = liminal_manipulate::ManipulatorConfig::default();
            println!(
                "manipulator defaults: offset_factor={} collision_check_distance={} clip_fallback={:?}",
                config.offset_factor, config.collision_check_distance, config.clip_fallback
            );
        }
        Commands::Demo { far } => {
            anyhow::ensure!(far > 0.0, "wall distance must be positive");
            println!("Demo: cube at 5.0, wall at {far}");
            let lines = Scenario::demo(far).run()?;
            print_lines(&lines, false)?;
            if let Some(object) = lines.last().and_then(|l| l.object.as_ref()) {
                println!("Expected scale {:.3}, got {:.3}", far / 5.0, object.scale.x);
            }
        }
        Commands::Run { scenario, json } => {
            let scenario = Scenario::load(&scenario)?;
            tracing::info!(
                objects = scenario.objects.len(),
                frames = scenario.frames.len(),
                "scenario loaded"
            );
            let lines = scenario.run()?;
            print_lines(&lines, json)?;
        }
    }

    Ok(())
}

fn print_lines(lines: &[FrameLine], json: bool) -> anyhow::Result<()> {
    for line in lines {
        if json {
            println!("{}", serde_json::to_string(line)?);
        } else {
            println!("{line}");
        }
    }
    Ok(())
}
