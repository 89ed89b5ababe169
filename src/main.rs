use anyhow::{Context, Result};
use clap::Parser;
use particle_life_lib::app::{App, RunOptions};
use particle_life_lib::model::config::SimConfig;
use particle_life_lib::model::metrics::init_logging;
use particle_life_lib::model::state::BoundaryMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Ticks to run (0 = until Ctrl-C)
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Boundary mode: wrap, closed or infinite
    #[arg(short, long)]
    boundary: Option<BoundaryMode>,

    /// Initial particle count (raises capacity if needed)
    #[arg(short, long)]
    particles: Option<usize>,

    /// Randomize matrix, species subset and population before starting
    #[arg(long)]
    randomize: bool,

    /// Pace ticks at the configured tick interval
    #[arg(long)]
    realtime: bool,

    /// Write the final world snapshot as JSON
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

impl Args {
    fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(seed) = self.seed {
            config.world.seed = Some(seed);
        }
        if let Some(boundary) = self.boundary {
            config.world.boundary = boundary;
        }
        if let Some(particles) = self.particles {
            config.world.initial_particles = particles;
            config.world.max_particles = config.world.max_particles.max(particles);
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            ticks: self.ticks,
            realtime: self.realtime,
            randomize: self.randomize,
            dump: self.dump.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log);

    let mut config = SimConfig::load(&args.config)?;
    args.apply_overrides(&mut config);
    config.validate().context("invalid configuration")?;

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut app = App::new(config, args.run_options())?;
    app.shutdown.listen_for_ctrl_c();
    let summary = app.run().await?;

    println!(
        "{} ticks, {} particles, mean tick {:?}, mean speed {:.5}",
        summary.ticks, summary.particles, summary.mean_tick, summary.mean_speed
    );
    let code = app.shutdown.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
