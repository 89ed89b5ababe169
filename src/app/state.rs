use anyhow::{Context, Result};
use particle_life_core::{Metrics, SimConfig, SimulationEngine};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::shutdown::ShutdownManager;

/// How long and how fast the driver runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Ticks to run; `0` runs until shutdown is requested.
    pub ticks: u64,
    /// Pace ticks at `tick_interval_ms` instead of running flat out.
    pub realtime: bool,
    /// Call `randomize_everything` before the first tick.
    pub randomize: bool,
    /// Final snapshot destination.
    pub dump: Option<PathBuf>,
}

/// End-of-run report.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub particles: usize,
    pub elapsed: Duration,
    pub mean_tick: Duration,
    pub mean_speed: f64,
    pub interrupted: bool,
}

pub struct App {
    pub engine: SimulationEngine,
    pub config: SimConfig,
    pub options: RunOptions,
    pub metrics: Metrics,
    pub shutdown: ShutdownManager,
    pub ticks_run: u64,
}

impl App {
    pub fn new(config: SimConfig, options: RunOptions) -> Result<Self> {
        let engine =
            SimulationEngine::new(config.clone()).context("failed to build simulation engine")?;
        let metrics = Metrics::new(config.log_interval_ticks);
        let mut shutdown = ShutdownManager::new();
        shutdown.set_dump_path(options.dump.clone());

        tracing::info!(
            fingerprint = %config.fingerprint(),
            species = config.world.species_count,
            particles = engine.particle_count(),
            boundary = %engine.boundary_mode(),
            "Simulation initialized"
        );

        let mut app = Self {
            engine,
            config,
            options,
            metrics,
            shutdown,
            ticks_run: 0,
        };
        if app.options.randomize {
            app.randomize_everything();
        }
        Ok(app)
    }

    /// Advances the engine once and records timing. Returns whether the
    /// world moved.
    pub fn step(&mut self) -> bool {
        let start = Instant::now();
        let advanced = self.engine.tick();
        if advanced {
            self.ticks_run += 1;
            self.metrics
                .record_tick(start.elapsed(), self.engine.particle_count());
        }
        advanced
    }

    pub fn randomize_everything(&mut self) {
        self.engine.randomize_everything();
        self.metrics.increment_counter("randomize_everything");
        self.metrics.log_event(
            "randomize_everything",
            &format!("{} particles", self.engine.particle_count()),
        );
    }

    /// Whether the requested tick budget is spent.
    pub fn finished(&self) -> bool {
        self.options.ticks > 0 && self.ticks_run >= self.options.ticks
    }

    pub fn summary(&self, interrupted: bool) -> RunSummary {
        RunSummary {
            ticks: self.ticks_run,
            particles: self.engine.particle_count(),
            elapsed: self.metrics.elapsed(),
            mean_tick: self.metrics.mean_tick_duration(),
            mean_speed: self.engine.snapshot().mean_speed(),
            interrupted,
        }
    }
}
