pub mod shutdown;
pub mod state;

pub use shutdown::ShutdownManager;
pub use state::{App, RunOptions, RunSummary};

use anyhow::Result;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

impl App {
    /// Ticks the engine until the budget is spent, shutdown is requested, or
    /// the engine can no longer advance, then runs shutdown cleanup.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut pacer = self.options.realtime.then(|| {
            let mut interval =
                tokio::time::interval(Duration::from_millis(self.config.tick_interval_ms));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        while !self.finished() && !self.shutdown.is_shutdown_requested() {
            match pacer.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => tokio::task::yield_now().await,
            }

            if !self.step() {
                tracing::warn!(
                    particles = self.engine.particle_count(),
                    paused = self.engine.is_paused(),
                    "Engine cannot advance, stopping"
                );
                self.shutdown.set_exit_code(1);
                break;
            }
        }

        let interrupted = self.shutdown.is_shutdown_requested();
        self.shutdown.cleanup(&self.engine, &self.metrics)?;

        let summary = self.summary(interrupted);
        tracing::info!(
            ticks = summary.ticks,
            particles = summary.particles,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            mean_tick_us = summary.mean_tick.as_micros() as u64,
            interrupted = summary.interrupted,
            "Run finished"
        );
        Ok(summary)
    }
}
