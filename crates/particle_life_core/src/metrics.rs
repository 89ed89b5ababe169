//! Performance metrics collection for the simulation.
//!
//! Provides structured logging and metrics tracking for drivers that run the
//! engine for long stretches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Tick and event statistics, shareable across threads.
pub struct Metrics {
    tick_count: AtomicU64,
    particle_count: AtomicU64,
    total_tick_nanos: AtomicU64,
    max_tick_nanos: AtomicU64,
    log_interval: u64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(600)
    }
}

impl Metrics {
    /// Creates a collector that logs a summary every `log_interval` ticks.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            particle_count: AtomicU64::new(0),
            total_tick_nanos: AtomicU64::new(0),
            max_tick_nanos: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, particles: usize) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.particle_count.store(particles as u64, Ordering::Relaxed);
        self.total_tick_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_tick_nanos.fetch_max(nanos, Ordering::Relaxed);

        if tick.is_multiple_of(self.log_interval) {
            tracing::info!(
                tick = tick,
                particles = particles,
                duration_us = duration.as_micros() as u64,
                mean_us = self.mean_tick_duration().as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of a named counter, zero if it was never incremented.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn particle_count(&self) -> u64 {
        self.particle_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn mean_tick_duration(&self) -> Duration {
        let ticks = self.tick_count();
        if ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_tick_nanos.load(Ordering::Relaxed) / ticks)
    }

    #[must_use]
    pub fn max_tick_duration(&self) -> Duration {
        Duration::from_nanos(self.max_tick_nanos.load(Ordering::Relaxed))
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs a simulation event.
    pub fn log_event(&self, event_type: &str, details: &str) {
        tracing::info!(
            event_type = event_type,
            details = details,
            "Simulation event"
        );
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `default_filter`
/// (for example `"info"` or `"particle_life_core=debug"`). Calling this more
/// than once is harmless.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
