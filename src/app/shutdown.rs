//! Graceful shutdown handling for the driver.
//!
//! Provides Ctrl-C handling and the cleanup run before the process exits.

use anyhow::{Context, Result};
use particle_life_core::{Metrics, SimulationEngine};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Manages graceful shutdown of the driver.
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
    dump_path: Option<PathBuf>,
    exit_code: i32,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    /// Creates a new shutdown manager.
    pub fn new() -> Self {
        Self {
            shutdown_requested: Arc::new(AtomicBool::new(false)),
            dump_path: None,
            exit_code: 0,
        }
    }

    /// Sets where the final snapshot is written on exit.
    pub fn set_dump_path(&mut self, path: Option<PathBuf>) {
        self.dump_path = path;
    }

    pub fn dump_path(&self) -> Option<&Path> {
        self.dump_path.as_deref()
    }

    /// Requests shutdown.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        tracing::info!("Shutdown requested");
    }

    /// Checks if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Spawns a task that requests shutdown on Ctrl-C.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let flag = Arc::clone(&self.shutdown_requested);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, initiating graceful shutdown...");
                flag.store(true, Ordering::SeqCst);
            }
        });
    }

    /// Sets the exit code.
    pub fn set_exit_code(&mut self, code: i32) {
        self.exit_code = code;
    }

    /// Gets the exit code.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Performs cleanup operations before shutdown.
    pub fn cleanup(&self, engine: &SimulationEngine, metrics: &Metrics) -> Result<()> {
        tracing::info!("Performing shutdown cleanup...");

        if let Some(path) = &self.dump_path {
            tracing::info!(path = %path.display(), "Writing final snapshot...");
            engine
                .snapshot()
                .write_json(path)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
            metrics.increment_counter("snapshots");
        }

        tracing::info!("Cleanup complete");
        Ok(())
    }
}
