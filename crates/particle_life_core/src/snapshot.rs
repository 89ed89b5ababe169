//! Serializable copy of the world, for renderers and JSON dumps.

use crate::error::Result;
use crate::matrix::InteractionMatrix;
use particle_life_data::{BoundaryMode, Particle, RunState};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub boundary: BoundaryMode,
    pub run_state: RunState,
    pub matrix: InteractionMatrix,
    pub particles: Vec<Particle>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes pretty-printed JSON to `path`, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Mean particle speed, for log lines and quick sanity checks.
    pub fn mean_speed(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f64 = self.particles.iter().map(|p| p.velocity.length()).sum();
        total / self.particles.len() as f64
    }
}
