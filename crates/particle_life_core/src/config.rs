//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every section has defaults, so a file only needs
//! the values it overrides.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags of the driver binary (override both)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! species_count = 6
//! max_particles = 10000
//! seed = 42
//! boundary = "Closed"
//!
//! [physics]
//! dt = 0.02
//! friction_half_life = 0.04
//! r_max = 0.1
//!
//! [spawn]
//! velocity_jitter = 0.005
//! ```

use particle_life_data::BoundaryMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Population, topology and viewport defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of species `M`; fixes the interaction matrix size.
    pub species_count: usize,
    /// Fixed particle-store capacity.
    pub max_particles: usize,
    /// Particles generated when the engine is created.
    pub initial_particles: usize,
    pub seed: Option<u64>,
    pub boundary: BoundaryMode,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            species_count: 6,
            max_particles: 10_000,
            initial_particles: 2_000,
            seed: None,
            boundary: BoundaryMode::Wrap,
            viewport_width: 900.0,
            viewport_height: 700.0,
        }
    }
}

/// Integrator and force-law constants.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed simulation step in seconds.
    pub dt: f64,
    /// Simulated seconds after which an unforced velocity has halved.
    pub friction_half_life: f64,
    /// Interaction cutoff radius, also the spatial-index cell size.
    pub r_max: f64,
    /// Normalized radius where universal repulsion gives way to the matrix term.
    pub beta: f64,
    /// Fraction of speed kept (and reversed) when a particle hits a closed wall.
    pub closed_restitution: f64,
    /// Spread the per-particle force loop over the rayon pool.
    pub parallel: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,
            friction_half_life: 0.04,
            r_max: 0.1,
            beta: 0.3,
            closed_restitution: 0.5,
            parallel: true,
        }
    }
}

impl PhysicsConfig {
    /// Per-step velocity multiplier `0.5^(dt / half_life)`.
    #[must_use]
    pub fn friction_factor(&self) -> f64 {
        0.5f64.powf(self.dt / self.friction_half_life)
    }
}

/// Tuning for generation and the "randomize everything" reset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub randomize_min_particles: usize,
    /// Exclusive upper bound of the reset population.
    pub randomize_max_particles: usize,
    /// Per-axis bound of the initial velocity after a reset.
    pub velocity_jitter: f64,
    /// Random matrix cells are drawn from `[-matrix_range, matrix_range]`.
    pub matrix_range: f64,
    /// Inner radius of the ring shape as a fraction of the outer radius.
    pub ring_inner_ratio: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            randomize_min_particles: 1_000,
            randomize_max_particles: 5_000,
            velocity_jitter: 0.005,
            matrix_range: 0.5,
            ring_inner_ratio: 0.7,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    /// Wall-clock cadence of the driver loop.
    pub tick_interval_ms: u64,
    /// Emit an info-level metrics line every this many ticks.
    pub log_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            physics: PhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            tick_interval_ms: 16,
            log_interval_ticks: 600,
        }
    }
}

impl SimConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(
            self.world.species_count > 0,
            "Species count must be positive"
        );
        anyhow::ensure!(
            self.world.species_count <= 64,
            "Species count too large (max 64)"
        );
        anyhow::ensure!(
            self.world.max_particles > 0,
            "Max particles must be positive"
        );
        anyhow::ensure!(
            self.world.max_particles <= 1_000_000,
            "Max particles too large (max 1000000)"
        );
        anyhow::ensure!(
            self.world.viewport_width >= 0.0 && self.world.viewport_width.is_finite(),
            "Viewport width must be a non-negative number"
        );
        anyhow::ensure!(
            self.world.viewport_height >= 0.0 && self.world.viewport_height.is_finite(),
            "Viewport height must be a non-negative number"
        );

        // Physics validation
        anyhow::ensure!(
            self.physics.dt > 0.0 && self.physics.dt.is_finite(),
            "Time step must be positive"
        );
        anyhow::ensure!(
            self.physics.friction_half_life > 0.0,
            "Friction half-life must be positive"
        );
        anyhow::ensure!(
            self.physics.r_max > 0.0 && self.physics.r_max <= 1.0,
            "Interaction radius must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            self.physics.beta > 0.0 && self.physics.beta < 1.0,
            "Beta must be in (0.0, 1.0)"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.physics.closed_restitution),
            "Closed restitution must be in [0.0, 1.0]"
        );

        // Spawn validation
        anyhow::ensure!(
            self.spawn.randomize_min_particles < self.spawn.randomize_max_particles,
            "Randomize particle range is empty"
        );
        anyhow::ensure!(
            self.spawn.velocity_jitter >= 0.0,
            "Velocity jitter must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.spawn.matrix_range),
            "Matrix range must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.spawn.ring_inner_ratio),
            "Ring inner ratio must be in [0.0, 1.0]"
        );

        // Driver validation
        anyhow::ensure!(self.tick_interval_ms > 0, "Tick interval must be positive");
        anyhow::ensure!(
            self.tick_interval_ms <= 1000,
            "Tick interval too long (max 1000 ms)"
        );
        anyhow::ensure!(
            self.log_interval_ticks > 0,
            "Log interval must be positive"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Stable hash of every parameter that changes simulated behavior.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.physics).as_bytes());
        hasher.update(format!("{:?}", self.spawn).as_bytes());
        hex::encode(hasher.finalize())
    }
}
