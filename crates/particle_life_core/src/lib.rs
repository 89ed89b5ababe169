//! # Particle Life Core
//!
//! The simulation engine for particle life: typed particles pushing and
//! pulling on each other through an asymmetric per-species interaction
//! matrix.
//!
//! This crate contains:
//! - The interaction matrix and the radial force law
//! - A counting-sort spatial hash rebuilt every tick
//! - The integrator with wrap, closed and unbounded boundaries
//! - Structure-of-arrays particle storage with shape placement
//! - Configuration, snapshots, metrics and structured logging
//!
//! ## Architecture
//!
//! Each tick rebuilds the spatial hash, computes every particle's net force
//! from the frozen pre-tick positions (on the rayon pool when enabled), then
//! integrates velocities and positions. Results are deterministic for a given
//! seed whether or not the force pass runs in parallel.
//!
//! ## Example
//!
//! ```
//! use particle_life_core::{SimConfig, SimulationEngine};
//!
//! let mut config = SimConfig::default();
//! config.world.seed = Some(42);
//! config.world.initial_particles = 500;
//!
//! let mut engine = SimulationEngine::new(config).unwrap();
//! for _ in 0..10 {
//!     engine.tick();
//! }
//! assert_eq!(engine.tick_count(), 10);
//! assert_eq!(engine.particle_count(), 500);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// The simulation engine that owns and advances the world
pub mod engine;
/// Error types
pub mod error;
/// Radial force law
pub mod force;
/// Force accumulation, integration and boundary policies
pub mod integrator;
/// Per-species-pair interaction coefficients
pub mod matrix;
/// Performance metrics collection and logging
pub mod metrics;
/// Structure-of-arrays particle storage
pub mod particles;
/// Shape sampling for placement
pub mod placement;
/// Serializable world snapshots
pub mod snapshot;
/// Spatial hashing for neighbor queries
pub mod spatial_hash;
/// Screen-space viewport and coordinate transforms
pub mod viewport;

pub use config::SimConfig;
pub use engine::SimulationEngine;
pub use error::{Result, SimError};
pub use force::ForceLaw;
pub use matrix::InteractionMatrix;
pub use metrics::{init_logging, Metrics};
pub use snapshot::WorldSnapshot;
pub use viewport::Viewport;
pub use particle_life_data::{BoundaryMode, Particle, PlacementShape, RunState, Vec2};
