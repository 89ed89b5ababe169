pub use particle_life_core::{SimulationEngine, WorldSnapshot};
pub mod config {
    pub use particle_life_core::config::*;
}
pub mod engine {
    pub use particle_life_core::engine::*;
}
pub mod error {
    pub use particle_life_core::error::*;
}
pub mod force {
    pub use particle_life_core::force::*;
}
pub mod integrator {
    pub use particle_life_core::integrator::*;
}
pub mod matrix {
    pub use particle_life_core::matrix::*;
}
pub mod metrics {
    pub use particle_life_core::metrics::*;
}
pub mod particles {
    pub use particle_life_core::particles::*;
}
pub mod placement {
    pub use particle_life_core::placement::*;
}
pub mod snapshot {
    pub use particle_life_core::snapshot::*;
}
pub mod spatial_hash {
    pub use particle_life_core::spatial_hash::*;
}
pub mod viewport {
    pub use particle_life_core::viewport::*;
}

pub mod state {
    pub use particle_life_data::*;
}
