pub mod macros;

use particle_life_lib::model::config::SimConfig;
use particle_life_lib::model::state::{BoundaryMode, Vec2};
use particle_life_lib::model::viewport::Viewport;
use particle_life_lib::model::SimulationEngine;

type EngineMod = Box<dyn FnOnce(&mut SimulationEngine)>;

#[allow(dead_code)]
pub struct EngineBuilder {
    config: SimConfig,
    particles: Vec<(Vec2, Vec2, usize)>,
    matrix: Vec<(usize, usize, f64)>,
    mods: Vec<EngineMod>,
}

#[allow(dead_code)]
impl EngineBuilder {
    /// Empty, seeded world with the default physics.
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.world.initial_particles = 0;
        config.world.seed = Some(0);
        Self {
            config,
            particles: Vec::new(),
            matrix: Vec::new(),
            mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryMode) -> Self {
        self.config.world.boundary = boundary;
        self
    }

    pub fn with_random_particles(mut self, count: usize) -> Self {
        self.config.world.initial_particles = count;
        self.config.world.max_particles = self.config.world.max_particles.max(count);
        self
    }

    pub fn with_particle(mut self, x: f64, y: f64, species: usize) -> Self {
        self.particles
            .push((Vec2::new(x, y), Vec2::ZERO, species));
        self
    }

    pub fn with_moving_particle(mut self, position: Vec2, velocity: Vec2, species: usize) -> Self {
        self.particles.push((position, velocity, species));
        self
    }

    /// Sets every matrix cell to `value` once the engine exists.
    pub fn with_uniform_matrix(mut self, value: f64) -> Self {
        let m = self.config.world.species_count;
        for i in 0..m {
            for j in 0..m {
                self.matrix.push((i, j, value));
            }
        }
        self
    }

    pub fn with_matrix_value(mut self, i: usize, j: usize, value: f64) -> Self {
        self.matrix.push((i, j, value));
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.mods.push(Box::new(move |engine| {
            engine.set_viewport(Viewport::new(width, height));
        }));
        self
    }

    pub fn build(self) -> SimulationEngine {
        let mut engine = SimulationEngine::new(self.config).expect("valid test config");
        for (i, j, v) in self.matrix {
            engine.set_matrix_value(i, j, v);
        }
        for (position, velocity, species) in self.particles {
            assert!(
                engine.spawn_particle(position, velocity, species),
                "test world over capacity"
            );
        }
        for m in self.mods {
            m(&mut engine);
        }
        engine
    }
}

/// Every live position, in slot order.
#[allow(dead_code)]
pub fn positions(engine: &SimulationEngine) -> Vec<Vec2> {
    (0..engine.particle_count())
        .map(|i| engine.position(i))
        .collect()
}
