//! The simulation engine: owns all particle-life state and advances it.
//!
//! `SimulationEngine` is a plain object with no callbacks. A driver calls
//! [`tick`](SimulationEngine::tick) once per frame; UI layers call the edit
//! operations between ticks and poll the read accessors to draw.

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::integrator::{confine, Integrator, StepStats};
use crate::matrix::InteractionMatrix;
use crate::particles::ParticleStore;
use crate::placement::ShapeRegion;
use crate::snapshot::WorldSnapshot;
use crate::spatial_hash::SpatialHash;
use crate::viewport::Viewport;
use particle_life_data::{BoundaryMode, Particle, PlacementShape, RunState, Vec2};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

/// Fewest species `randomize_everything` activates when the matrix allows it.
const MIN_ACTIVE_SPECIES: usize = 3;

pub struct SimulationEngine {
    config: SimConfig,
    species_count: usize,
    matrix: InteractionMatrix,
    store: ParticleStore,
    index: SpatialHash,
    forces: Vec<Vec2>,
    integrator: Integrator,
    boundary: BoundaryMode,
    run_state: RunState,
    viewport: Viewport,
    rng: ChaCha8Rng,
    tick: u64,
    last_step: StepStats,
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("species_count", &self.species_count)
            .field("particles", &self.store.len())
            .field("capacity", &self.store.capacity())
            .field("boundary", &self.boundary)
            .field("run_state", &self.run_state)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl SimulationEngine {
    /// Builds an engine from a validated configuration.
    ///
    /// The matrix is randomized and `initial_particles` are generated from
    /// the configured seed, or from OS entropy when no seed is set.
    pub fn new(config: SimConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SimError::invalid_config(format!("{e:#}")))?;

        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let species_count = config.world.species_count;
        let viewport = Viewport::new(config.world.viewport_width, config.world.viewport_height);

        let mut engine = Self {
            species_count,
            matrix: InteractionMatrix::new(species_count),
            store: ParticleStore::new(config.world.max_particles),
            index: SpatialHash::new(config.physics.r_max),
            forces: Vec::new(),
            integrator: Integrator::from_config(&config.physics),
            boundary: config.world.boundary,
            run_state: RunState::Running,
            viewport,
            rng,
            tick: 0,
            last_step: StepStats::default(),
            config,
        };
        engine.randomize_matrix();
        engine.generate_random(engine.config.world.initial_particles);

        debug!(
            species = species_count,
            capacity = engine.capacity(),
            particles = engine.particle_count(),
            boundary = %engine.boundary,
            "engine created"
        );
        Ok(engine)
    }

    /// Restarts the random stream. Used by tests and by drivers that expose a
    /// `--seed` override after construction.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Advances the world by one time step.
    ///
    /// Returns `false` without touching any state when paused, when there are
    /// no particles, or when the viewport has no area.
    pub fn tick(&mut self) -> bool {
        if self.run_state == RunState::Paused
            || self.store.is_empty()
            || self.viewport.is_degenerate()
        {
            return false;
        }
        let aspect = self.viewport.aspect();
        let boundary = self.boundary;

        self.index
            .build(self.store.xs(), self.store.ys(), boundary.is_toroidal());
        self.integrator.accumulate_forces(
            &self.store,
            &self.matrix,
            &self.index,
            boundary,
            aspect,
            &mut self.forces,
        );
        self.last_step = self
            .integrator
            .integrate(&mut self.store, &self.forces, boundary, aspect);
        self.tick += 1;

        trace!(
            tick = self.tick,
            particles = self.store.len(),
            cells = self.index.occupied_cells(),
            wall_hits = self.last_step.wall_hits,
            "tick"
        );
        true
    }

    /// Number of ticks that actually advanced the world.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn last_step(&self) -> StepStats {
        self.last_step
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary
    }

    /// Takes effect on the next tick. Existing positions are left as they
    /// are; the next integration step brings them into the new domain.
    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        if mode != self.boundary {
            debug!(from = %self.boundary, to = %mode, "boundary mode changed");
            self.boundary = mode;
        }
    }

    /// Sets one matrix cell, clamped to `[-1, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not a valid species.
    pub fn set_matrix_value(&mut self, i: usize, j: usize, value: f64) {
        self.matrix.set(i, j, value);
    }

    /// Checked form of [`set_matrix_value`](Self::set_matrix_value) for
    /// untrusted input. Returns the stored (clamped) value.
    pub fn try_set_matrix_value(&mut self, i: usize, j: usize, value: f64) -> Result<f64> {
        self.matrix.try_set(i, j, value)
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn species_count(&self) -> usize {
        self.species_count
    }

    pub fn randomize_matrix(&mut self) {
        self.matrix
            .randomize(self.config.spawn.matrix_range, &mut self.rng);
        debug!(range = self.config.spawn.matrix_range, "matrix randomized");
    }

    /// Fresh matrix, a random subset of active species and a fresh population
    /// with small random velocities.
    ///
    /// Between three and `M` species are activated (all of them when `M` is
    /// below three). The population size is drawn from the configured
    /// `[randomize_min_particles, randomize_max_particles)` range and
    /// truncated at capacity.
    pub fn randomize_everything(&mut self) {
        self.randomize_matrix();

        let m = self.species_count;
        let active_count = if m < MIN_ACTIVE_SPECIES {
            m
        } else {
            self.rng.gen_range(MIN_ACTIVE_SPECIES..=m)
        };
        let mut species: Vec<usize> = (0..m).collect();
        species.shuffle(&mut self.rng);
        species.truncate(active_count);

        let spawn = &self.config.spawn;
        let requested = self
            .rng
            .gen_range(spawn.randomize_min_particles..spawn.randomize_max_particles);
        let jitter = spawn.velocity_jitter;

        self.store.clear();
        for _ in 0..requested.min(self.store.capacity()) {
            let s = species[self.rng.gen_range(0..active_count)];
            let position = Vec2::new(self.rng.gen::<f64>(), self.rng.gen::<f64>());
            let velocity = Vec2::new(
                (self.rng.gen::<f64>() - 0.5) * 2.0 * jitter,
                (self.rng.gen::<f64>() - 0.5) * 2.0 * jitter,
            );
            self.store.push(position, velocity, s);
        }
        self.warn_truncated("randomize_everything", requested, self.store.len());

        debug!(
            active = ?species,
            particles = self.store.len(),
            "randomized everything"
        );
    }

    /// Resets the live count to zero.
    pub fn clear_particles(&mut self) {
        self.store.clear();
        debug!("particles cleared");
    }

    /// Replaces the population with `count` uniformly placed particles at
    /// rest. Returns how many were written.
    pub fn generate_random(&mut self, count: usize) -> usize {
        let written = self
            .store
            .generate_random(count, self.species_count, &mut self.rng);
        self.warn_truncated("generate_random", count, written);
        debug!(requested = count, written, "generated random particles");
        written
    }

    /// Places up to `count` particles of `species` in `shape`, spanning the
    /// drag from `start` to `end` in screen coordinates.
    ///
    /// Returns how many were placed, which is zero while the viewport is
    /// zero-sized or its zoom is not a positive finite number.
    ///
    /// # Panics
    ///
    /// Panics if `species` is not a valid species.
    pub fn place_in_shape(
        &mut self,
        shape: PlacementShape,
        start: Vec2,
        end: Vec2,
        count: usize,
        species: usize,
    ) -> usize {
        self.check_species(species);
        if !self.viewport.maps_screen() {
            debug!(viewport = ?self.viewport, "viewport cannot map screen points, nothing placed");
            return 0;
        }
        let start = self.viewport.screen_to_sim(start);
        let end = self.viewport.screen_to_sim(end);
        self.place_in_region(shape, start, end, count, species)
    }

    /// Simulation-space form of [`place_in_shape`](Self::place_in_shape).
    pub fn place_in_region(
        &mut self,
        shape: PlacementShape,
        start: Vec2,
        end: Vec2,
        count: usize,
        species: usize,
    ) -> usize {
        self.check_species(species);
        if !(start.is_finite() && end.is_finite()) {
            debug!(?start, ?end, "non-finite placement region, nothing placed");
            return 0;
        }
        let region = ShapeRegion::from_endpoints(start, end);
        let ratio = self.config.spawn.ring_inner_ratio;
        let target = count.min(self.store.remaining());
        let mut placed = 0;
        for _ in 0..target {
            let p = confine(region.sample(shape, ratio, &mut self.rng), self.boundary);
            if p.is_finite() {
                self.store.push(p, Vec2::ZERO, species);
                placed += 1;
            }
        }
        self.warn_truncated("place_in_shape", count, target);
        debug!(%shape, species, placed, "placed particles");
        placed
    }

    /// Adds one particle. Returns `false` when the store is full.
    ///
    /// # Panics
    ///
    /// Panics if `species` is not a valid species.
    pub fn spawn_particle(&mut self, position: Vec2, velocity: Vec2, species: usize) -> bool {
        self.check_species(species);
        self.store
            .push(confine(position, self.boundary), velocity, species)
    }

    fn check_species(&self, species: usize) {
        assert!(
            species < self.species_count,
            "species {species} out of range (species count {})",
            self.species_count
        );
    }

    fn warn_truncated(&self, operation: &'static str, requested: usize, written: usize) {
        if written < requested {
            warn!(
                operation,
                requested,
                written,
                capacity = self.store.capacity(),
                "particle capacity reached, request truncated"
            );
        }
    }

    pub fn pause(&mut self) {
        self.run_state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        self.run_state = RunState::Running;
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.run_state = self.run_state.toggled();
        self.run_state
    }

    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn position(&self, i: usize) -> Vec2 {
        self.store.position(i)
    }

    pub fn velocity(&self, i: usize) -> Vec2 {
        self.store.velocity(i)
    }

    pub fn species(&self, i: usize) -> usize {
        self.store.species(i)
    }

    pub fn particle(&self, i: usize) -> Particle {
        self.store.particle(i)
    }

    /// Live positions as parallel `(xs, ys)` slices.
    pub fn positions(&self) -> (&[f64], &[f64]) {
        (self.store.xs(), self.store.ys())
    }

    pub fn species_slice(&self) -> &[usize] {
        self.store.species_slice()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn species_histogram(&self) -> Vec<usize> {
        self.store.species_histogram(self.species_count)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            boundary: self.boundary,
            run_state: self.run_state,
            matrix: self.matrix.clone(),
            particles: self.store.iter().collect(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SimulationEngine {
        let mut config = SimConfig::default();
        config.world.seed = Some(seed);
        config.world.initial_particles = 0;
        config.world.max_particles = 6_000;
        SimulationEngine::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.physics.beta = 1.5;
        let err = SimulationEngine::new(config).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_new_generates_initial_particles() {
        let mut config = SimConfig::default();
        config.world.seed = Some(1);
        let engine = SimulationEngine::new(config).unwrap();
        assert_eq!(engine.particle_count(), 2_000);
        assert_eq!(engine.matrix().size(), 6);
        assert!(engine
            .matrix()
            .as_slice()
            .iter()
            .all(|v| (-0.5..=0.5).contains(v)));
    }

    #[test]
    fn test_tick_noop_when_empty_or_degenerate() {
        let mut engine = seeded(2);
        assert!(!engine.tick());

        engine.generate_random(10);
        engine.set_viewport(Viewport::new(0.0, 700.0));
        let before = engine.snapshot();
        assert!(!engine.tick());
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.tick_count(), 0);
    }

    #[test]
    fn test_place_in_shape_needs_mappable_viewport() {
        let mut engine = seeded(4);
        engine.set_viewport(Viewport::new(0.0, 0.0));
        let placed = engine.place_in_shape(
            PlacementShape::Circle,
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 20.0),
            5,
            0,
        );
        assert_eq!(placed, 0);
        assert_eq!(engine.particle_count(), 0);

        engine.set_viewport(Viewport {
            zoom: 0.0,
            ..Viewport::default()
        });
        let placed = engine.place_in_region(
            PlacementShape::Square,
            Vec2::new(f64::NAN, 0.2),
            Vec2::new(0.4, 0.4),
            5,
            0,
        );
        assert_eq!(placed, 0);
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_paused_engine_accepts_edits() {
        let mut engine = seeded(3);
        engine.generate_random(100);
        engine.pause();
        let before: Vec<Vec2> = (0..100).map(|i| engine.position(i)).collect();
        assert!(!engine.tick());
        let after: Vec<Vec2> = (0..100).map(|i| engine.position(i)).collect();
        assert_eq!(before, after);

        engine.set_matrix_value(0, 1, 0.9);
        engine.set_boundary_mode(BoundaryMode::Closed);
        assert_eq!(engine.matrix().get(0, 1), 0.9);
        assert_eq!(engine.boundary_mode(), BoundaryMode::Closed);

        assert_eq!(engine.toggle_pause(), RunState::Running);
        assert!(engine.tick());
    }

    #[test]
    fn test_randomize_everything_ranges() {
        let mut engine = seeded(4);
        for _ in 0..5 {
            engine.randomize_everything();
            let n = engine.particle_count();
            assert!((1_000..5_000).contains(&n), "count {n}");

            let used = engine
                .species_histogram()
                .iter()
                .filter(|&&c| c > 0)
                .count();
            assert!(used <= 6);
            assert!(used >= 3, "only {used} species in use");

            for i in 0..n {
                let v = engine.velocity(i);
                assert!(v.x.abs() <= 0.005 && v.y.abs() <= 0.005);
            }
        }
    }

    #[test]
    fn test_randomize_everything_with_two_species_uses_both() {
        let mut config = SimConfig::default();
        config.world.seed = Some(5);
        config.world.species_count = 2;
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.randomize_everything();
        assert!(engine.species_histogram().iter().all(|&c| c > 0));
    }

    #[test]
    fn test_place_truncates_at_capacity() {
        let mut config = SimConfig::default();
        config.world.seed = Some(6);
        config.world.max_particles = 50;
        config.world.initial_particles = 40;
        let mut engine = SimulationEngine::new(config).unwrap();
        let placed = engine.place_in_region(
            PlacementShape::Square,
            Vec2::new(0.1, 0.1),
            Vec2::new(0.2, 0.2),
            25,
            1,
        );
        assert_eq!(placed, 10);
        assert_eq!(engine.particle_count(), 50);
        assert!(engine.species_slice()[40..].iter().all(|&s| s == 1));
    }

    #[test]
    fn test_place_in_shape_uses_screen_coordinates() {
        let mut engine = seeded(7);
        engine.set_viewport(Viewport::new(1000.0, 500.0));
        engine.place_in_shape(
            PlacementShape::Line,
            Vec2::new(100.0, 250.0),
            Vec2::new(900.0, 250.0),
            20,
            0,
        );
        for i in 0..20 {
            let p = engine.position(i);
            assert!((p.y - 0.5).abs() < 1e-12);
            assert!(p.x >= 0.1 - 1e-12 && p.x <= 0.9 + 1e-12);
            assert_eq!(engine.velocity(i), Vec2::ZERO);
        }
    }

    #[test]
    fn test_place_confines_to_closed_domain() {
        let mut engine = seeded(8);
        engine.set_boundary_mode(BoundaryMode::Closed);
        engine.place_in_region(
            PlacementShape::Circle,
            Vec2::new(-0.2, -0.2),
            Vec2::new(0.2, 0.2),
            200,
            0,
        );
        for i in 0..engine.particle_count() {
            let p = engine.position(i);
            assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_place_rejects_unknown_species() {
        let mut engine = seeded(9);
        engine.place_in_region(PlacementShape::Circle, Vec2::ZERO, Vec2::ZERO, 1, 6);
    }

    #[test]
    fn test_try_set_matrix_value_reports_species() {
        let mut engine = seeded(10);
        assert!(matches!(
            engine.try_set_matrix_value(6, 0, 0.1),
            Err(SimError::SpeciesOutOfRange { species: 6, .. })
        ));
        assert_eq!(engine.try_set_matrix_value(1, 2, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = seeded(11);
        engine.generate_random(30);
        engine.tick();
        let snap = engine.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.particles.len(), 30);
        assert_eq!(snap.matrix, *engine.matrix());
        assert_eq!(snap.particles[3], engine.particle(3));
    }

    #[test]
    fn test_reseed_repeats_generation() {
        let mut engine = seeded(12);
        engine.reseed(99);
        engine.generate_random(64);
        let first: Vec<Particle> = engine.store().iter().collect();
        engine.reseed(99);
        engine.generate_random(64);
        let second: Vec<Particle> = engine.store().iter().collect();
        assert_eq!(first, second);
    }
}
