//! Structure-of-arrays particle storage.

use particle_life_data::{Particle, Vec2};
use rand::Rng;

/// Parallel arrays of particle state with a fixed capacity.
///
/// Slots `0..len()` are live. Particles have no identity beyond their slot:
/// nothing is ever removed individually, and [`clear`](Self::clear) simply
/// resets the live count so later writes reuse the storage.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    capacity: usize,
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
    pub(crate) vxs: Vec<f64>,
    pub(crate) vys: Vec<f64>,
    pub(crate) species: Vec<usize>,
}

impl ParticleStore {
    pub fn new(capacity: usize) -> Self {
        let reserve = capacity.min(1 << 16);
        Self {
            capacity,
            xs: Vec::with_capacity(reserve),
            ys: Vec::with_capacity(reserve),
            vxs: Vec::with_capacity(reserve),
            vys: Vec::with_capacity(reserve),
            species: Vec::with_capacity(reserve),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.len())
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.vxs.clear();
        self.vys.clear();
        self.species.clear();
    }

    /// Appends one particle. Returns `false` without writing when full.
    pub fn push(&mut self, position: Vec2, velocity: Vec2, species: usize) -> bool {
        if self.is_full() {
            return false;
        }
        self.xs.push(position.x);
        self.ys.push(position.y);
        self.vxs.push(velocity.x);
        self.vys.push(velocity.y);
        self.species.push(species);
        true
    }

    /// Replaces the population with up to `count` particles at uniform
    /// positions in `[0, 1)²`, at rest, with uniform species in
    /// `[0, species_count)`.
    ///
    /// Returns the number of particles written, `min(count, capacity)`.
    pub fn generate_random<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        species_count: usize,
        rng: &mut R,
    ) -> usize {
        self.clear();
        let target = count.min(self.capacity);
        for _ in 0..target {
            let species = rng.gen_range(0..species_count);
            let x = rng.gen::<f64>();
            let y = rng.gen::<f64>();
            self.push(Vec2::new(x, y), Vec2::ZERO, species);
        }
        target
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.xs[i], self.ys[i])
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.vxs[i], self.vys[i])
    }

    #[inline]
    pub fn species(&self, i: usize) -> usize {
        self.species[i]
    }

    pub fn particle(&self, i: usize) -> Particle {
        Particle {
            position: self.position(i),
            velocity: self.velocity(i),
            species: self.species[i],
        }
    }

    pub fn get(&self, i: usize) -> Option<Particle> {
        (i < self.len()).then(|| self.particle(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).map(move |i| self.particle(i))
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn species_slice(&self) -> &[usize] {
        &self.species
    }

    /// Live particle count per species, for legends and stats panels.
    pub fn species_histogram(&self, species_count: usize) -> Vec<usize> {
        let mut counts = vec![0; species_count];
        for &s in &self.species {
            if let Some(c) = counts.get_mut(s) {
                *c += 1;
            }
        }
        counts
    }
}
