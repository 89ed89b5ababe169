//! Force accumulation and the velocity/position update.
//!
//! A tick runs in two passes over a frozen snapshot:
//! 1. every particle's net force is computed from the positions as they stood
//!    when the tick began, into a private per-particle slot;
//! 2. velocities and positions are updated from those forces and the
//!    boundary policy is applied.
//!
//! Pass 1 only reads shared state, so it can run on the rayon pool. Each
//! slot's sum is taken in the order the spatial index yields candidates, so
//! parallel and sequential runs agree bit for bit.

use crate::config::PhysicsConfig;
use crate::force::ForceLaw;
use crate::matrix::InteractionMatrix;
use crate::particles::ParticleStore;
use crate::spatial_hash::SpatialHash;
use particle_life_data::{BoundaryMode, Vec2};
use rayon::prelude::*;

/// Per-tick outcome of [`Integrator::integrate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Axis clamps applied by a closed boundary.
    pub wall_hits: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    pub dt: f64,
    pub friction_factor: f64,
    pub r_max: f64,
    pub restitution: f64,
    pub parallel: bool,
    pub law: ForceLaw,
}

impl Default for Integrator {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl Integrator {
    pub fn from_config(physics: &PhysicsConfig) -> Self {
        Self {
            dt: physics.dt,
            friction_factor: physics.friction_factor(),
            r_max: physics.r_max,
            restitution: physics.closed_restitution,
            parallel: physics.parallel,
            law: ForceLaw::new(physics.beta),
        }
    }

    /// Net force on particle `i` from every indexed candidate.
    ///
    /// Under `Wrap` the displacement takes the minimum image on the unit
    /// torus before the x component is stretched by `aspect`, so the kernel
    /// is round on screen rather than in normalized space.
    #[inline]
    pub fn force_on(
        &self,
        i: usize,
        store: &ParticleStore,
        matrix: &InteractionMatrix,
        index: &SpatialHash,
        boundary: BoundaryMode,
        aspect: f64,
    ) -> Vec2 {
        let xi = store.xs[i];
        let yi = store.ys[i];
        let row = matrix.row(store.species[i]);
        let toroidal = boundary.is_toroidal();
        let (mut fx, mut fy) = (0.0, 0.0);

        index.query_entity(i, |j| {
            if j == i {
                return;
            }
            let mut rx = store.xs[j] - xi;
            let mut ry = store.ys[j] - yi;
            if toroidal {
                if rx > 0.5 {
                    rx -= 1.0;
                }
                if rx < -0.5 {
                    rx += 1.0;
                }
                if ry > 0.5 {
                    ry -= 1.0;
                }
                if ry < -0.5 {
                    ry += 1.0;
                }
            }

            let dx = rx * aspect;
            let dy = ry;
            let r = dx.hypot(dy);
            if r > 0.0 && r < self.r_max {
                let f = self.law.force(r / self.r_max, row[store.species[j]]);
                fx += dx / r * f;
                fy += dy / r * f;
            }
        });

        Vec2::new(fx, fy)
    }

    /// Fills `forces[i]` for every live particle.
    ///
    /// `index` must have been built from `store`'s current positions.
    pub fn accumulate_forces(
        &self,
        store: &ParticleStore,
        matrix: &InteractionMatrix,
        index: &SpatialHash,
        boundary: BoundaryMode,
        aspect: f64,
        forces: &mut Vec<Vec2>,
    ) {
        debug_assert_eq!(index.len(), store.len(), "stale spatial index");
        let n = store.len();
        if self.parallel {
            (0..n)
                .into_par_iter()
                .map(|i| self.force_on(i, store, matrix, index, boundary, aspect))
                .collect_into_vec(forces);
        } else {
            forces.clear();
            forces.extend(
                (0..n).map(|i| self.force_on(i, store, matrix, index, boundary, aspect)),
            );
        }
    }

    /// Applies friction and forces to velocities, moves every particle, then
    /// enforces `boundary`.
    ///
    /// The x force is divided by `aspect` so simulation-space speeds stay
    /// comparable on both axes after the screen-space distance stretch.
    pub fn integrate(
        &self,
        store: &mut ParticleStore,
        forces: &[Vec2],
        boundary: BoundaryMode,
        aspect: f64,
    ) -> StepStats {
        let mut stats = StepStats::default();
        let dt = self.dt;
        let ParticleStore {
            xs, ys, vxs, vys, ..
        } = store;

        for (i, force) in forces.iter().enumerate().take(xs.len()) {
            vxs[i] = vxs[i] * self.friction_factor + force.x * dt / aspect;
            vys[i] = vys[i] * self.friction_factor + force.y * dt;

            xs[i] += vxs[i] * dt;
            ys[i] += vys[i] * dt;

            match boundary {
                BoundaryMode::Wrap => {
                    xs[i] = wrap_unit(xs[i]);
                    ys[i] = wrap_unit(ys[i]);
                }
                BoundaryMode::Closed => {
                    stats.wall_hits += usize::from(self.reflect(&mut xs[i], &mut vxs[i]));
                    stats.wall_hits += usize::from(self.reflect(&mut ys[i], &mut vys[i]));
                }
                BoundaryMode::Infinite => {}
            }
        }
        stats
    }

    /// Clamps one axis to `[0, 1]`; a clamped axis reverses and loses speed.
    #[inline]
    fn reflect(&self, position: &mut f64, velocity: &mut f64) -> bool {
        if *position < 0.0 {
            *position = 0.0;
        } else if *position > 1.0 {
            *position = 1.0;
        } else {
            return false;
        }
        *velocity *= -self.restitution;
        true
    }
}

/// Folds a coordinate into `[0, 1)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `1.0`; adding
/// one and taking the remainder again cannot.
#[inline]
pub fn wrap_unit(v: f64) -> f64 {
    ((v % 1.0) + 1.0) % 1.0
}

/// Confines a freshly placed point to the domain of `boundary`.
#[inline]
pub fn confine(p: Vec2, boundary: BoundaryMode) -> Vec2 {
    match boundary {
        BoundaryMode::Wrap => Vec2::new(wrap_unit(p.x), wrap_unit(p.y)),
        BoundaryMode::Closed => Vec2::new(p.x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0)),
        BoundaryMode::Infinite => p,
    }
}
