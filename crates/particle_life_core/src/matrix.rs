//! Per-species-pair interaction coefficients.

use crate::error::{Result, SimError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Square `M×M` table of force coefficients in `[-1, 1]`.
///
/// `get(i, j)` is the coefficient a particle of species `i` applies to its
/// sensed attraction toward species `j`. The table is not symmetric: species
/// 0 may chase species 1 while species 1 flees.
///
/// Indices outside `[0, M)` are caller bugs and panic. Callers forwarding
/// untrusted input use [`InteractionMatrix::try_set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl InteractionMatrix {
    pub const MIN_VALUE: f64 = -1.0;
    pub const MAX_VALUE: f64 = 1.0;

    /// All-zero matrix: no species feels anything beyond the short-range
    /// repulsion.
    pub fn new(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            size,
            cells: vec![Self::clamp_value(value); size * size],
        }
    }

    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut matrix = Self::new(size);
        for i in 0..size {
            for j in 0..size {
                matrix.set(i, j, f(i, j));
            }
        }
        matrix
    }

    /// Matrix with every cell drawn uniformly from `[-range, range)`.
    pub fn random<R: Rng + ?Sized>(size: usize, range: f64, rng: &mut R) -> Self {
        let mut matrix = Self::new(size);
        matrix.randomize(range, rng);
        matrix
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Overwrites every cell with a uniform value in `[-range, range)`.
    ///
    /// Cells are drawn in row-major order, so a seeded generator always
    /// yields the same table.
    pub fn randomize<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R) {
        let range = range.clamp(0.0, Self::MAX_VALUE);
        for cell in &mut self.cells {
            *cell = rng.gen::<f64>() * 2.0 * range - range;
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[self.index(i, j)]
    }

    /// Stores `value` clamped to `[-1, 1]`. NaN is stored as `0.0`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.index(i, j);
        self.cells[idx] = Self::clamp_value(value);
    }

    /// Checked variant of [`set`](Self::set); returns the stored value.
    pub fn try_set(&mut self, i: usize, j: usize, value: f64) -> Result<f64> {
        for species in [i, j] {
            if species >= self.size {
                return Err(SimError::SpeciesOutOfRange {
                    species,
                    species_count: self.size,
                });
            }
        }
        self.set(i, j, value);
        Ok(self.get(i, j))
    }

    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.size, "species {i} out of range ({})", self.size);
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.size.max(1))
    }

    /// Row-major view of every coefficient.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size,
            "matrix index ({i}, {j}) out of range for {} species",
            self.size
        );
        i * self.size + j
    }

    #[inline]
    fn clamp_value(value: f64) -> f64 {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(Self::MIN_VALUE, Self::MAX_VALUE)
        }
    }
}
