//! Uniform-grid spatial hash for cutoff-radius neighbor queries.
//!
//! Rebuilt from scratch every tick. Dense worlds use a counting-sort offset
//! array over the grid; worlds whose particles spread far apart fall back to
//! sorted runs keyed by occupied cell.

use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Integer cell coordinate `(floor(x / cell_size), floor(y / cell_size))`.
pub type CellCoord = (i64, i64);

/// Below this many particles the build stays on the calling thread.
const PARALLEL_BUILD_THRESHOLD: usize = 4096;

/// Dense grids may hold at most this many cells per particle before the
/// index switches to the sparse layout.
const DENSE_CELLS_PER_ENTITY: usize = 4;
const MIN_DENSE_CELLS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Offset array over the occupied bounding box (or the whole torus).
    #[default]
    Dense,
    /// Entities sorted by cell, with a map from cell to its run.
    Sparse,
}

/// Uniform bucket grid over simulation space, rebuilt from scratch every tick.
///
/// Cells have side `cell_size`, equal to the interaction cutoff, so every
/// particle within the cutoff of a query point lies in the 3×3 block of cells
/// around it. The block may also contain particles beyond the cutoff; the
/// force pass filters those by distance.
///
/// # Topologies
/// - Toroidal: cell coordinates are taken modulo `ceil(1 / cell_size)` on
///   both axes and neighbor lookups wrap the same way.
/// - Unbounded: cell coordinates are plain integers. The grid covers the
///   bounding box of occupied cells, so particles far outside `[0, 1]` are
///   indexed like any other.
///
/// # Layout
/// - Dense: the "offset array" pattern (like compressed sparse rows).
///   `cell_offsets[c]..cell_offsets[c + 1]` is the run of `entity_indices`
///   belonging to cell `c`. Built with a counting sort; buffers are reused
///   between ticks.
/// - Sparse: used when the bounding box would need more than
///   `max(4 · n, 4096)` cells, e.g. a few particles that drifted far apart
///   on the unbounded plane. Entities are sorted by `(cell, index)` and a
///   hash map stores each occupied cell's run.
///
/// Within a cell, entity indices are always ascending, so queries visit
/// candidates in the same order on every run.
///
/// # Examples
/// ```
/// use particle_life_core::spatial_hash::SpatialHash;
///
/// let xs = [0.05, 0.12, 0.95];
/// let ys = [0.05, 0.08, 0.05];
/// let mut index = SpatialHash::new(0.1);
/// index.build(&xs, &ys, true);
///
/// let mut nearby = Vec::new();
/// index.query_into(0.05, 0.05, &mut nearby);
/// nearby.sort_unstable();
/// // particle 2 is a neighbor through the wrapped edge
/// assert_eq!(nearby, vec![0, 1, 2]);
/// ```
#[derive(Clone, Default, Debug)]
pub struct SpatialHash {
    pub cell_size: f64,
    pub toroidal: bool,
    /// Cells per axis of the torus, `ceil(1 / cell_size)`.
    pub wrap_extent: i64,
    pub layout: Layout,
    pub origin: CellCoord,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
    pub entity_cells: Vec<CellCoord>,
    sparse_runs: HashMap<CellCoord, (usize, usize)>,
    cursor: Vec<usize>,
}

impl SpatialHash {
    /// Creates an empty index with square cells of side `cell_size`.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            wrap_extent: Self::extent_for(cell_size),
            ..Default::default()
        }
    }

    fn extent_for(cell_size: f64) -> i64 {
        ((1.0 / cell_size).ceil() as i64).max(1)
    }

    pub fn len(&self) -> usize {
        self.entity_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_cells.is_empty()
    }

    /// Cell containing `(x, y)` under the current topology.
    ///
    /// Infinite coordinates saturate to the extreme cells and NaN maps to
    /// cell 0; neither can overflow a neighbor lookup.
    #[inline]
    pub fn cell_coord(&self, x: f64, y: f64) -> CellCoord {
        let cx = (x / self.cell_size).floor() as i64;
        let cy = (y / self.cell_size).floor() as i64;
        if self.toroidal {
            (cx.rem_euclid(self.wrap_extent), cy.rem_euclid(self.wrap_extent))
        } else {
            (cx, cy)
        }
    }

    /// Rebuilds the index for particles `0..xs.len()`.
    pub fn build(&mut self, xs: &[f64], ys: &[f64], toroidal: bool) {
        debug_assert_eq!(xs.len(), ys.len());
        self.toroidal = toroidal;
        let count = xs.len().min(ys.len());

        self.entity_cells.clear();
        if count >= PARALLEL_BUILD_THRESHOLD {
            let this = &*self;
            let cells: Vec<CellCoord> = (0..count)
                .into_par_iter()
                .map(|i| this.cell_coord(xs[i], ys[i]))
                .collect();
            self.entity_cells = cells;
        } else {
            for i in 0..count {
                let cell = self.cell_coord(xs[i], ys[i]);
                self.entity_cells.push(cell);
            }
        }

        let (origin, cols, rows) = if toroidal {
            (
                (0, 0),
                self.wrap_extent as u128,
                self.wrap_extent as u128,
            )
        } else {
            self.occupied_bounds()
        };

        let dense_limit = (count * DENSE_CELLS_PER_ENTITY).max(MIN_DENSE_CELLS) as u128;
        if cols.saturating_mul(rows) <= dense_limit {
            self.layout = Layout::Dense;
            self.origin = origin;
            self.cols = cols as usize;
            self.rows = rows as usize;
            self.build_dense();
        } else {
            self.layout = Layout::Sparse;
            self.origin = origin;
            self.cols = 0;
            self.rows = 0;
            self.build_sparse();
        }
    }

    fn occupied_bounds(&self) -> (CellCoord, u128, u128) {
        let Some(&first) = self.entity_cells.first() else {
            return ((0, 0), 0, 0);
        };
        let (mut min, mut max) = (first, first);
        for &(cx, cy) in &self.entity_cells[1..] {
            min.0 = min.0.min(cx);
            min.1 = min.1.min(cy);
            max.0 = max.0.max(cx);
            max.1 = max.1.max(cy);
        }
        let cols = (i128::from(max.0) - i128::from(min.0) + 1) as u128;
        let rows = (i128::from(max.1) - i128::from(min.1) + 1) as u128;
        (min, cols, rows)
    }

    /// Flat cell index in the dense layout, `None` outside the grid.
    #[inline]
    fn dense_idx(&self, (cx, cy): CellCoord) -> Option<usize> {
        let dx = i128::from(cx) - i128::from(self.origin.0);
        let dy = i128::from(cy) - i128::from(self.origin.1);
        if dx < 0 || dy < 0 || dx >= self.cols as i128 || dy >= self.rows as i128 {
            None
        } else {
            Some(dy as usize * self.cols + dx as usize)
        }
    }

    fn build_dense(&mut self) {
        let cell_count = self.cols * self.rows;
        let entity_count = self.entity_cells.len();

        let counts: Vec<usize> = if entity_count >= PARALLEL_BUILD_THRESHOLD {
            let atomic_counts: Vec<AtomicUsize> =
                (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
            self.entity_cells.par_iter().for_each(|&cell| {
                if let Some(idx) = self.dense_idx(cell) {
                    atomic_counts[idx].fetch_add(1, AtomicOrdering::Relaxed);
                }
            });
            atomic_counts.into_iter().map(AtomicUsize::into_inner).collect()
        } else {
            let mut counts = vec![0; cell_count];
            for &cell in &self.entity_cells {
                if let Some(idx) = self.dense_idx(cell) {
                    counts[idx] += 1;
                }
            }
            counts
        };

        self.cell_offsets.clear();
        self.cell_offsets.reserve(cell_count + 1);
        let mut total = 0;
        for &count in &counts {
            self.cell_offsets.push(total);
            total += count;
        }
        self.cell_offsets.push(total);

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);

        // Sequential scatter keeps indices ascending inside each cell.
        self.cursor.clear();
        self.cursor.extend_from_slice(&self.cell_offsets[..cell_count]);
        for entity_idx in 0..entity_count {
            if let Some(cell_idx) = self.dense_idx(self.entity_cells[entity_idx]) {
                let write_idx = self.cursor[cell_idx];
                self.entity_indices[write_idx] = entity_idx;
                self.cursor[cell_idx] += 1;
            }
        }
        self.sparse_runs.clear();
    }

    fn build_sparse(&mut self) {
        let cells = &self.entity_cells;
        self.entity_indices.clear();
        self.entity_indices.extend(0..cells.len());
        self.entity_indices
            .sort_unstable_by_key(|&i| (cells[i], i));

        self.sparse_runs.clear();
        let mut start = 0;
        while start < self.entity_indices.len() {
            let cell = cells[self.entity_indices[start]];
            let mut end = start + 1;
            while end < self.entity_indices.len() && cells[self.entity_indices[end]] == cell {
                end += 1;
            }
            self.sparse_runs.insert(cell, (start, end));
            start = end;
        }
        self.cell_offsets.clear();
    }

    /// Entities stored in `cell`, ascending.
    #[inline]
    pub fn cell_entities(&self, cell: CellCoord) -> &[usize] {
        match self.layout {
            Layout::Dense => match self.dense_idx(cell) {
                Some(idx) => {
                    &self.entity_indices[self.cell_offsets[idx]..self.cell_offsets[idx + 1]]
                }
                None => &[],
            },
            Layout::Sparse => match self.sparse_runs.get(&cell) {
                Some(&(start, end)) => &self.entity_indices[start..end],
                None => &[],
            },
        }
    }

    /// Distinct neighbor coordinates along one axis.
    ///
    /// On a torus narrower than three cells, `c - 1` and `c + 1` fold onto
    /// the same cell; each one is reported once.
    #[inline]
    fn axis_neighbors(&self, c: i64) -> ([i64; 3], usize) {
        let mut out = [0; 3];
        let mut len = 0;
        for d in -1..=1 {
            let n = if self.toroidal {
                (c + d).rem_euclid(self.wrap_extent)
            } else {
                c.saturating_add(d)
            };
            if !out[..len].contains(&n) {
                out[len] = n;
                len += 1;
            }
        }
        (out, len)
    }

    /// Calls `callback` with every entity in the 3×3 block around `cell`.
    #[inline]
    pub fn for_each_in_block<F>(&self, (cx, cy): CellCoord, mut callback: F)
    where
        F: FnMut(usize),
    {
        let (xs, x_len) = self.axis_neighbors(cx);
        let (ys, y_len) = self.axis_neighbors(cy);
        for &ny in &ys[..y_len] {
            for &nx in &xs[..x_len] {
                for &entity_idx in self.cell_entities((nx, ny)) {
                    callback(entity_idx);
                }
            }
        }
    }

    /// Candidate neighbors of indexed entity `i`, including `i` itself.
    #[inline]
    pub fn query_entity<F>(&self, i: usize, callback: F)
    where
        F: FnMut(usize),
    {
        self.for_each_in_block(self.entity_cells[i], callback);
    }

    pub fn query_into(&self, x: f64, y: f64, result: &mut Vec<usize>) {
        result.clear();
        self.for_each_in_block(self.cell_coord(x, y), |idx| result.push(idx));
    }

    pub fn count_nearby(&self, x: f64, y: f64) -> usize {
        let mut count = 0;
        self.for_each_in_block(self.cell_coord(x, y), |_| count += 1);
        count
    }

    /// Number of distinct occupied cells.
    pub fn occupied_cells(&self) -> usize {
        match self.layout {
            Layout::Dense => self
                .cell_offsets
                .windows(2)
                .filter(|w| w[1] > w[0])
                .count(),
            Layout::Sparse => self.sparse_runs.len(),
        }
    }
}
