// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use log::debug;

use crate::core::{validate_seeds, CellStatus, DistanceGrid, Seed};
use crate::error::{FmmError, Result};
use crate::update_kernels::update_cell;

/// Default number of finalizations between progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 4096;

/// Progress information passed to the optional callback.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInfo {
    /// Number of cells finalized so far.
    pub cells_finalized: u64,
    /// Current number of entries in the queue, stale ones included.
    pub queue_len: usize,
    /// Elapsed time since marching started.
    pub elapsed: Duration,
}

/// Counters collected during one marching run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarchStats {
    /// Cells finalized (moved to `Known`).
    pub visits: u64,
    /// Entries pushed onto the queue, seeds included.
    pub pushes: u64,
    /// Entries discarded because their cell was already `Known`.
    pub stale_pops: u64,
    /// Entries discarded because their cell lay beyond the threshold.
    pub pruned_pops: u64,
}

/// Result of a marching run.
#[derive(Debug, Clone)]
pub struct MarchOutcome {
    /// Final distances and cell states.
    pub grid: DistanceGrid,
    /// Run counters.
    pub stats: MarchStats,
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: usize,
    x: usize,
    dist: f64,
}

// Min-heap by distance; ties are left to the heap
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Fast Marching propagation over a fixed cost field.
///
/// Pops the closest `Trial` cell, freezes it as `Known` and re-evaluates its
/// four axis neighbours with the eikonal update. The queue keeps stale
/// entries; they are dropped when popped for a cell that is already `Known`.
pub struct FastMarcher<'a> {
    cost: &'a [f64],
    rows: usize,
    cols: usize,
    threshold: Option<f64>,
    max_visits: Option<u64>,
    progress_interval: u64,
    progress_callback: Option<&'a (dyn Fn(ProgressInfo) + 'a)>,
}

impl<'a> FastMarcher<'a> {
    /// Create a marcher over a row-major `rows x cols` cost field.
    ///
    /// Costs are expected to be non-negative; negative costs break the
    /// ordering guarantee but are not rejected.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or the cost length does not match.
    pub fn new(cost: &'a [f64], rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(FmmError::InvalidGridShape { rows, cols });
        }
        if cost.len() != rows * cols {
            return Err(FmmError::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![cost.len()],
            });
        }
        Ok(FastMarcher {
            cost,
            rows,
            cols,
            threshold: None,
            max_visits: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress_callback: None,
        })
    }

    /// Skip expanding cells whose distance exceeds `threshold` (builder method).
    /// Non-finite thresholds disable pruning.
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold.filter(|t| t.is_finite());
        self
    }

    /// Stop after finalizing `max_visits` cells (builder method). `None` is unlimited.
    pub fn with_max_visits(mut self, max_visits: Option<u64>) -> Self {
        self.max_visits = max_visits;
        self
    }

    /// Report progress every `interval` finalizations (builder method).
    pub fn with_progress(mut self, callback: &'a (dyn Fn(ProgressInfo) + 'a), interval: u64) -> Self {
        self.progress_callback = Some(callback);
        self.progress_interval = interval.max(1);
        self
    }

    /// Run marching from `seeds`.
    ///
    /// # Errors
    /// Returns an error if `seeds` is empty or any seed is out of bounds.
    pub fn run(&self, seeds: &[Seed]) -> Result<MarchOutcome> {
        self.run_with(seeds, |_, _| {})
    }

    /// Run marching from `seeds`, calling `on_finalize(id, distance)` each time
    /// a cell becomes `Known`, in finalization order.
    ///
    /// # Errors
    /// Returns an error if `seeds` is empty or any seed is out of bounds.
    pub fn run_with<F: FnMut(usize, f64)>(
        &self,
        seeds: &[Seed],
        mut on_finalize: F,
    ) -> Result<MarchOutcome> {
        validate_seeds(seeds, self.rows, self.cols)?;

        let num_cells = self.rows * self.cols;
        let cols = self.cols;
        let mut grid = DistanceGrid::new(self.rows, self.cols);
        let mut heap = BinaryHeap::with_capacity(seeds.len().max(64));
        let mut stats = MarchStats::default();
        let start_time = Instant::now();

        for seed in seeds {
            let id = seed.x + seed.y * cols;
            grid.set_distance(id, 0.0);
            grid.set_status(id, CellStatus::Trial);
            heap.push(QueueEntry {
                id,
                x: seed.x,
                dist: 0.0,
            });
            stats.pushes += 1;
        }

        let mut remaining = self.max_visits;
        while remaining != Some(0) {
            let Some(entry) = heap.pop() else {
                break;
            };

            if grid.is_known(entry.id) {
                stats.stale_pops += 1;
                continue;
            }
            let dist = grid.distance_or_inf(entry.id);
            if let Some(threshold) = self.threshold {
                if dist > threshold {
                    stats.pruned_pops += 1;
                    continue;
                }
            }

            grid.set_status(entry.id, CellStatus::Known);
            if let Some(r) = remaining.as_mut() {
                *r -= 1;
            }
            stats.visits += 1;
            on_finalize(entry.id, dist);

            if let Some(cb) = self.progress_callback {
                if stats.visits % self.progress_interval == 0 {
                    cb(ProgressInfo {
                        cells_finalized: stats.visits,
                        queue_len: heap.len(),
                        elapsed: start_time.elapsed(),
                    });
                }
            }

            let (id, x) = (entry.id, entry.x);
            if x > 0 {
                self.relax(&mut grid, &mut heap, &mut stats, id - 1, x - 1);
            }
            if x + 1 < cols {
                self.relax(&mut grid, &mut heap, &mut stats, id + 1, x + 1);
            }
            if id >= cols {
                self.relax(&mut grid, &mut heap, &mut stats, id - cols, x);
            }
            if id + cols < num_cells {
                self.relax(&mut grid, &mut heap, &mut stats, id + cols, x);
            }
        }

        debug!(
            "marching finished: visits={} pushes={} stale={} pruned={} queued={} in {:?}",
            stats.visits,
            stats.pushes,
            stats.stale_pops,
            stats.pruned_pops,
            heap.len(),
            start_time.elapsed()
        );

        Ok(MarchOutcome { grid, stats })
    }

    /// Re-evaluate cell `id` (column `x`) and enqueue it if its distance improved.
    #[inline]
    fn relax(
        &self,
        grid: &mut DistanceGrid,
        heap: &mut BinaryHeap<QueueEntry>,
        stats: &mut MarchStats,
        id: usize,
        x: usize,
    ) {
        if grid.is_known(id) {
            return;
        }
        let estimate = update_cell(grid, self.cost, id, x);
        if estimate < grid.distance_or_inf(id) {
            grid.set_distance(id, estimate);
            if grid.status(id) == CellStatus::Far {
                grid.set_status(id, CellStatus::Trial);
            }
            heap.push(QueueEntry {
                id,
                x,
                dist: estimate,
            });
            stats.pushes += 1;
        }
    }
}
