// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use log::{debug, warn};

use crate::core::{check_shape, validate_seeds, Field, FieldViewMut, GridData, Seed};
use crate::error::{FmmError, Result};
use crate::marching::{FastMarcher, MarchStats, ProgressInfo, DEFAULT_PROGRESS_INTERVAL};
use crate::postprocess::{normalize, threshold};
use crate::weights::WeightMap;

/// Flat option set for one-shot solves. See [`fmm`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FmmOptions {
    /// Cost field strategy.
    pub weight_map: WeightMap,
    /// Binarization threshold; `f64::INFINITY` disables it.
    pub segmentation_threshold: f64,
    /// Scale distances into [0, 1] before thresholding.
    pub normalize_output: bool,
    /// Finalization budget; -1 is unlimited.
    pub max_visits: i64,
    /// Divide gradient and Laplacian cost maps by their maximum.
    pub normalize_weights: bool,
}

impl Default for FmmOptions {
    fn default() -> Self {
        FmmOptions {
            weight_map: WeightMap::Identity,
            segmentation_threshold: f64::INFINITY,
            normalize_output: true,
            max_visits: -1,
            normalize_weights: false,
        }
    }
}

/// Summary of one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Marching counters.
    pub stats: MarchStats,
    /// Number of cells that received a finite distance.
    pub reached: usize,
    /// Maximum raw distance used for normalization, if it was applied.
    pub normalized_by: Option<f64>,
}

/// Geodesic distance solver using the Fast Marching Method.
///
/// Builds a cost field from the input with the configured [`WeightMap`],
/// propagates distances from the seeds, then optionally normalizes and
/// thresholds the result. The output is either a distance map (unreached
/// cells are `+inf`) or a 0/1 mask when a segmentation threshold is set.
pub struct FmmSolver {
    weight_map: WeightMap,
    normalize_weights: bool,
    segmentation_threshold: Option<f64>,
    normalize_output: bool,
    max_visits: Option<u64>,
    progress_interval: u64,
    progress_callback: Option<Box<dyn Fn(ProgressInfo) + Send + Sync>>,
}

impl Default for FmmSolver {
    fn default() -> Self {
        FmmSolver::new()
    }
}

impl FmmSolver {
    /// Create a solver with the defaults: identity weights, no threshold,
    /// normalized output, unlimited visits.
    pub fn new() -> Self {
        FmmSolver {
            weight_map: WeightMap::Identity,
            normalize_weights: false,
            segmentation_threshold: None,
            normalize_output: true,
            max_visits: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress_callback: None,
        }
    }

    /// Create a solver from a flat option set.
    ///
    /// # Errors
    /// Returns an error if the threshold is NaN or negative infinity, or
    /// `max_visits` is below -1.
    pub fn from_options(options: &FmmOptions) -> Result<Self> {
        FmmSolver::new()
            .with_weight_map(options.weight_map)
            .with_normalize_weights(options.normalize_weights)
            .with_segmentation_threshold(options.segmentation_threshold)?
            .with_normalize_output(options.normalize_output)
            .with_max_visits(options.max_visits)
    }

    /// Set the cost field strategy (builder method). Default is `Identity`.
    pub fn with_weight_map(mut self, weight_map: WeightMap) -> Self {
        self.weight_map = weight_map;
        self
    }

    /// Normalize gradient and Laplacian cost maps by their maximum (builder method).
    /// Default is false.
    pub fn with_normalize_weights(mut self, normalize_weights: bool) -> Self {
        self.normalize_weights = normalize_weights;
        self
    }

    /// Set the segmentation threshold (builder method).
    ///
    /// A finite value prunes expansion beyond it and binarizes the output.
    /// `f64::INFINITY` disables both.
    ///
    /// # Errors
    /// Returns an error if `threshold` is NaN or negative infinity.
    pub fn with_segmentation_threshold(mut self, threshold: f64) -> Result<Self> {
        if threshold.is_nan() || threshold == f64::NEG_INFINITY {
            return Err(FmmError::InvalidThreshold(threshold));
        }
        self.segmentation_threshold = Some(threshold).filter(|t| t.is_finite());
        Ok(self)
    }

    /// Scale output distances into [0, 1] (builder method). Default is true.
    pub fn with_normalize_output(mut self, normalize_output: bool) -> Self {
        self.normalize_output = normalize_output;
        self
    }

    /// Set the finalization budget (builder method). -1 is unlimited.
    ///
    /// # Errors
    /// Returns an error for negative values other than -1.
    pub fn with_max_visits(mut self, max_visits: i64) -> Result<Self> {
        self.max_visits = match max_visits {
            -1 => None,
            n if n < 0 => return Err(FmmError::InvalidMaxVisits(n)),
            n => Some(n as u64),
        };
        Ok(self)
    }

    /// Set a progress callback invoked while marching (builder method).
    pub fn with_progress(mut self, callback: Box<dyn Fn(ProgressInfo) + Send + Sync>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Number of finalizations between progress callbacks (builder method).
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// The configured cost field strategy.
    pub fn weight_map(&self) -> WeightMap {
        self.weight_map
    }

    /// The configured segmentation threshold, if enabled.
    pub fn segmentation_threshold(&self) -> Option<f64> {
        self.segmentation_threshold
    }

    /// Whether output distances are normalized.
    pub fn normalize_output(&self) -> bool {
        self.normalize_output
    }

    /// The configured finalization budget, if limited.
    pub fn max_visits(&self) -> Option<u64> {
        self.max_visits
    }

    /// Solve into a newly allocated field with the same shape as `field`.
    ///
    /// # Errors
    /// Returns an error if `field` reports a shape its values do not fill, or
    /// if the seeds are empty or out of bounds.
    pub fn solve<G: GridData>(&self, field: &G, seeds: &[Seed]) -> Result<Field> {
        self.solve_with_report(field, seeds).map(|(out, _)| out)
    }

    /// Like [`FmmSolver::solve`], also returning the run summary.
    ///
    /// # Errors
    /// Returns an error if `field` reports a shape its values do not fill, or
    /// if the seeds are empty or out of bounds.
    pub fn solve_with_report<G: GridData>(
        &self,
        field: &G,
        seeds: &[Seed],
    ) -> Result<(Field, SolveReport)> {
        let mut out = Field::filled(field.rows(), field.cols(), f64::INFINITY)?;
        let report = self.run(field, seeds, out.values_mut())?;
        Ok((out, report))
    }

    /// Solve into a caller-supplied buffer of the same shape as `field`.
    ///
    /// # Errors
    /// Returns an error if the output buffer is smaller than or shaped
    /// differently from `field`, or if the seeds are empty or out of bounds.
    /// Nothing is written on error.
    pub fn solve_into<G: GridData>(
        &self,
        field: &G,
        seeds: &[Seed],
        out: &mut FieldViewMut<'_>,
    ) -> Result<SolveReport> {
        if out.num_cells() < field.num_cells() {
            return Err(FmmError::OutputBufferTooSmall {
                required: field.num_cells(),
                available: out.num_cells(),
            });
        }
        if out.shape() != field.shape() {
            return Err(FmmError::ShapeMismatch {
                expected: field.shape().to_vec(),
                got: out.shape().to_vec(),
            });
        }
        self.run(field, seeds, out.values_mut())
    }

    fn run<G: GridData>(&self, field: &G, seeds: &[Seed], out: &mut [f64]) -> Result<SolveReport> {
        let (rows, cols) = (field.rows(), field.cols());
        check_shape(rows, cols, field.values().len())?;
        validate_seeds(seeds, rows, cols)?;
        debug!(
            "fmm solve: {}x{} grid, {} seeds, weight map {}, threshold {:?}, max visits {:?}",
            rows,
            cols,
            seeds.len(),
            self.weight_map,
            self.segmentation_threshold,
            self.max_visits
        );

        let cost = self.weight_map.build(field, seeds, self.normalize_weights)?;
        if self.weight_map == WeightMap::Identity && cost.iter().any(|&c| c < 0.0) {
            warn!("identity weight map has negative costs; distances may be out of order");
        }

        let mut marcher = FastMarcher::new(&cost, rows, cols)?
            .with_threshold(self.segmentation_threshold)
            .with_max_visits(self.max_visits);
        if let Some(cb) = self.progress_callback.as_deref() {
            marcher = marcher.with_progress(cb, self.progress_interval);
        }
        let outcome = marcher.run(seeds)?;

        if outcome.stats.visits == 0 && outcome.stats.pruned_pops > 0 {
            warn!(
                "segmentation threshold {:?} pruned every seed",
                self.segmentation_threshold
            );
        }

        outcome.grid.write_into(out);
        let normalized_by = if self.normalize_output {
            normalize(out)
        } else {
            None
        };
        if let Some(t) = self.segmentation_threshold {
            threshold(out, t);
        }

        let report = SolveReport {
            stats: outcome.stats,
            reached: outcome.grid.num_reached(),
            normalized_by,
        };
        debug!("fmm solve done: {:?}", report);
        Ok(report)
    }
}

/// One-shot solve with a flat option set, allocating the output.
///
/// # Errors
/// Returns an error for invalid options or seeds.
pub fn fmm<G: GridData>(field: &G, seeds: &[Seed], options: &FmmOptions) -> Result<Field> {
    FmmSolver::from_options(options)?.solve(field, seeds)
}
