// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! A geodesic distance solver using the Fast Marching Method (FMM).
//!
//! This library computes cost-weighted distances from a set of seed cells to
//! every cell of a 2D grid by solving the eikonal equation |∇T| = c, where c
//! is a non-negative cost field derived from the input. Cells are finalized in
//! order of increasing distance from a min-priority queue, and the result can
//! be normalized to [0, 1] or thresholded into a segmentation mask.

#![warn(missing_docs)]

/// Grid buffers, seeds and per-cell marching state.
pub mod core;
/// Error types for the library.
pub mod error;
/// File I/O for loading input fields and saving results.
pub mod io;
/// Fast Marching propagation engine.
pub mod marching;
/// Normalization and thresholding of distance maps.
pub mod postprocess;
/// Configurable solver tying weights, marching and post-processing together.
pub mod solver;
/// Eikonal update kernel for 2D grids.
pub mod update_kernels;
/// Cost field strategies built from the input field.
pub mod weights;

pub use crate::core::{Field, FieldView, FieldViewMut, GridData, Seed};
pub use crate::error::{FmmError, Result};
pub use crate::marching::{FastMarcher, MarchStats, ProgressInfo};
pub use crate::solver::{fmm, FmmOptions, FmmSolver, SolveReport};
pub use crate::weights::WeightMap;
