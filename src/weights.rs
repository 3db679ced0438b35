// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! Cost field construction from an input scalar field.
//!
//! Every strategy produces a field with the same dimensions as its input.
//! All strategies except [`WeightMap::Identity`] produce non-negative costs by
//! construction; `Identity` passes the input through untouched, so the caller
//! is responsible for keeping it non-negative.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::core::{check_shape, validate_seeds, GridData, Seed};
use crate::error::{FmmError, Result};
use crate::postprocess::normalize;

/// Strategy used to turn the input field into a cost field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightMap {
    /// The input field is the cost field.
    #[default]
    Identity,
    /// Sobel gradient magnitude.
    GradientMagnitude,
    /// Absolute difference from the mean input value at the seeds.
    AbsDiff,
    /// Absolute value of the 4-neighbour Laplacian.
    LaplacianMagnitude,
}

impl WeightMap {
    /// All strategies, in selector order.
    pub const ALL: [WeightMap; 4] = [
        WeightMap::Identity,
        WeightMap::GradientMagnitude,
        WeightMap::AbsDiff,
        WeightMap::LaplacianMagnitude,
    ];

    /// Look up a strategy by its numeric selector (0..=3).
    ///
    /// # Errors
    /// Returns [`FmmError::InvalidWeightMap`] for any other selector.
    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| WeightMap::ALL.get(i).copied())
            .ok_or_else(|| FmmError::InvalidWeightMap(index.to_string()))
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            WeightMap::Identity => "Identity",
            WeightMap::GradientMagnitude => "Gradient magnitude",
            WeightMap::AbsDiff => "AbsDiff",
            WeightMap::LaplacianMagnitude => "Laplacian",
        }
    }

    /// Build the cost field for `field`.
    ///
    /// `Identity` borrows the input; the other strategies allocate. `normalize`
    /// divides the gradient and Laplacian maps by their global maximum and is
    /// ignored by the other strategies. `seeds` are only read by `AbsDiff`.
    ///
    /// # Errors
    /// Returns an error if `field` reports a shape its values do not fill, or,
    /// for `AbsDiff`, if the seeds are empty or out of bounds.
    pub fn build<'a, G: GridData>(
        &self,
        field: &'a G,
        seeds: &[Seed],
        normalize: bool,
    ) -> Result<Cow<'a, [f64]>> {
        check_shape(field.rows(), field.cols(), field.values().len())?;
        Ok(match self {
            WeightMap::Identity => Cow::Borrowed(field.values()),
            WeightMap::GradientMagnitude => Cow::Owned(gradient_weights(field, normalize)),
            WeightMap::AbsDiff => Cow::Owned(difference_weights(field, seeds)?),
            WeightMap::LaplacianMagnitude => Cow::Owned(laplacian_weights(field, normalize)),
        })
    }
}

impl fmt::Display for WeightMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeightMap {
    type Err = FmmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(WeightMap::Identity),
            "gradient" | "gradient-magnitude" => Ok(WeightMap::GradientMagnitude),
            "absdiff" | "abs-diff" => Ok(WeightMap::AbsDiff),
            "laplacian" | "laplacian-magnitude" => Ok(WeightMap::LaplacianMagnitude),
            other => match other.parse::<i64>() {
                Ok(index) => WeightMap::from_index(index),
                Err(_) => Err(FmmError::InvalidWeightMap(s.to_string())),
            },
        }
    }
}

/// Value at (x + dx, y + dy), or 0 outside the grid.
#[inline]
fn sample<G: GridData>(field: &G, x: usize, y: usize, dx: isize, dy: isize) -> f64 {
    let xx = x as isize + dx;
    let yy = y as isize + dy;
    if xx < 0 || yy < 0 || xx >= field.cols() as isize || yy >= field.rows() as isize {
        return 0.0;
    }
    field.get(xx as usize, yy as usize)
}

/// Sobel gradient magnitude. Neighbours outside the grid contribute zero.
pub(crate) fn gradient_weights<G: GridData>(field: &G, normalize_output: bool) -> Vec<f64> {
    let mut out = Vec::with_capacity(field.num_cells());
    for y in 0..field.rows() {
        for x in 0..field.cols() {
            let s = |dx, dy| sample(field, x, y, dx, dy);
            let gx = (s(1, -1) + 2.0 * s(1, 0) + s(1, 1)) - (s(-1, -1) + 2.0 * s(-1, 0) + s(-1, 1));
            let gy = (s(-1, 1) + 2.0 * s(0, 1) + s(1, 1)) - (s(-1, -1) + 2.0 * s(0, -1) + s(1, -1));
            out.push((gx * gx + gy * gy).sqrt());
        }
    }
    if normalize_output {
        normalize(&mut out);
    }
    out
}

/// Absolute difference from the mean input value at the seed cells.
///
/// # Errors
/// Returns an error if `seeds` is empty or any seed lies outside the grid.
pub fn difference_weights<G: GridData>(field: &G, seeds: &[Seed]) -> Result<Vec<f64>> {
    validate_seeds(seeds, field.rows(), field.cols())?;
    let reference =
        seeds.iter().map(|s| field.get(s.x, s.y)).sum::<f64>() / seeds.len() as f64;
    Ok(field.values().iter().map(|&v| (v - reference).abs()).collect())
}

/// Absolute 4-neighbour Laplacian.
///
/// The centre weight is always -4 and neighbours outside the grid contribute
/// zero, so border cells see the centre value weighted more heavily.
pub(crate) fn laplacian_weights<G: GridData>(field: &G, normalize_output: bool) -> Vec<f64> {
    let rows = field.rows();
    let cols = field.cols();
    let values = field.values();
    let mut out = Vec::with_capacity(values.len());
    for y in 0..rows {
        for x in 0..cols {
            let id = x + y * cols;
            let mut lap = -4.0 * values[id];
            if y > 0 {
                lap += values[id - cols];
            }
            if y + 1 < rows {
                lap += values[id + cols];
            }
            if x > 0 {
                lap += values[id - 1];
            }
            if x + 1 < cols {
                lap += values[id + 1];
            }
            out.push(lap.abs());
        }
    }
    if normalize_output {
        normalize(&mut out);
    }
    out
}
