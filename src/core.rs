// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use ndarray::Array2;

use crate::error::{FmmError, Result};

/// Read access to a row-major 2D scalar grid.
///
/// Cells are addressed by column `x` and row `y`; the flat index is
/// `x + y * cols`.
pub trait GridData {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn cols(&self) -> usize;

    /// The raw row-major values.
    fn values(&self) -> &[f64];

    /// Total number of cells.
    fn num_cells(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Value at column `x`, row `y`.
    fn get(&self, x: usize, y: usize) -> f64 {
        self.values()[self.xy_to_flat(x, y)]
    }

    /// Convert a (column, row) coordinate to a flat index.
    fn xy_to_flat(&self, x: usize, y: usize) -> usize {
        x + y * self.cols()
    }

    /// Convert a flat index to a (column, row) coordinate.
    fn flat_to_xy(&self, flat: usize) -> (usize, usize) {
        (flat % self.cols(), flat / self.cols())
    }

    /// Shape as `[rows, cols]`.
    fn shape(&self) -> [usize; 2] {
        [self.rows(), self.cols()]
    }
}

/// Check that a `rows x cols` grid is non-empty and backed by exactly `len` values.
pub(crate) fn check_shape(rows: usize, cols: usize, len: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(FmmError::InvalidGridShape { rows, cols });
    }
    if len != rows * cols {
        return Err(FmmError::ShapeMismatch {
            expected: vec![rows, cols],
            got: vec![len],
        });
    }
    Ok(())
}

/// An owned rows x cols grid of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Field {
    /// Create a field from row-major data.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        check_shape(rows, cols, data.len())?;
        Ok(Field { rows, cols, data })
    }

    /// Create a field with every cell set to `value`.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        Field::new(rows, cols, vec![value; rows * cols])
    }

    /// Create a field from a `[rows, cols]` array.
    ///
    /// # Errors
    /// Returns an error if the array has a zero-length axis.
    pub fn from_array(array: Array2<f64>) -> Result<Self> {
        let (rows, cols) = array.dim();
        // iter() walks in logical (row-major) order regardless of memory layout
        let data: Vec<f64> = array.iter().copied().collect();
        Field::new(rows, cols, data)
    }

    /// Convert into a `[rows, cols]` array.
    pub fn into_array(self) -> Result<Array2<f64>> {
        Array2::from_shape_vec((self.rows, self.cols), self.data)
            .map_err(|e| FmmError::Other(format!("shape error: {}", e)))
    }

    /// Borrow as a read-only view.
    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            rows: self.rows,
            cols: self.cols,
            data: &self.data,
        }
    }

    /// Borrow as a mutable view, e.g. to reuse this field as an output buffer.
    pub fn view_mut(&mut self) -> FieldViewMut<'_> {
        FieldViewMut {
            rows: self.rows,
            cols: self.cols,
            data: &mut self.data,
        }
    }

    /// Mutable access to the raw values.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the field and return its row-major values.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl GridData for Field {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn values(&self) -> &[f64] {
        &self.data
    }
}

/// A read-only view over caller-owned row-major memory.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    rows: usize,
    cols: usize,
    data: &'a [f64],
}

impl<'a> FieldView<'a> {
    /// Wrap a borrowed slice as a rows x cols grid.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: &'a [f64]) -> Result<Self> {
        check_shape(rows, cols, data.len())?;
        Ok(FieldView { rows, cols, data })
    }

    /// Copy the viewed values into an owned field.
    pub fn to_field(&self) -> Field {
        Field {
            rows: self.rows,
            cols: self.cols,
            data: self.data.to_vec(),
        }
    }
}

impl GridData for FieldView<'_> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn values(&self) -> &[f64] {
        self.data
    }
}

/// A mutable view over caller-owned row-major memory, used as an output buffer.
#[derive(Debug)]
pub struct FieldViewMut<'a> {
    rows: usize,
    cols: usize,
    data: &'a mut [f64],
}

impl<'a> FieldViewMut<'a> {
    /// Wrap a borrowed mutable slice as a rows x cols grid.
    ///
    /// # Errors
    /// Returns [`FmmError::OutputBufferTooSmall`] if the slice holds fewer than
    /// `rows * cols` values, or a shape error for any other mismatch.
    pub fn new(rows: usize, cols: usize, data: &'a mut [f64]) -> Result<Self> {
        if rows > 0 && cols > 0 && data.len() < rows * cols {
            return Err(FmmError::OutputBufferTooSmall {
                required: rows * cols,
                available: data.len(),
            });
        }
        check_shape(rows, cols, data.len())?;
        Ok(FieldViewMut { rows, cols, data })
    }

    /// Mutable access to the raw values.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut *self.data
    }
}

impl GridData for FieldViewMut<'_> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn values(&self) -> &[f64] {
        &*self.data
    }
}

/// A seed cell at column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Seed {
    /// Create a seed at column `x`, row `y`.
    pub fn new(x: usize, y: usize) -> Self {
        Seed { x, y }
    }
}

impl From<(usize, usize)> for Seed {
    fn from((x, y): (usize, usize)) -> Self {
        Seed { x, y }
    }
}

/// Check that the seed list is non-empty and every seed lies inside a
/// `rows x cols` grid.
pub fn validate_seeds(seeds: &[Seed], rows: usize, cols: usize) -> Result<()> {
    if seeds.is_empty() {
        return Err(FmmError::EmptySeeds);
    }
    for seed in seeds {
        if seed.x >= cols || seed.y >= rows {
            return Err(FmmError::SeedOutOfBounds {
                x: seed.x,
                y: seed.y,
                rows,
                cols,
            });
        }
    }
    Ok(())
}

/// Visitation state of a cell during marching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStatus {
    /// Never updated.
    #[default]
    Far,
    /// Has a tentative distance and at least one queue entry.
    Trial,
    /// Finalized; the distance is frozen.
    Known,
}

/// Per-cell distances and visitation state for one marching run.
///
/// Unreached cells hold no distance; `+inf` only appears when exporting.
#[derive(Debug, Clone)]
pub struct DistanceGrid {
    rows: usize,
    cols: usize,
    distance: Vec<Option<f64>>,
    status: Vec<CellStatus>,
}

impl DistanceGrid {
    /// Create a grid with every cell unreached and `Far`.
    pub fn new(rows: usize, cols: usize) -> Self {
        let num_cells = rows * cols;
        DistanceGrid {
            rows,
            cols,
            distance: vec![None; num_cells],
            status: vec![CellStatus::Far; num_cells],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.distance.len()
    }

    /// Distance at `id`, or `None` if the cell was never reached.
    pub fn distance(&self, id: usize) -> Option<f64> {
        self.distance[id]
    }

    /// Distance at `id` with unreached cells reported as `+inf`.
    #[inline]
    pub fn distance_or_inf(&self, id: usize) -> f64 {
        self.distance[id].unwrap_or(f64::INFINITY)
    }

    /// Store a tentative distance. Known cells are frozen.
    #[inline]
    pub fn set_distance(&mut self, id: usize, value: f64) {
        debug_assert!(self.status[id] != CellStatus::Known);
        self.distance[id] = Some(value);
    }

    /// Visitation state at `id`.
    #[inline]
    pub fn status(&self, id: usize) -> CellStatus {
        self.status[id]
    }

    /// Advance the state at `id`. Transitions never go backwards.
    #[inline]
    pub fn set_status(&mut self, id: usize, status: CellStatus) {
        debug_assert!(status as u8 >= self.status[id] as u8);
        self.status[id] = status;
    }

    /// Whether the cell at `id` has been finalized.
    #[inline]
    pub fn is_known(&self, id: usize) -> bool {
        self.status[id] == CellStatus::Known
    }

    /// Number of cells holding a distance.
    pub fn num_reached(&self) -> usize {
        self.distance.iter().filter(|d| d.is_some()).count()
    }

    /// Number of finalized cells.
    pub fn num_known(&self) -> usize {
        self.status
            .iter()
            .filter(|&&s| s == CellStatus::Known)
            .count()
    }

    /// Write distances into `out`, with unreached cells as `+inf`.
    pub fn write_into(&self, out: &mut [f64]) {
        for (dst, src) in out.iter_mut().zip(self.distance.iter()) {
            *dst = src.unwrap_or(f64::INFINITY);
        }
    }

    /// Export distances as an owned field, with unreached cells as `+inf`.
    pub fn to_field(&self) -> Field {
        let mut data = vec![f64::INFINITY; self.num_cells()];
        self.write_into(&mut data);
        Field {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_xy_roundtrip() {
        let field = Field::filled(7, 5, 1.0).unwrap();
        for flat in 0..35 {
            let (x, y) = field.flat_to_xy(flat);
            assert!(x < 5 && y < 7);
            assert_eq!(field.xy_to_flat(x, y), flat, "flat={} xy=({}, {})", flat, x, y);
        }
    }

    #[test]
    fn get_is_row_major() {
        let field = Field::new(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(field.get(2, 0), 2.0);
        assert_eq!(field.get(0, 1), 3.0);
        assert_eq!(field.shape(), [2, 3]);
    }

    #[test]
    fn array_roundtrip_preserves_layout() {
        let array = Array2::from_shape_fn((3, 4), |(r, c)| (r * 10 + c) as f64);
        let field = Field::from_array(array.clone()).unwrap();
        assert_eq!(field.get(3, 2), 23.0);
        assert_eq!(field.into_array().unwrap(), array);
    }

    #[test]
    fn array_from_fortran_layout() {
        let array = Array2::from_shape_fn((2, 3), |(r, c)| (r * 3 + c) as f64);
        let fortran = array.t().to_owned().reversed_axes();
        let field = Field::from_array(fortran).unwrap();
        assert_eq!(field.values(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn invalid_grid_shape() {
        let result = Field::new(0, 4, vec![]);
        assert!(matches!(
            result,
            Err(FmmError::InvalidGridShape { rows: 0, cols: 4 })
        ));
    }

    #[test]
    fn shape_mismatch() {
        let result = Field::new(4, 4, vec![1.0; 10]);
        assert!(matches!(result, Err(FmmError::ShapeMismatch { .. })));
        let data = [1.0; 10];
        assert!(matches!(
            FieldView::new(4, 4, &data),
            Err(FmmError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn output_view_too_small() {
        let mut data = vec![0.0; 8];
        let result = FieldViewMut::new(3, 3, &mut data);
        assert!(matches!(
            result,
            Err(FmmError::OutputBufferTooSmall {
                required: 9,
                available: 8
            })
        ));
    }

    #[test]
    fn output_view_writes_through() {
        let mut data = vec![0.0; 4];
        {
            let mut view = FieldViewMut::new(2, 2, &mut data).unwrap();
            view.values_mut()[3] = 7.0;
            assert_eq!(view.get(1, 1), 7.0);
        }
        assert_eq!(data[3], 7.0);
    }

    #[test]
    fn validate_seeds_rejects_empty_and_out_of_bounds() {
        assert!(matches!(validate_seeds(&[], 3, 3), Err(FmmError::EmptySeeds)));
        let result = validate_seeds(&[Seed::new(1, 1), Seed::new(3, 0)], 3, 3);
        assert!(matches!(
            result,
            Err(FmmError::SeedOutOfBounds { x: 3, y: 0, .. })
        ));
        assert!(validate_seeds(&[Seed::new(2, 2), Seed::new(2, 2)], 3, 3).is_ok());
    }

    #[test]
    fn distance_grid_exports_unreached_as_infinity() {
        let mut grid = DistanceGrid::new(2, 2);
        grid.set_distance(0, 0.0);
        grid.set_status(0, CellStatus::Trial);
        grid.set_distance(3, 2.5);
        assert_eq!(grid.num_reached(), 2);
        assert_eq!(grid.distance(1), None);
        assert!(grid.distance_or_inf(1).is_infinite());

        let field = grid.to_field();
        assert_eq!(field.values()[0], 0.0);
        assert!(field.values()[1].is_infinite());
        assert!(field.values()[2].is_infinite());
        assert_eq!(field.values()[3], 2.5);
    }

    #[test]
    fn status_lifecycle() {
        let mut grid = DistanceGrid::new(1, 3);
        assert_eq!(grid.status(1), CellStatus::Far);
        grid.set_status(1, CellStatus::Trial);
        assert_eq!(grid.status(1), CellStatus::Trial);
        grid.set_status(1, CellStatus::Known);
        assert!(grid.is_known(1));
        assert_eq!(grid.num_known(), 1);
    }
}
