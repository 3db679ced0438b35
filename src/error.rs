// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during solver configuration, I/O, or execution.
#[derive(Debug)]
pub enum FmmError {
    /// Grid shape is invalid (a dimension is zero).
    InvalidGridShape {
        /// Number of rows provided.
        rows: usize,
        /// Number of columns provided.
        cols: usize,
    },
    /// Buffer shape does not match the expected shape.
    ShapeMismatch {
        /// The expected shape as `[rows, cols]` or element count.
        expected: Vec<usize>,
        /// The actual shape encountered.
        got: Vec<usize>,
    },
    /// Loaded array is not two-dimensional.
    NotTwoDimensional(Vec<usize>),
    /// Caller-supplied output buffer cannot hold the result.
    OutputBufferTooSmall {
        /// Number of cells required.
        required: usize,
        /// Number of cells available.
        available: usize,
    },
    /// No seeds were provided.
    EmptySeeds,
    /// A seed lies outside the grid.
    SeedOutOfBounds {
        /// Seed column.
        x: usize,
        /// Seed row.
        y: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
    /// Weight map selector does not name a known strategy.
    InvalidWeightMap(String),
    /// Segmentation threshold is NaN.
    InvalidThreshold(f64),
    /// Visit budget is negative and not the unlimited sentinel (-1).
    InvalidMaxVisits(i64),
    /// Unsupported data type in file.
    UnsupportedDtype(String),
    /// Unsupported file format (unrecognized extension).
    UnsupportedFileFormat(String),
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl fmt::Display for FmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FmmError::InvalidGridShape { rows, cols } => {
                write!(
                    f,
                    "invalid grid shape: {}x{} (rows and cols must be >= 1)",
                    rows, cols
                )
            }
            FmmError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {:?}, got {:?}", expected, got)
            }
            FmmError::NotTwoDimensional(shape) => {
                write!(f, "expected a 2D array, got shape {:?}", shape)
            }
            FmmError::OutputBufferTooSmall {
                required,
                available,
            } => {
                write!(
                    f,
                    "output buffer too small: {} cells required, {} available",
                    required, available
                )
            }
            FmmError::EmptySeeds => write!(f, "at least one seed is required"),
            FmmError::SeedOutOfBounds { x, y, rows, cols } => {
                write!(
                    f,
                    "seed ({}, {}) is outside the {}x{} grid",
                    x, y, rows, cols
                )
            }
            FmmError::InvalidWeightMap(sel) => {
                write!(
                    f,
                    "invalid weight map '{}': expected identity, gradient, absdiff or laplacian",
                    sel
                )
            }
            FmmError::InvalidThreshold(t) => {
                write!(f, "invalid segmentation threshold: {}", t)
            }
            FmmError::InvalidMaxVisits(n) => {
                write!(f, "invalid max visits: {} (must be >= 0, or -1 for unlimited)", n)
            }
            FmmError::UnsupportedDtype(dtype) => {
                write!(f, "unsupported dtype: {}", dtype)
            }
            FmmError::UnsupportedFileFormat(ext) => {
                write!(f, "unsupported file format: {}", ext)
            }
            FmmError::IoError(e) => write!(f, "I/O error: {}", e),
            FmmError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FmmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FmmError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FmmError {
    fn from(e: std::io::Error) -> Self {
        FmmError::IoError(e)
    }
}

/// Convenience type alias for Results with FmmError.
pub type Result<T> = std::result::Result<T, FmmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_grid_shape() {
        let e = FmmError::InvalidGridShape { rows: 0, cols: 4 };
        assert_eq!(
            e.to_string(),
            "invalid grid shape: 0x4 (rows and cols must be >= 1)"
        );
    }

    #[test]
    fn display_seed_out_of_bounds() {
        let e = FmmError::SeedOutOfBounds {
            x: 7,
            y: 1,
            rows: 5,
            cols: 5,
        };
        assert_eq!(e.to_string(), "seed (7, 1) is outside the 5x5 grid");
    }

    #[test]
    fn display_output_buffer_too_small() {
        let e = FmmError::OutputBufferTooSmall {
            required: 25,
            available: 16,
        };
        assert_eq!(
            e.to_string(),
            "output buffer too small: 25 cells required, 16 available"
        );
    }

    #[test]
    fn display_invalid_max_visits() {
        let e = FmmError::InvalidMaxVisits(-3);
        assert_eq!(
            e.to_string(),
            "invalid max visits: -3 (must be >= 0, or -1 for unlimited)"
        );
    }

    #[test]
    fn display_not_two_dimensional() {
        let e = FmmError::NotTwoDimensional(vec![2, 3, 4]);
        assert_eq!(e.to_string(), "expected a 2D array, got shape [2, 3, 4]");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = FmmError::IoError(io_err);
        assert!(e.to_string().contains("file not found"));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let e: FmmError = io_err.into();
        assert!(matches!(e, FmmError::IoError(_)));
    }
}
