// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use ndarray::{Array2, ArrayD, Ix2};

use crate::core::{Field, GridData};
use crate::error::{FmmError, Result};

/// Supported file formats for grid I/O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// NumPy .npy format.
    Npy,
}

/// Infer file format from extension.
pub fn infer_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("npy") => Ok(FileFormat::Npy),
        Some(ext) => Err(FmmError::UnsupportedFileFormat(ext.to_string())),
        None => Err(FmmError::UnsupportedFileFormat(
            "(no extension)".to_string(),
        )),
    }
}

/// Load a 2D field from a .npy file. `f32` data is promoted to `f64`.
pub fn load_npy_field(path: &Path) -> Result<Field> {
    // Try f64 first
    let arr: ArrayD<f64> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(_) => {
            // Try f32 and promote
            let arr32: ArrayD<f32> = ndarray_npy::read_npy(path)
                .map_err(|e| FmmError::UnsupportedDtype(format!("{}", e)))?;
            arr32.mapv(|v| v as f64)
        }
    };

    if arr.ndim() != 2 {
        return Err(FmmError::NotTwoDimensional(arr.shape().to_vec()));
    }
    let arr: Array2<f64> = arr
        .into_dimensionality::<Ix2>()
        .map_err(|e| FmmError::Other(format!("shape error: {}", e)))?;

    // Field::from_array walks in logical order, so Fortran-order files load correctly
    Field::from_array(arr)
}

/// Save a field to a .npy file as `f64`.
pub fn save_npy<G: GridData>(field: &G, path: &Path) -> Result<()> {
    let arr = Array2::from_shape_vec((field.rows(), field.cols()), field.values().to_vec())
        .map_err(|e| FmmError::Other(format!("shape error: {}", e)))?;

    ndarray_npy::write_npy(path, &arr)
        .map_err(|e| FmmError::Other(format!("npy write error: {}", e)))?;

    Ok(())
}

/// Load a field from a file, inferring format from extension.
pub fn load_field(path: &Path) -> Result<Field> {
    match infer_format(path)? {
        FileFormat::Npy => load_npy_field(path),
    }
}

/// Save a field to a file, inferring format from extension.
pub fn save_field<G: GridData>(field: &G, path: &Path) -> Result<()> {
    match infer_format(path)? {
        FileFormat::Npy => save_npy(field, path),
    }
}
