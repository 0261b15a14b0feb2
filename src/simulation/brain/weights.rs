//! Flat, dimension-tagged export format for network weights.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::simulation::error::LoadError;

/// Row-major matrix tagged with its shape.
///
/// Bias vectors are stored as single-column matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub cols: usize,
    /// `rows * cols` values, row by row.
    pub data: Vec<f32>,
}

impl Matrix {
    /// Flattens a 2D array.
    pub fn from_array2(array: &Array2<f32>) -> Self {
        Self {
            rows: array.nrows(),
            cols: array.ncols(),
            data: array.iter().copied().collect(),
        }
    }

    /// Flattens a vector into a single column.
    pub fn from_array1(array: &Array1<f32>) -> Self {
        Self {
            rows: array.len(),
            cols: 1,
            data: array.to_vec(),
        }
    }

    /// Rebuilds a 2D array after checking shape, length and finiteness.
    pub fn to_array2(
        &self,
        name: &'static str,
        expected: (usize, usize),
    ) -> Result<Array2<f32>, LoadError> {
        self.validate(name, expected)?;
        Array2::from_shape_vec(expected, self.data.clone()).map_err(|_| LoadError::DataLength {
            name,
            expected: expected.0 * expected.1,
            actual: self.data.len(),
        })
    }

    /// Rebuilds a column vector after checking shape, length and finiteness.
    pub fn to_array1(&self, name: &'static str, expected_len: usize) -> Result<Array1<f32>, LoadError> {
        self.validate(name, (expected_len, 1))?;
        Ok(Array1::from_vec(self.data.clone()))
    }

    fn validate(&self, name: &'static str, (rows, cols): (usize, usize)) -> Result<(), LoadError> {
        if self.rows != rows || self.cols != cols {
            return Err(LoadError::Dimension {
                name,
                expected_rows: rows,
                expected_cols: cols,
                actual_rows: self.rows,
                actual_cols: self.cols,
            });
        }
        if self.data.len() != rows * cols {
            return Err(LoadError::DataLength {
                name,
                expected: rows * cols,
                actual: self.data.len(),
            });
        }
        if self.data.iter().any(|v| !v.is_finite()) {
            return Err(LoadError::NonFinite { name });
        }
        Ok(())
    }
}

/// Serialized weights and biases of a two-layer network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkWeights {
    /// Input → hidden weights (`hidden` × `input`).
    pub weights_ih: Matrix,
    /// Hidden → output weights (`output` × `hidden`).
    pub weights_ho: Matrix,
    /// Hidden biases (`hidden` × 1).
    pub bias_h: Matrix,
    /// Output biases (`output` × 1).
    pub bias_o: Matrix,
}
