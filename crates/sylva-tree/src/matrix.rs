//! Dense row-major observation matrix.

use std::ops::Index;

use crate::error::TreeError;

/// Dense matrix of observations stored as one row-major flat vector.
///
/// Row `r` is an observation, column `c` is a feature. The matrix is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct F64Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl F64Matrix {
    /// Create a matrix from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::MatrixShapeMismatch`] if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, TreeError> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(TreeError::MatrixShapeMismatch {
                rows,
                cols,
                expected,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix by copying a slice of equally long rows.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RaggedRows`] if any row differs in length from the first.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, TreeError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(TreeError::RaggedRows {
                    expected: cols,
                    got: row.len(),
                    row: i,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Return the number of observations.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of features.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return true if the matrix holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the value at row `row`, column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols`.
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        assert!(col < self.cols, "column index {col} out of bounds for {} columns", self.cols);
        self.data[row * self.cols + col]
    }

    /// Return observation `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate over all observations in row order.
    ///
    /// A matrix with rows but zero columns yields that many empty rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Copy feature `col` into a new vector, one entry per row.
    ///
    /// # Panics
    ///
    /// Panics if `col >= cols`.
    #[must_use]
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.at(r, col)).collect()
    }

    /// Return the raw row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize)> for F64Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(col < self.cols, "column index {col} out of bounds for {} columns", self.cols);
        &self.data[row * self.cols + col]
    }
}
