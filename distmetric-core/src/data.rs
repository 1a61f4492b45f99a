//! Validated input data for metric construction.
//!
//! [`RawMatrix`] wraps an `n x d` matrix of finite `f64` values, with rows as
//! data points. Validation happens once at construction so the coercion and
//! factorization stages can assume well-formed input.

use nalgebra::DMatrix;

use crate::error::{MetricError, Result};

/// An `n x d` matrix of finite values; rows are data points.
///
/// # Examples
/// ```
/// use distmetric_core::RawMatrix;
///
/// let data = RawMatrix::from_rows(&[vec![1.0, 10.0], vec![2.0, 9.0]])?;
/// assert_eq!(data.len(), 2);
/// assert_eq!(data.dimension(), 2);
/// # Ok::<(), distmetric_core::MetricError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RawMatrix {
    values: DMatrix<f64>,
}

impl RawMatrix {
    /// Builds a matrix from row slices.
    ///
    /// # Errors
    ///
    /// - [`MetricError::EmptyData`] when `rows` is empty.
    /// - [`MetricError::ZeroDimension`] when the first row is empty.
    /// - [`MetricError::RaggedRows`] when a row's length differs from row 0.
    /// - [`MetricError::NonFinite`] when an entry is NaN or infinite.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(MetricError::EmptyData);
        };
        let dimension = first.len();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != dimension {
                return Err(MetricError::RaggedRows {
                    row: index,
                    expected: dimension,
                    got: row.len(),
                });
            }
        }
        let values = DMatrix::from_row_iterator(
            rows.len(),
            dimension,
            rows.iter().flat_map(|row| row.iter().copied()),
        );
        Self::from_matrix(values)
    }

    /// Builds a matrix from flat row-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::RaggedRows`] when `values.len()` is not
    /// `rows * cols`, plus any error from [`Self::from_matrix`].
    ///
    /// # Examples
    /// ```
    /// use distmetric_core::RawMatrix;
    ///
    /// let data = RawMatrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
    /// assert_eq!(data.dimension(), 3);
    /// # Ok::<(), distmetric_core::MetricError>(())
    /// ```
    pub fn from_row_major(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != rows * cols {
            let full_rows = if cols == 0 { 0 } else { values.len() / cols };
            return Err(MetricError::RaggedRows {
                row: full_rows.min(rows.saturating_sub(1)),
                expected: cols,
                got: values.len().saturating_sub(full_rows * cols),
            });
        }
        Self::from_matrix(DMatrix::from_row_iterator(rows, cols, values))
    }

    /// Validates and wraps an existing matrix.
    ///
    /// # Errors
    ///
    /// - [`MetricError::EmptyData`] when the matrix has no rows.
    /// - [`MetricError::ZeroDimension`] when the matrix has no columns.
    /// - [`MetricError::NonFinite`] when an entry is NaN or infinite.
    pub fn from_matrix(values: DMatrix<f64>) -> Result<Self> {
        if values.nrows() == 0 {
            return Err(MetricError::EmptyData);
        }
        if values.ncols() == 0 {
            return Err(MetricError::ZeroDimension);
        }
        for row in 0..values.nrows() {
            for col in 0..values.ncols() {
                let value = values[(row, col)];
                if !value.is_finite() {
                    return Err(MetricError::NonFinite { row, col, value });
                }
            }
        }
        Ok(Self { values })
    }

    /// Returns the number of data points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// Returns whether the matrix holds no points. Always `false` for a
    /// constructed instance; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Returns the dimensionality of each point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.values.ncols()
    }

    /// Returns the underlying matrix.
    #[must_use]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub(crate) fn into_matrix(self) -> DMatrix<f64> {
        self.values
    }
}
