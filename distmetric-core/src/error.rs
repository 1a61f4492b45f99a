//! Error types for the distmetric core library.
//!
//! Defines the error enum exposed by the public API, stable machine-readable
//! error codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

/// Identifies which metric argument an error originated from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ArgName {
    /// The `normalize` argument.
    Normalize,
    /// The `weights` argument.
    Weights,
}

impl fmt::Display for ArgName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalize => f.write_str("normalize"),
            Self::Weights => f.write_str("weights"),
        }
    }
}

/// An error produced while validating data or constructing a
/// [`crate::DistanceMetric`].
///
/// Every variant is detected before any partial state exists; construction is
/// all-or-nothing and no error is silently downgraded to a default.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MetricError {
    /// The data matrix contained no rows.
    #[error("data contains no rows")]
    EmptyData,
    /// The data matrix had zero columns.
    #[error("data rows must have positive dimension")]
    ZeroDimension,
    /// A data entry was NaN or infinite.
    #[error("data entry at row {row}, column {col} is not finite: {value}")]
    NonFinite {
        /// Row index of the offending entry.
        row: usize,
        /// Column index of the offending entry.
        col: usize,
        /// The non-finite value encountered.
        value: f64,
    },
    /// A row slice had a different length than the first row.
    #[error("row {row} has length {got} but row 0 has length {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },
    /// A keyword did not match any recognized option for the argument.
    #[error("`{got}` is not a valid {arg} option; allowed: [{}]", allowed.join(", "))]
    InvalidOption {
        /// Argument the keyword was supplied for.
        arg: ArgName,
        /// The unrecognized keyword.
        got: String,
        /// The recognized keywords for this argument.
        allowed: &'static [&'static str],
    },
    /// A vector or matrix argument did not match the data's dimensionality.
    #[error("{arg} argument has shape {rows}x{cols} but data has {expected} columns")]
    DimensionMismatch {
        /// Argument with the mismatched shape.
        arg: ArgName,
        /// The data dimensionality the argument must match.
        expected: usize,
        /// Rows of the supplied argument (vector length for vectors).
        rows: usize,
        /// Columns of the supplied argument (1 for vectors).
        cols: usize,
    },
    /// A supplied matrix was not symmetric within tolerance.
    #[error("{arg} matrix is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ")]
    NotSymmetric {
        /// Argument holding the asymmetric matrix.
        arg: ArgName,
        /// Row of the first offending entry.
        row: usize,
        /// Column of the first offending entry.
        col: usize,
    },
    /// A covariance preset needs at least two data rows.
    #[error("{arg} preset requires at least 2 rows to estimate covariance (got {rows})")]
    InsufficientRows {
        /// Argument naming the preset.
        arg: ArgName,
        /// Number of rows available.
        rows: usize,
    },
    /// The normalization matrix could not be inverted.
    #[error("{arg} matrix is singular and cannot be inverted")]
    SingularMatrix {
        /// Argument holding the singular matrix.
        arg: ArgName,
    },
    /// Cholesky factorization failed on the (inverse) normalization matrix or
    /// the weights matrix.
    #[error("{arg} matrix is not positive semidefinite: Cholesky factorization failed")]
    NotPositiveSemidefinite {
        /// Argument holding the non-PSD matrix.
        arg: ArgName,
    },
    /// The identifier sequence length did not match the number of rows.
    #[error("{ids} identifiers were supplied for {rows} data rows")]
    IdCountMismatch {
        /// Number of identifiers supplied.
        ids: usize,
        /// Number of data rows.
        rows: usize,
    },
}

/// Stable codes describing [`MetricError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum MetricErrorCode {
    /// The data matrix contained no rows.
    EmptyData,
    /// The data matrix had zero columns.
    ZeroDimension,
    /// A data entry was NaN or infinite.
    NonFinite,
    /// A row slice had a different length than the first row.
    RaggedRows,
    /// A keyword did not match any recognized option.
    InvalidOption,
    /// An argument's shape did not match the data's dimensionality.
    DimensionMismatch,
    /// A supplied matrix was not symmetric within tolerance.
    NotSymmetric,
    /// A covariance preset needs at least two data rows.
    InsufficientRows,
    /// The normalization matrix could not be inverted.
    SingularMatrix,
    /// Cholesky factorization failed.
    NotPositiveSemidefinite,
    /// Identifier count did not match the row count.
    IdCountMismatch,
}

impl MetricErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyData => "METRIC_EMPTY_DATA",
            Self::ZeroDimension => "METRIC_ZERO_DIMENSION",
            Self::NonFinite => "METRIC_NON_FINITE",
            Self::RaggedRows => "METRIC_RAGGED_ROWS",
            Self::InvalidOption => "METRIC_INVALID_OPTION",
            Self::DimensionMismatch => "METRIC_DIMENSION_MISMATCH",
            Self::NotSymmetric => "METRIC_NOT_SYMMETRIC",
            Self::InsufficientRows => "METRIC_INSUFFICIENT_ROWS",
            Self::SingularMatrix => "METRIC_SINGULAR_MATRIX",
            Self::NotPositiveSemidefinite => "METRIC_NOT_POSITIVE_SEMIDEFINITE",
            Self::IdCountMismatch => "METRIC_ID_COUNT_MISMATCH",
        }
    }
}

impl fmt::Display for MetricErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MetricError {
    /// Retrieve the stable [`MetricErrorCode`] for this error.
    ///
    /// # Examples
    /// ```
    /// use distmetric_core::{MetricError, MetricErrorCode};
    ///
    /// let error = MetricError::EmptyData;
    /// assert_eq!(error.code(), MetricErrorCode::EmptyData);
    /// assert_eq!(error.code().as_str(), "METRIC_EMPTY_DATA");
    /// ```
    #[must_use]
    pub const fn code(&self) -> MetricErrorCode {
        match self {
            Self::EmptyData => MetricErrorCode::EmptyData,
            Self::ZeroDimension => MetricErrorCode::ZeroDimension,
            Self::NonFinite { .. } => MetricErrorCode::NonFinite,
            Self::RaggedRows { .. } => MetricErrorCode::RaggedRows,
            Self::InvalidOption { .. } => MetricErrorCode::InvalidOption,
            Self::DimensionMismatch { .. } => MetricErrorCode::DimensionMismatch,
            Self::NotSymmetric { .. } => MetricErrorCode::NotSymmetric,
            Self::InsufficientRows { .. } => MetricErrorCode::InsufficientRows,
            Self::SingularMatrix { .. } => MetricErrorCode::SingularMatrix,
            Self::NotPositiveSemidefinite { .. } => MetricErrorCode::NotPositiveSemidefinite,
            Self::IdCountMismatch { .. } => MetricErrorCode::IdCountMismatch,
        }
    }

    /// Returns the argument the error refers to, when it has one.
    #[must_use]
    pub const fn arg(&self) -> Option<ArgName> {
        match self {
            Self::InvalidOption { arg, .. }
            | Self::DimensionMismatch { arg, .. }
            | Self::NotSymmetric { arg, .. }
            | Self::InsufficientRows { arg, .. }
            | Self::SingularMatrix { arg }
            | Self::NotPositiveSemidefinite { arg } => Some(*arg),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, MetricError>;
