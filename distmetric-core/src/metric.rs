//! The distance metric object and its construction pipeline.
//!
//! [`DistanceMetric::build`] consumes validated data plus resolved
//! normalization and weights matrices, applies the whitening transform, and
//! assembles an immutable record. After construction, ordinary Euclidean
//! distance between any two transformed rows equals the generalized distance
//! between the corresponding original rows.

use nalgebra::{Cholesky, DMatrix};
use tracing::{debug, instrument};

use crate::{
    coerce::check_symmetric,
    data::RawMatrix,
    error::{ArgName, MetricError, Result},
};

/// An immutable pre-transformed representation of a dataset under a
/// generalized Euclidean or Mahalanobis metric.
///
/// The normalization and weights matrices are retained in their original,
/// untransformed space purely for introspection and reproducibility; the
/// transform itself is already baked into the stored rows.
///
/// # Examples
/// ```
/// use distmetric_core::{MetricBuilder, RawMatrix};
///
/// let data = RawMatrix::from_rows(&[vec![1.0, 10.0], vec![2.0, 9.0]])?;
/// let metric = MetricBuilder::new().build(data)?;
/// assert_eq!(metric.len(), 2);
/// assert_eq!(metric.dimension(), 2);
/// # Ok::<(), distmetric_core::MetricError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMetric {
    transformed: DMatrix<f64>,
    normalization: DMatrix<f64>,
    weights: DMatrix<f64>,
    ids: Option<Vec<String>>,
}

impl DistanceMetric {
    /// Factors the resolved matrices and applies the transform pipeline.
    ///
    /// Normalization is applied strictly before weighting: both matrices are
    /// defined relative to the original coordinate system, so swapping the
    /// order would produce a different, generally non-equivalent metric.
    /// When both matrices are identity the data passes through untouched;
    /// the result is numerically identical to applying identity transforms.
    ///
    /// # Errors
    ///
    /// - [`MetricError::DimensionMismatch`] when a matrix is not `d x d`.
    /// - [`MetricError::NotSymmetric`] when a matrix fails the symmetry
    ///   check; this guards direct callers that bypass coercion.
    /// - [`MetricError::IdCountMismatch`] when `ids` is present with a
    ///   length other than the row count.
    /// - [`MetricError::SingularMatrix`] when the normalization matrix
    ///   cannot be inverted.
    /// - [`MetricError::NotPositiveSemidefinite`] when Cholesky
    ///   factorization fails on the inverse normalization matrix or on the
    ///   weights matrix. This is the enforcement point for positive
    ///   semidefiniteness, deferred from coercion.
    #[instrument(
        skip(data, normalization, weights, ids),
        fields(rows = data.len(), dimension = data.dimension())
    )]
    pub fn build(
        data: RawMatrix,
        normalization: DMatrix<f64>,
        weights: DMatrix<f64>,
        ids: Option<Vec<String>>,
    ) -> Result<Self> {
        let rows = data.len();
        let dimension = data.dimension();
        validate_square(&normalization, dimension, ArgName::Normalize)?;
        validate_square(&weights, dimension, ArgName::Weights)?;
        if let Some(ids) = &ids {
            if ids.len() != rows {
                return Err(MetricError::IdCountMismatch {
                    ids: ids.len(),
                    rows,
                });
            }
        }

        let identity = DMatrix::identity(dimension, dimension);
        let mut transformed = data.into_matrix();

        if normalization == identity {
            debug!("normalization is identity; skipping whitening transform");
        } else {
            // N⁻¹ = L·Lᵗ, so x ↦ x·L turns (x−y)·N⁻¹·(x−y)ᵗ into the plain
            // squared Euclidean distance between transformed rows.
            let inverse = normalization
                .clone()
                .try_inverse()
                .ok_or(MetricError::SingularMatrix {
                    arg: ArgName::Normalize,
                })?;
            let factor =
                Cholesky::new(inverse).ok_or(MetricError::NotPositiveSemidefinite {
                    arg: ArgName::Normalize,
                })?;
            transformed = transformed * factor.l();
        }

        if weights == identity {
            debug!("weights are identity; skipping weighting transform");
        } else {
            // Weights scale distances up rather than down, so they are
            // factored directly without inversion.
            let factor = Cholesky::new(weights.clone()).ok_or(
                MetricError::NotPositiveSemidefinite {
                    arg: ArgName::Weights,
                },
            )?;
            transformed = transformed * factor.l();
        }

        Ok(Self {
            transformed,
            normalization,
            weights,
            ids,
        })
    }

    /// Returns the transformed `n x d` matrix; rows are points.
    #[must_use]
    pub fn transformed(&self) -> &DMatrix<f64> {
        &self.transformed
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transformed.nrows()
    }

    /// Returns whether the metric holds no points. Always `false` for a
    /// constructed instance; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformed.nrows() == 0
    }

    /// Returns the dimensionality of each point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.transformed.ncols()
    }

    /// Returns the point identifiers, when the caller supplied any.
    ///
    /// Identifiers are positional (same order as rows) and are not required
    /// to be unique.
    #[must_use]
    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    /// Returns the resolved normalization matrix, in original space.
    #[must_use]
    pub fn normalization(&self) -> &DMatrix<f64> {
        &self.normalization
    }

    /// Returns the resolved weights matrix, in original space.
    #[must_use]
    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }
}

fn validate_square(matrix: &DMatrix<f64>, dimension: usize, arg: ArgName) -> Result<()> {
    if matrix.nrows() != dimension || matrix.ncols() != dimension {
        return Err(MetricError::DimensionMismatch {
            arg,
            expected: dimension,
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }
    check_symmetric(matrix, arg)
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;

    fn two_points() -> RawMatrix {
        RawMatrix::from_rows(&[vec![1.0, 10.0], vec![2.0, 9.0]]).expect("fixture data is valid")
    }

    #[test]
    fn identity_transforms_pass_data_through_unchanged() {
        let data = two_points();
        let original = data.values().clone();
        let identity = DMatrix::identity(2, 2);
        let metric = DistanceMetric::build(data, identity.clone(), identity, None)
            .expect("identity build must succeed");
        assert_eq!(metric.transformed(), &original);
    }

    #[test]
    fn singular_normalization_is_rejected() {
        let data = two_points();
        let singular = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let identity = DMatrix::identity(2, 2);
        let error = DistanceMetric::build(data, singular, identity, None)
            .expect_err("singular matrix cannot be inverted");
        assert_eq!(
            error,
            MetricError::SingularMatrix {
                arg: ArgName::Normalize,
            }
        );
    }

    #[test]
    fn negative_definite_weights_are_rejected() {
        let data = two_points();
        let identity = DMatrix::identity(2, 2);
        let negative = DMatrix::from_row_slice(2, 2, &[-1.0, 0.0, 0.0, -1.0]);
        let error = DistanceMetric::build(data, identity, negative, None)
            .expect_err("negative definite weights must fail factorization");
        assert_eq!(
            error,
            MetricError::NotPositiveSemidefinite {
                arg: ArgName::Weights,
            }
        );
    }

    #[test]
    fn wrongly_sized_normalization_is_rejected() {
        let data = two_points();
        let wrong = DMatrix::identity(3, 3);
        let identity = DMatrix::identity(2, 2);
        let error = DistanceMetric::build(data, wrong, identity, None)
            .expect_err("3x3 matrix cannot normalize 2-column data");
        assert_eq!(
            error,
            MetricError::DimensionMismatch {
                arg: ArgName::Normalize,
                expected: 2,
                rows: 3,
                cols: 3,
            }
        );
    }

    #[test]
    fn id_count_must_match_row_count() {
        let data = two_points();
        let identity = DMatrix::identity(2, 2);
        let error = DistanceMetric::build(
            data,
            identity.clone(),
            identity,
            Some(vec!["a".to_owned()]),
        )
        .expect_err("one identifier for two rows");
        assert_eq!(error, MetricError::IdCountMismatch { ids: 1, rows: 2 });
    }
}
