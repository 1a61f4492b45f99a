//! Shared test utilities used across distmetric crates.

pub mod reference {
    //! Reference distance computations, written directly against the metric
    //! definitions rather than via the Cholesky pipeline, so integration and
    //! property tests have an independent oracle to compare against.

    use nalgebra::DMatrix;

    /// Plain Euclidean distance between two points.
    ///
    /// # Panics
    /// Panics when the slices have different lengths.
    ///
    /// # Examples
    /// ```
    /// use distmetric_test_support::reference::euclidean;
    ///
    /// let distance = euclidean(&[1.0, 10.0], &[2.0, 9.0]);
    /// assert!((distance - 2.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn euclidean(left: &[f64], right: &[f64]) -> f64 {
        weighted_euclidean(left, right, &vec![1.0; left.len()])
    }

    /// Weighted Euclidean distance: the square root of the weighted sum of
    /// squared coordinate differences.
    ///
    /// # Panics
    /// Panics when the slice lengths differ.
    ///
    /// # Examples
    /// ```
    /// use distmetric_test_support::reference::weighted_euclidean;
    ///
    /// let distance = weighted_euclidean(&[1.0, 10.0], &[2.0, 9.0], &[2.0, 1.0]);
    /// assert!((distance - 3.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn weighted_euclidean(left: &[f64], right: &[f64], weights: &[f64]) -> f64 {
        assert_eq!(left.len(), right.len(), "points must share a dimension");
        assert_eq!(left.len(), weights.len(), "weights must match the dimension");
        let mut sum = 0.0_f64;
        for ((&l, &r), &w) in left.iter().zip(right).zip(weights) {
            let diff = l - r;
            sum += w * diff * diff;
        }
        sum.sqrt()
    }

    /// Classical squared Mahalanobis distance under `covariance`, computed
    /// as the quadratic form `(x - y) C⁻¹ (x - y)ᵗ` via direct inversion.
    ///
    /// # Panics
    /// Panics when the covariance matrix is singular or the shapes are
    /// inconsistent; test fixtures are expected to be well formed.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::DMatrix;
    /// use distmetric_test_support::reference::mahalanobis_squared;
    ///
    /// let identity = DMatrix::identity(2, 2);
    /// let d2 = mahalanobis_squared(&[0.0, 0.0], &[3.0, 4.0], &identity);
    /// assert!((d2 - 25.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn mahalanobis_squared(left: &[f64], right: &[f64], covariance: &DMatrix<f64>) -> f64 {
        assert_eq!(left.len(), right.len(), "points must share a dimension");
        assert_eq!(covariance.nrows(), left.len(), "covariance must be d x d");
        let inverse = covariance
            .clone()
            .try_inverse()
            .expect("reference covariance must be invertible");
        let diff = nalgebra::RowDVector::from_iterator(
            left.len(),
            left.iter().zip(right).map(|(&l, &r)| l - r),
        );
        (&diff * inverse * diff.transpose())[(0, 0)]
    }

    /// Sample covariance of `rows` with the `n - 1` denominator, computed
    /// entry by entry.
    ///
    /// # Panics
    /// Panics on fewer than two rows or ragged input.
    #[must_use]
    pub fn sample_covariance(rows: &[Vec<f64>]) -> DMatrix<f64> {
        assert!(rows.len() >= 2, "covariance needs at least two rows");
        let n = rows.len();
        let d = rows[0].len();
        let mut means = vec![0.0_f64; d];
        for row in rows {
            assert_eq!(row.len(), d, "rows must share a dimension");
            for (mean, &value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n as f64;
        }
        let mut covariance = DMatrix::zeros(d, d);
        for row in rows {
            for i in 0..d {
                for j in 0..d {
                    covariance[(i, j)] += (row[i] - means[i]) * (row[j] - means[j]);
                }
            }
        }
        covariance / (n - 1) as f64
    }
}

pub mod fixtures {
    //! Canonical datasets and matrices shared by the test suites.

    use nalgebra::DMatrix;

    /// The ten-point, two-column dataset used throughout the concrete
    /// distance scenarios.
    ///
    /// # Examples
    /// ```
    /// use distmetric_test_support::fixtures::ten_points;
    ///
    /// assert_eq!(ten_points().len(), 10);
    /// ```
    #[must_use]
    pub fn ten_points() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 10.0],
            vec![2.0, 9.0],
            vec![3.0, 8.0],
            vec![4.0, 7.0],
            vec![5.0, 6.0],
            vec![6.0, 6.0],
            vec![7.0, 7.0],
            vec![8.0, 8.0],
            vec![9.0, 9.0],
            vec![10.0, 10.0],
        ]
    }

    /// A 2x2 matrix that is symmetric and positive definite.
    #[must_use]
    pub fn positive_definite_2x2() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 1.0])
    }

    /// A 2x2 symmetric matrix with a negative eigenvalue.
    #[must_use]
    pub fn negative_definite_2x2() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &[-2.0, 0.0, 0.0, -1.0])
    }

    /// A 2x2 matrix that is visibly asymmetric.
    #[must_use]
    pub fn asymmetric_2x2() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &[1.0, 0.7, 0.1, 1.0])
    }
}
