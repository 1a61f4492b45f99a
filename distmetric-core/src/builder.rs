//! Builder for configuring and constructing [`DistanceMetric`] instances.
//!
//! The builder is the single inbound entry point: upstream collaborators turn
//! a tabular source into a [`RawMatrix`] plus an optional identifier
//! sequence, configure normalization and weighting here, and receive either a
//! fully constructed metric or a detailed error.

use crate::{
    Result,
    coerce::{MatrixSpec, NormalizePreset},
    data::RawMatrix,
    error::{ArgName, MetricError},
    metric::DistanceMetric,
};

/// Configures and constructs [`DistanceMetric`] instances.
///
/// # Examples
/// ```
/// use distmetric_core::{MetricBuilder, RawMatrix};
///
/// let data = RawMatrix::from_rows(&[
///     vec![1.0, 10.0],
///     vec![2.0, 9.0],
///     vec![3.0, 7.0],
/// ])?;
/// let metric = MetricBuilder::new()
///     .with_normalize_keyword("mahalanobize")?
///     .with_weights(vec![2.0, 1.0])
///     .build(data)?;
/// assert_eq!(metric.len(), 3);
/// # Ok::<(), distmetric_core::MetricError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MetricBuilder {
    normalize: MatrixSpec,
    weights: MatrixSpec,
    ids: Option<Vec<String>>,
}

impl MetricBuilder {
    /// Creates a builder with identity normalization and weights and no
    /// identifiers.
    ///
    /// # Examples
    /// ```
    /// use distmetric_core::{MatrixSpec, MetricBuilder};
    ///
    /// let builder = MetricBuilder::new();
    /// assert!(matches!(builder.normalize(), MatrixSpec::Identity));
    /// assert!(matches!(builder.weights(), MatrixSpec::Identity));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the normalization argument.
    ///
    /// # Examples
    /// ```
    /// use distmetric_core::{MatrixSpec, MetricBuilder, NormalizePreset};
    ///
    /// let builder = MetricBuilder::new().with_normalize(NormalizePreset::Studentize);
    /// assert!(matches!(builder.normalize(), MatrixSpec::Preset(_)));
    /// ```
    #[must_use]
    pub fn with_normalize(mut self, normalize: impl Into<MatrixSpec>) -> Self {
        self.normalize = normalize.into();
        self
    }

    /// Sets the normalization argument from a keyword string.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidOption`] when the keyword is not an
    /// unambiguous match for a recognized normalization preset.
    pub fn with_normalize_keyword(self, keyword: &str) -> Result<Self> {
        Ok(self.with_normalize(NormalizePreset::parse(keyword)?))
    }

    /// Returns the configured normalization argument.
    #[must_use]
    pub fn normalize(&self) -> &MatrixSpec {
        &self.normalize
    }

    /// Sets the weights argument.
    ///
    /// # Examples
    /// ```
    /// use distmetric_core::{MatrixSpec, MetricBuilder};
    ///
    /// let builder = MetricBuilder::new().with_weights(vec![2.0, 1.0]);
    /// assert!(matches!(builder.weights(), MatrixSpec::Diagonal(_)));
    /// ```
    #[must_use]
    pub fn with_weights(mut self, weights: impl Into<MatrixSpec>) -> Self {
        self.weights = weights.into();
        self
    }

    /// Sets the weights argument from a keyword string.
    ///
    /// Weights recognize no keywords, so this always fails; it exists so
    /// string-driven callers get the same diagnostic shape as for
    /// `normalize` instead of a type error.
    ///
    /// # Errors
    ///
    /// Always returns [`MetricError::InvalidOption`] naming the (empty)
    /// allowed set.
    pub fn with_weights_keyword(self, keyword: &str) -> Result<Self> {
        Err(MetricError::InvalidOption {
            arg: ArgName::Weights,
            got: keyword.to_owned(),
            allowed: crate::coerce::WEIGHT_KEYWORDS,
        })
    }

    /// Returns the configured weights argument.
    #[must_use]
    pub fn weights(&self) -> &MatrixSpec {
        &self.weights
    }

    /// Sets the point identifier sequence.
    ///
    /// Identifiers are positional and need not be unique; their count must
    /// match the data's row count at [`Self::build`] time.
    #[must_use]
    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Returns the configured identifiers, if any.
    #[must_use]
    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    /// Resolves both arguments against the data and constructs the metric.
    ///
    /// Construction is all-or-nothing: any failure surfaces before a metric
    /// exists, and no invalid argument is downgraded to a default.
    ///
    /// # Errors
    ///
    /// Returns any coercion error from [`MatrixSpec::resolve`] and any
    /// factorization error from [`DistanceMetric::build`].
    pub fn build(self, data: RawMatrix) -> Result<DistanceMetric> {
        let dimension = data.dimension();
        let normalization = self.normalize.resolve(dimension, &data, ArgName::Normalize)?;
        let weights = self.weights.resolve(dimension, &data, ArgName::Weights)?;
        DistanceMetric::build(data, normalization, weights, self.ids)
    }
}
