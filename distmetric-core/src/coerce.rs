//! Coercion of heterogeneous normalization and weighting inputs.
//!
//! Callers may supply nothing, a named preset, a diagonal vector, or an
//! explicit matrix for each of the `normalize` and `weights` arguments.
//! [`MatrixSpec`] captures those shapes as a sum type and
//! [`MatrixSpec::resolve`] turns one into a concrete `d x d` matrix or a
//! detailed error. Positive semidefiniteness is deliberately not checked
//! here; the Cholesky factorization in the metric constructor enforces it.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::{
    data::RawMatrix,
    error::{ArgName, MetricError, Result},
};

/// Relative tolerance for the symmetry check on explicit matrices.
///
/// Matrices that are symmetric in exact arithmetic, such as covariance
/// matrices computed in double precision, can carry round-off in their
/// off-diagonal pairs. Exact equality would spuriously reject them.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Recognized keywords for the `normalize` argument.
pub const NORMALIZE_KEYWORDS: &[&str] = &["none", "mahalanobize", "studentize"];

/// Recognized keywords for the `weights` argument. Weights take no presets.
pub const WEIGHT_KEYWORDS: &[&str] = &[];

/// Historical alias accepted for `"mahalanobize"`.
const MAHALANOBIS_ALIAS: &str = "mahalanobis";

/// Named normalization presets derived from the data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NormalizePreset {
    /// No normalization; resolves to the identity matrix.
    None,
    /// The sample covariance matrix of the data.
    Mahalanobize,
    /// The diagonal of the sample covariance matrix.
    Studentize,
}

impl NormalizePreset {
    /// Parses a normalization keyword.
    ///
    /// Matching is case-sensitive and accepts any unambiguous prefix of a
    /// recognized keyword; `"mahalanobis"` is accepted as a historical alias
    /// for `"mahalanobize"`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidOption`] when the keyword matches no
    /// recognized option, or is an ambiguous prefix of several.
    ///
    /// # Examples
    /// ```
    /// use distmetric_core::NormalizePreset;
    ///
    /// assert_eq!(NormalizePreset::parse("studentize")?, NormalizePreset::Studentize);
    /// assert_eq!(NormalizePreset::parse("mahal")?, NormalizePreset::Mahalanobize);
    /// assert!(NormalizePreset::parse("euclidean").is_err());
    /// # Ok::<(), distmetric_core::MetricError>(())
    /// ```
    pub fn parse(keyword: &str) -> Result<Self> {
        const CANDIDATES: &[(&str, NormalizePreset)] = &[
            ("none", NormalizePreset::None),
            ("mahalanobize", NormalizePreset::Mahalanobize),
            (MAHALANOBIS_ALIAS, NormalizePreset::Mahalanobize),
            ("studentize", NormalizePreset::Studentize),
        ];

        let mut matched: Option<Self> = None;
        if !keyword.is_empty() {
            for &(name, preset) in CANDIDATES {
                if !name.starts_with(keyword) {
                    continue;
                }
                match matched {
                    None => matched = Some(preset),
                    // The alias and its target resolve identically, so a
                    // prefix covering both is still unambiguous.
                    Some(previous) if previous == preset => {}
                    Some(_) => {
                        matched = None;
                        break;
                    }
                }
            }
        }
        matched.ok_or_else(|| MetricError::InvalidOption {
            arg: ArgName::Normalize,
            got: keyword.to_owned(),
            allowed: NORMALIZE_KEYWORDS,
        })
    }
}

/// A caller-supplied normalization or weighting argument, before coercion.
///
/// The dynamic string-or-vector-or-matrix dispatch of looser APIs becomes a
/// tagged variant here; an argument of the wrong type cannot be expressed.
///
/// # Examples
/// ```
/// use distmetric_core::MatrixSpec;
///
/// let absent = MatrixSpec::default();
/// assert!(matches!(absent, MatrixSpec::Identity));
///
/// let diagonal = MatrixSpec::from(vec![2.0, 1.0]);
/// assert!(matches!(diagonal, MatrixSpec::Diagonal(_)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum MatrixSpec {
    /// Absent input; resolves to the identity matrix.
    #[default]
    Identity,
    /// A named preset computed from the data.
    Preset(NormalizePreset),
    /// A vector expanded to a diagonal matrix.
    Diagonal(Vec<f64>),
    /// An explicit square matrix, used directly after validation.
    Explicit(DMatrix<f64>),
}

impl From<NormalizePreset> for MatrixSpec {
    fn from(preset: NormalizePreset) -> Self {
        Self::Preset(preset)
    }
}

impl From<Vec<f64>> for MatrixSpec {
    fn from(diagonal: Vec<f64>) -> Self {
        Self::Diagonal(diagonal)
    }
}

impl From<DMatrix<f64>> for MatrixSpec {
    fn from(matrix: DMatrix<f64>) -> Self {
        Self::Explicit(matrix)
    }
}

impl MatrixSpec {
    /// Resolves the argument into a concrete `dimension x dimension` matrix.
    ///
    /// `data` feeds the covariance presets; `arg` names the argument in any
    /// error. Weights accept no presets, so a [`MatrixSpec::Preset`] resolved
    /// for [`ArgName::Weights`] fails with [`MetricError::InvalidOption`].
    ///
    /// The returned matrix is not yet verified positive semidefinite; the
    /// factorization in [`crate::DistanceMetric::build`] enforces that.
    ///
    /// # Errors
    ///
    /// - [`MetricError::InvalidOption`] for a preset under `weights`.
    /// - [`MetricError::InsufficientRows`] for a covariance preset with
    ///   fewer than two data rows.
    /// - [`MetricError::DimensionMismatch`] for a vector or matrix whose
    ///   shape does not match `dimension`.
    /// - [`MetricError::NotSymmetric`] for an asymmetric explicit matrix.
    pub fn resolve(
        self,
        dimension: usize,
        data: &RawMatrix,
        arg: ArgName,
    ) -> Result<DMatrix<f64>> {
        match self {
            Self::Identity => Ok(DMatrix::identity(dimension, dimension)),
            Self::Preset(preset) => resolve_preset(preset, dimension, data, arg),
            Self::Diagonal(diagonal) => {
                if diagonal.len() != dimension {
                    return Err(MetricError::DimensionMismatch {
                        arg,
                        expected: dimension,
                        rows: diagonal.len(),
                        cols: 1,
                    });
                }
                Ok(DMatrix::from_diagonal(&DVector::from_vec(diagonal)))
            }
            Self::Explicit(matrix) => {
                if matrix.nrows() != dimension || matrix.ncols() != dimension {
                    return Err(MetricError::DimensionMismatch {
                        arg,
                        expected: dimension,
                        rows: matrix.nrows(),
                        cols: matrix.ncols(),
                    });
                }
                check_symmetric(&matrix, arg)?;
                Ok(matrix)
            }
        }
    }
}

fn resolve_preset(
    preset: NormalizePreset,
    dimension: usize,
    data: &RawMatrix,
    arg: ArgName,
) -> Result<DMatrix<f64>> {
    if arg == ArgName::Weights {
        return Err(MetricError::InvalidOption {
            arg,
            got: format!("{preset:?}"),
            allowed: WEIGHT_KEYWORDS,
        });
    }
    match preset {
        NormalizePreset::None => Ok(DMatrix::identity(dimension, dimension)),
        NormalizePreset::Mahalanobize => sample_covariance(data, arg),
        NormalizePreset::Studentize => {
            let covariance = sample_covariance(data, arg)?;
            Ok(DMatrix::from_diagonal(&covariance.diagonal()))
        }
    }
}

/// Sample covariance of the data rows, with the usual `n - 1` denominator.
fn sample_covariance(data: &RawMatrix, arg: ArgName) -> Result<DMatrix<f64>> {
    let values = data.values();
    let n = values.nrows();
    if n < 2 {
        return Err(MetricError::InsufficientRows { arg, rows: n });
    }
    let mean = values.row_mean();
    let mut centered = values.clone();
    for mut row in centered.row_iter_mut() {
        row -= &mean;
    }
    let denominator = (n - 1) as f64;
    let covariance = centered.transpose() * &centered / denominator;
    debug!(rows = n, dimension = values.ncols(), "computed sample covariance");
    Ok(covariance)
}

pub(crate) fn check_symmetric(matrix: &DMatrix<f64>, arg: ArgName) -> Result<()> {
    for row in 0..matrix.nrows() {
        for col in (row + 1)..matrix.ncols() {
            let upper = matrix[(row, col)];
            let lower = matrix[(col, row)];
            let scale = upper.abs().max(lower.abs()).max(1.0);
            if (upper - lower).abs() > SYMMETRY_TOLERANCE * scale {
                return Err(MetricError::NotSymmetric { arg, row, col });
            }
        }
    }
    Ok(())
}
