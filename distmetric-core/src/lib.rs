//! Distmetric core library.
//!
//! Builds a reusable distance metric from a table of multivariate points: the
//! data is linearly pre-transformed so that ordinary Euclidean distance
//! between any two transformed rows equals a generalized (weighted,
//! normalized) Euclidean or Mahalanobis distance between the original rows.
//! Downstream pairwise-distance or nearest-neighbour engines consume the
//! transformed rows directly; no pairwise matrix is computed or stored here.
//!
//! Construction runs in two stages. Coercion ([`MatrixSpec::resolve`]) turns
//! the heterogeneous `normalize` and `weights` arguments (absent, preset,
//! vector, or matrix) into concrete square matrices. The constructor
//! ([`DistanceMetric::build`]) inverts and Cholesky-factors the normalization
//! matrix, factors the weights matrix, and right-multiplies the data by the
//! factors, normalization first. Both stages are pure and synchronous; each
//! call is independent, so concurrent constructions need no coordination.
//!
//! # Examples
//! ```
//! use distmetric_core::{MetricBuilder, RawMatrix};
//!
//! let data = RawMatrix::from_rows(&[
//!     vec![1.0, 10.0],
//!     vec![2.0, 9.0],
//!     vec![3.0, 8.0],
//! ])?;
//! let metric = MetricBuilder::new().with_weights(vec![2.0, 1.0]).build(data)?;
//!
//! let difference = metric.transformed().row(0) - metric.transformed().row(1);
//! let distance = difference.norm();
//! assert!((distance - 3.0_f64.sqrt()).abs() < 1e-12);
//! # Ok::<(), distmetric_core::MetricError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod coerce;
mod data;
mod error;
mod metric;

pub use crate::{
    builder::MetricBuilder,
    coerce::{MatrixSpec, NORMALIZE_KEYWORDS, NormalizePreset, SYMMETRY_TOLERANCE, WEIGHT_KEYWORDS},
    data::RawMatrix,
    error::{ArgName, MetricError, MetricErrorCode, Result},
    metric::DistanceMetric,
};
