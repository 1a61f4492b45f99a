//! Integration tests for the end-to-end metric construction pipeline.

use distmetric_core::{DistanceMetric, MetricBuilder, RawMatrix};
use distmetric_test_support::{fixtures, reference};
use nalgebra::DMatrix;
use rstest::rstest;

const TOLERANCE: f64 = 1e-9;

fn ten_point_matrix() -> RawMatrix {
    RawMatrix::from_rows(&fixtures::ten_points()).expect("fixture data is valid")
}

fn transformed_distance(metric: &DistanceMetric, i: usize, j: usize) -> f64 {
    (metric.transformed().row(i) - metric.transformed().row(j)).norm()
}

fn init_tracing() {
    drop(tracing_subscriber::fmt().with_test_writer().try_init());
}

#[test]
fn identity_metric_preserves_data_bitwise() {
    init_tracing();
    let data = ten_point_matrix();
    let original = data.values().clone();
    let metric = MetricBuilder::new().build(data).expect("identity build");
    assert_eq!(metric.transformed(), &original);
}

#[test]
fn identity_metric_matches_plain_euclidean_distances() {
    let rows = fixtures::ten_points();
    let metric = MetricBuilder::new()
        .build(ten_point_matrix())
        .expect("identity build");
    for i in 0..rows.len() {
        for j in 0..rows.len() {
            let expected = reference::euclidean(&rows[i], &rows[j]);
            let got = transformed_distance(&metric, i, j);
            assert!(
                (got - expected).abs() < TOLERANCE,
                "distance({i}, {j}): got {got}, expected {expected}"
            );
        }
    }
}

#[test]
fn first_pair_distance_is_sqrt_two_without_transforms() {
    let metric = MetricBuilder::new()
        .build(ten_point_matrix())
        .expect("identity build");
    let distance = transformed_distance(&metric, 0, 1);
    assert!((distance - 2.0_f64.sqrt()).abs() < TOLERANCE);
}

#[test]
fn diagonal_weights_scale_coordinate_differences() {
    let rows = fixtures::ten_points();
    let weights = vec![2.0, 1.0];
    let metric = MetricBuilder::new()
        .with_weights(weights.clone())
        .build(ten_point_matrix())
        .expect("weighted build");

    let first_pair = transformed_distance(&metric, 0, 1);
    assert!((first_pair - 3.0_f64.sqrt()).abs() < TOLERANCE);

    for i in 0..rows.len() {
        for j in 0..rows.len() {
            let expected = reference::weighted_euclidean(&rows[i], &rows[j], &weights);
            let got = transformed_distance(&metric, i, j);
            assert!(
                (got - expected).abs() < TOLERANCE,
                "distance({i}, {j}): got {got}, expected {expected}"
            );
        }
    }
}

#[test]
fn mahalanobize_matches_classical_mahalanobis_distance() {
    init_tracing();
    let rows = fixtures::ten_points();
    let covariance = reference::sample_covariance(&rows);
    let metric = MetricBuilder::new()
        .with_normalize_keyword("mahalanobize")
        .expect("keyword parses")
        .build(ten_point_matrix())
        .expect("mahalanobize build");

    for j in 1..rows.len() {
        let expected = reference::mahalanobis_squared(&rows[0], &rows[j], &covariance);
        let got = transformed_distance(&metric, 0, j).powi(2);
        assert!(
            (got - expected).abs() < TOLERANCE * expected.max(1.0),
            "squared distance(0, {j}): got {got}, expected {expected}"
        );
    }
}

#[test]
fn explicit_weight_matrix_agrees_with_equivalent_diagonal_vector() {
    let from_vector = MetricBuilder::new()
        .with_weights(vec![2.0, 1.0])
        .build(ten_point_matrix())
        .expect("vector weights build");
    let from_matrix = MetricBuilder::new()
        .with_weights(DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 1.0]))
        .build(ten_point_matrix())
        .expect("matrix weights build");
    assert!(
        (from_vector.transformed() - from_matrix.transformed()).abs().max() < TOLERANCE
    );
}

#[test]
fn normalization_is_applied_before_weighting() {
    let normalization = fixtures::positive_definite_2x2();
    let weights = vec![4.0, 1.0];

    let forward = MetricBuilder::new()
        .with_normalize(normalization.clone())
        .with_weights(weights.clone())
        .build(ten_point_matrix())
        .expect("normalize-then-weights build");

    // Compose the transforms in the opposite order by feeding the
    // weights-only output back in as data for a normalize-only build.
    let weighted_first = MetricBuilder::new()
        .with_weights(weights)
        .build(ten_point_matrix())
        .expect("weights-only build");
    let reversed_data =
        RawMatrix::from_matrix(weighted_first.transformed().clone()).expect("transformed data");
    let reversed = MetricBuilder::new()
        .with_normalize(normalization)
        .build(reversed_data)
        .expect("normalize-after-weights build");

    let forward_distance = transformed_distance(&forward, 0, 1);
    let reversed_distance = transformed_distance(&reversed, 0, 1);
    assert!(
        (forward_distance - reversed_distance).abs() > 1e-6,
        "non-commuting transforms must depend on order: both gave {forward_distance}"
    );
}

#[test]
fn combined_transforms_match_the_composed_quadratic_form() {
    // With normalization N and weights W, the squared transformed distance
    // is Δ·Ln·W'·Lnᵗ·Δᵗ where N⁻¹ = Ln·Lnᵗ; verify against an explicit
    // evaluation of the composed form for one pair.
    let rows = fixtures::ten_points();
    let normalization = fixtures::positive_definite_2x2();
    let weights = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 1.0]);
    let metric = MetricBuilder::new()
        .with_normalize(normalization.clone())
        .with_weights(weights.clone())
        .build(ten_point_matrix())
        .expect("combined build");

    let diff = nalgebra::RowDVector::from_vec(vec![rows[0][0] - rows[1][0], rows[0][1] - rows[1][1]]);
    let inverse = normalization.try_inverse().expect("fixture is invertible");
    let factor = nalgebra::Cholesky::new(inverse).expect("inverse is positive definite");
    let whitened = &diff * factor.l();
    let expected = (&whitened * &weights * whitened.transpose())[(0, 0)];
    let got = transformed_distance(&metric, 0, 1).powi(2);
    assert!((got - expected).abs() < TOLERANCE * expected.max(1.0));
}

#[rstest]
#[case::unique(vec!["a", "b", "c"])]
#[case::duplicates(vec!["a", "a", "a"])]
fn identifiers_are_stored_positionally_without_uniqueness(#[case] ids: Vec<&str>) {
    // Duplicate identifiers are deliberately permitted; positional order is
    // the only contract.
    let data = RawMatrix::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]).expect("valid data");
    let metric = MetricBuilder::new()
        .with_ids(ids.iter().map(|id| (*id).to_owned()).collect())
        .build(data)
        .expect("build with identifiers");
    let stored = metric.ids().expect("identifiers were supplied");
    assert_eq!(stored, ids.iter().map(|id| (*id).to_owned()).collect::<Vec<_>>());
}

#[test]
fn resolved_matrices_are_exposed_for_introspection() {
    let rows = fixtures::ten_points();
    let metric = MetricBuilder::new()
        .with_normalize_keyword("mahalanobis")
        .expect("alias parses")
        .with_weights(vec![2.0, 1.0])
        .build(ten_point_matrix())
        .expect("build");

    let covariance = reference::sample_covariance(&rows);
    assert!((metric.normalization() - &covariance).abs().max() < TOLERANCE);
    assert_eq!(
        metric.weights(),
        &DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 1.0])
    );
    assert_eq!(metric.len(), 10);
    assert_eq!(metric.dimension(), 2);
    assert!(metric.ids().is_none());
}
