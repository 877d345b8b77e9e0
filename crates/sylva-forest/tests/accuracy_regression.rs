//! Accuracy regression tests for sylva-forest.
//!
//! These tests verify that algorithmic changes do not degrade forest
//! accuracy on deterministic synthetic datasets. Set `RUST_LOG=debug` to see
//! the training spans.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use sylva_forest::{
    ClassificationForestLearner, ForestConfig, ForestError, MaxFeatures, RegressionForestLearner,
};
use sylva_tree::{F64Matrix, SplitMethod, TreeError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Helpers: deterministic synthetic datasets
// ---------------------------------------------------------------------------

/// Generate a `n_samples` x 10, 5-class classification dataset.
///
/// Features 0-2 are informative (class * 3.0 + noise in [0, 0.5]).
/// Features 3-9 are pure noise in [0, 0.5].
/// Samples are assigned round-robin across classes.
fn make_classification(n_samples: usize, seed: u64) -> (F64Matrix, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_features = 10;
    let mut data = Vec::with_capacity(n_samples * n_features);
    let mut targets = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % 5;
        targets.push(class as f64);
        for f in 0..n_features {
            let base = if f < 3 { class as f64 * 3.0 } else { 0.0 };
            data.push(base + rng.r#gen::<f64>() * 0.5);
        }
    }
    (F64Matrix::new(n_samples, n_features, data).unwrap(), targets)
}

/// `y = 10 * x0 + noise in [0, 0.5]`; features 1-2 are pure noise.
fn make_regression(n_samples: usize, seed: u64) -> (F64Matrix, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n_samples * 3);
    let mut targets = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let x: f64 = rng.r#gen();
        data.extend([x, rng.r#gen(), rng.r#gen()]);
        targets.push(10.0 * x + rng.r#gen::<f64>() * 0.5);
    }
    (F64Matrix::new(n_samples, 3, data).unwrap(), targets)
}

/// Aptitude test score, previous experience in months, pass.
fn aptitude() -> (F64Matrix, Vec<f64>) {
    let rows = [
        [5.0, 6.0, 0.0], [1.0, 15.0, 0.0], [1.0, 12.0, 0.0], [4.0, 6.0, 0.0],
        [1.0, 15.0, 1.0], [1.0, 6.0, 0.0], [4.0, 16.0, 1.0], [1.0, 10.0, 1.0],
        [3.0, 12.0, 0.0], [4.0, 26.0, 1.0], [5.0, 2.0, 1.0], [1.0, 12.0, 0.0],
        [3.0, 18.0, 0.0], [3.0, 3.0, 0.0], [1.0, 24.0, 1.0], [2.0, 8.0, 0.0],
        [1.0, 9.0, 0.0], [4.0, 18.0, 0.0], [4.0, 22.0, 1.0], [5.0, 3.0, 1.0],
        [4.0, 12.0, 0.0], [4.0, 24.0, 1.0], [2.0, 18.0, 1.0], [2.0, 6.0, 0.0],
        [1.0, 8.0, 0.0], [5.0, 12.0, 0.0],
    ];
    let data = rows.iter().flat_map(|r| [r[0], r[1]]).collect();
    let targets = rows.iter().map(|r| r[2]).collect();
    (F64Matrix::new(rows.len(), 2, data).unwrap(), targets)
}

fn error_rate(predicted: &[f64], expected: &[f64]) -> f64 {
    let wrong = predicted.iter().zip(expected).filter(|(p, e)| p != e).count();
    wrong as f64 / expected.len() as f64
}

fn r_squared(predicted: &[f64], expected: &[f64]) -> f64 {
    let mean = expected.iter().sum::<f64>() / expected.len() as f64;
    let ss_res: f64 = predicted.iter().zip(expected).map(|(p, y)| (p - y).powi(2)).sum();
    let ss_tot: f64 = expected.iter().map(|y| (y - mean).powi(2)).sum();
    1.0 - ss_res / ss_tot
}

// ---------------------------------------------------------------------------
// a) random_forest_holdout_accuracy
// ---------------------------------------------------------------------------

/// Held-out error of a 100-tree random forest with default max features must stay below 0.1.
#[test]
fn random_forest_holdout_accuracy() {
    init_tracing();
    let (train_x, train_y) = make_classification(300, 42);
    let (test_x, test_y) = make_classification(200, 7);
    let model = ClassificationForestLearner::new(ForestConfig::new(100).unwrap())
        .unwrap()
        .learn(&train_x, &train_y)
        .unwrap();
    let error = error_rate(&model.predict_matrix(&test_x).unwrap(), &test_y);
    assert!(error < 0.1, "random forest holdout error {error} >= 0.1");
}

// ---------------------------------------------------------------------------
// b) extra_trees_holdout_accuracy
// ---------------------------------------------------------------------------

/// Held-out error of 100 extremely randomized trees must stay below 0.1.
#[test]
fn extra_trees_holdout_accuracy() {
    init_tracing();
    let (train_x, train_y) = make_classification(300, 42);
    let (test_x, test_y) = make_classification(200, 7);
    let config = ForestConfig::new(100).unwrap().with_split_method(SplitMethod::Random);
    let model = ClassificationForestLearner::new(config)
        .unwrap()
        .learn(&train_x, &train_y)
        .unwrap();
    let error = error_rate(&model.predict_matrix(&test_x).unwrap(), &test_y);
    assert!(error < 0.1, "extra-trees holdout error {error} >= 0.1");
}

// ---------------------------------------------------------------------------
// c) aptitude_training_error
// ---------------------------------------------------------------------------

/// Training error on the 26-row aptitude data, full and half sub-samples.
///
/// Two rows share features with opposite labels, so zero error is out of reach.
#[test]
fn aptitude_training_error() {
    let (observations, targets) = aptitude();
    for ratio in [1.0, 0.5] {
        let config = ForestConfig::new(100)
            .unwrap()
            .with_max_features(MaxFeatures::All)
            .with_sub_sample_ratio(ratio);
        let model = ClassificationForestLearner::new(config)
            .unwrap()
            .learn(&observations, &targets)
            .unwrap();
        let error = error_rate(&model.predict_matrix(&observations).unwrap(), &targets);
        assert!(error < 0.35, "ratio {ratio}: aptitude training error {error}");
        assert!(error > 0.0);
    }
}

// ---------------------------------------------------------------------------
// d) regression_holdout_r_squared
// ---------------------------------------------------------------------------

/// Held-out R^2 must exceed 0.9 for both split methods.
#[test]
fn regression_holdout_r_squared() {
    init_tracing();
    let (train_x, train_y) = make_regression(300, 42);
    let (test_x, test_y) = make_regression(100, 7);
    for method in [SplitMethod::Linear, SplitMethod::Random] {
        let config = ForestConfig::new(50)
            .unwrap()
            .with_max_features(MaxFeatures::All)
            .with_split_method(method);
        let model = RegressionForestLearner::new(config)
            .unwrap()
            .learn(&train_x, &train_y)
            .unwrap();
        let r2 = r_squared(&model.predict_matrix(&test_x).unwrap(), &test_y);
        assert!(r2 > 0.9, "{method:?}: holdout R^2 {r2} <= 0.9");
    }
}

// ---------------------------------------------------------------------------
// e) informative_feature_ranks_first
// ---------------------------------------------------------------------------

#[test]
fn informative_feature_ranks_first() {
    let (train_x, train_y) = make_regression(300, 42);
    let model = RegressionForestLearner::new(ForestConfig::new(30).unwrap().with_max_features(MaxFeatures::All))
        .unwrap()
        .learn(&train_x, &train_y)
        .unwrap();
    let names = vec!["signal".to_string(), "noise_a".to_string(), "noise_b".to_string()];
    let ranked = model.variable_importance(&names).unwrap();
    assert_eq!(ranked[0].name, "signal");
    assert!((ranked[0].importance - 100.0).abs() < 1e-9);
    assert!(ranked[1].importance < 10.0, "noise importance {}", ranked[1].importance);
}

// ---------------------------------------------------------------------------
// f) deterministic_with_same_seed
// ---------------------------------------------------------------------------

#[test]
fn deterministic_with_same_seed() {
    let (train_x, train_y) = make_classification(100, 42);
    let config = ForestConfig::new(20).unwrap().with_seed(99);
    let a = ClassificationForestLearner::new(config.clone())
        .unwrap()
        .learn(&train_x, &train_y)
        .unwrap();
    let b = ClassificationForestLearner::new(config)
        .unwrap()
        .learn(&train_x, &train_y)
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.predict_probability_matrix(&train_x).unwrap(),
        b.predict_probability_matrix(&train_x).unwrap()
    );
}

// ---------------------------------------------------------------------------
// g) prediction_rejects_wrong_width
// ---------------------------------------------------------------------------

#[test]
fn prediction_rejects_wrong_width() {
    let (train_x, train_y) = make_classification(50, 42);
    let model = ClassificationForestLearner::new(ForestConfig::new(3).unwrap())
        .unwrap()
        .learn(&train_x, &train_y)
        .unwrap();
    assert_eq!(
        model.predict(&[0.0; 4]).unwrap_err(),
        ForestError::Tree(TreeError::PredictionFeatureMismatch { expected: 10, got: 4 })
    );
}
