//! Integration tests for the load-or-train model lifecycle.

use failcast_core::{
    Classifier, FailcastError, FeatureVector, HistoricalRecord, HistoryTable, ModelArtifact,
    ModelLifecycleManager, ModelOutcome, PredictorConfig, RandomForest,
};
use std::fs;

fn record(i: usize, failed: bool) -> HistoricalRecord {
    let d = i as f64;
    if failed {
        HistoricalRecord {
            test_name: format!("IntegrationTest{i}"),
            code_churn: 280.0 + 10.0 * d,
            author_experience: 1.0 + 0.2 * d,
            time_since_last_change: 1.0 + 0.1 * d,
            coverage_percentage: 30.0 + d,
            complexity: 22.0 + d,
            failed: true,
        }
    } else {
        HistoricalRecord {
            test_name: format!("UnitTest{i}"),
            code_churn: 15.0 + 3.0 * d,
            author_experience: 24.0 + d,
            time_since_last_change: 30.0 + 2.0 * d,
            coverage_percentage: 85.0 + 0.5 * d,
            complexity: 3.0 + 0.3 * d,
            failed: false,
        }
    }
}

fn balanced(n: usize) -> HistoryTable {
    HistoryTable::from_records((0..n).map(|i| record(i, i % 2 == 1)).collect())
}

fn config() -> PredictorConfig {
    PredictorConfig::default().with_trees(30)
}

fn risky_vector() -> FeatureVector {
    FeatureVector([260.0, 3.0, 2.0, 45.0, 18.0])
}

/// Fewer than the minimum records: Absent for every size, and nothing written.
#[test]
fn test_insufficient_history_is_absent_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelLifecycleManager::new(config());

    for n in 0..10 {
        let path = dir.path().join(format!("model-{n}.json"));
        let outcome = manager.obtain(&balanced(n), Some(&path)).unwrap();
        assert!(matches!(outcome, ModelOutcome::Absent { .. }), "n = {n}");
        assert!(matches!(manager.obtain(&balanced(n), None).unwrap(), ModelOutcome::Absent { .. }));
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// Insufficient history with an artifact path that does not exist yet: still no file.
#[test]
fn test_insufficient_history_does_not_create_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let outcome = ModelLifecycleManager::new(config())
        .obtain(&balanced(9), Some(&path))
        .unwrap();
    assert_eq!(outcome.kind(), "absent");
    assert!(!path.exists());
}

#[test]
fn test_training_persists_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let outcome = ModelLifecycleManager::new(config())
        .obtain(&balanced(12), Some(&path))
        .unwrap();
    match outcome {
        ModelOutcome::Trained { report, .. } => {
            assert_eq!(report.train_size, 9);
            assert_eq!(report.test_size, 3);
            assert!(report.artifact_digest.is_some());
        }
        other => panic!("expected Trained, got {}", other.kind()),
    }
    assert!(path.exists());
}

/// An existing artifact wins over the history, even an empty one.
#[test]
fn test_existing_artifact_is_loaded_without_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let manager = ModelLifecycleManager::new(config());

    manager.obtain(&balanced(12), Some(&path)).unwrap();
    let outcome = manager.obtain(&HistoryTable::empty(), Some(&path)).unwrap();
    match outcome {
        ModelOutcome::Loaded { path: loaded_from, model } => {
            assert_eq!(loaded_from, path);
            assert!(model.is_fitted());
        }
        other => panic!("expected Loaded, got {}", other.kind()),
    }
}

/// Persisting then loading reproduces class and probability.
#[test]
fn test_artifact_roundtrip_preserves_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let manager = ModelLifecycleManager::new(config());

    let trained = manager
        .obtain(&balanced(20), Some(&path))
        .unwrap()
        .into_classifier()
        .expect("trained model");
    let loaded = manager
        .obtain(&balanced(20), Some(&path))
        .unwrap()
        .into_classifier()
        .expect("loaded model");

    for v in [
        risky_vector(),
        FeatureVector([20.0, 25.0, 31.0, 86.0, 3.5]),
        FeatureVector([150.0, 12.0, 15.0, 60.0, 12.0]),
    ] {
        assert_eq!(trained.predict_class(&v), loaded.predict_class(&v));
        let (a, b) = (trained.predict_probability(&v), loaded.predict_probability(&v));
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }
}

/// Same data, same seed: same model, same probabilities.
#[test]
fn test_retraining_is_deterministic() {
    let manager = ModelLifecycleManager::new(config());
    let history = balanced(16);

    let (a, report_a) = manager.train(&history).unwrap();
    let (b, report_b) = manager.train(&history).unwrap();
    assert_eq!(a, b);
    assert_eq!(report_a.holdout, report_b.holdout);

    let p = a.predict_probability(&risky_vector());
    assert!((0.0..=1.0).contains(&p));
    assert_eq!(p, b.predict_probability(&risky_vector()));
}

#[test]
fn test_corrupt_artifact_is_fatal_and_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, "{ this is not a model").unwrap();

    let err = ModelLifecycleManager::new(config())
        .obtain(&balanced(12), Some(&path))
        .unwrap_err();
    assert!(matches!(err, FailcastError::ArtifactCorrupt { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not a model");
}

#[test]
fn test_artifact_written_by_hand_is_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");

    let mut forest = RandomForest::new(config().forest);
    let history = balanced(10);
    let x: Vec<FeatureVector> = history.records().iter().map(FeatureVector::from_history).collect();
    let y: Vec<bool> = history.records().iter().map(|r| r.failed).collect();
    forest.fit(&x, &y).unwrap();
    ModelArtifact::new(forest.clone()).persist(&path).unwrap();

    let outcome = ModelLifecycleManager::new(config())
        .obtain(&HistoryTable::empty(), Some(&path))
        .unwrap();
    assert_eq!(outcome.classifier(), Some(&forest));
}
