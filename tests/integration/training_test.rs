use std::path::Path;
use std::sync::Arc;

use diabetes_risk::training::{TrainingTable, derive_features};
use diabetes_risk::utils::test::write_synthetic_dataset;
use diabetes_risk::{
    LogisticRegression, ModelContext, PipelineConfig, RiskError, RiskPredictor, Trainer, TrainingConfig, TrainingOutcome,
};

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig::new()
        .with_artifact_dir(dir.join("artifacts"))
        .with_dataset_path(dir.join("diabetes_dataset.csv"))
        .with_predictions_path(dir.join("diabetes_predictions_with_risk.csv"))
        .with_worker_threads(2)
}

fn quiet() -> TrainingConfig {
    TrainingConfig::default().with_progress(false)
}

fn train_synthetic(dir: &Path, rows: usize, training: TrainingConfig) -> diabetes_risk::Result<TrainingOutcome> {
    let config = config_in(dir);
    write_synthetic_dataset(&config.dataset_path, rows, None)?;
    Trainer::new(config, training).run()
}

/// Training writes all artifacts and a predictions row per dataset row
#[test]
fn test_train_writes_artifacts_and_predictions() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let outcome = train_synthetic(dir.path(), 150, quiet())?;
    let paths = config_in(dir.path()).artifact_paths();

    assert!(paths.model.is_file());
    assert!(paths.scaler.is_file());
    assert!(paths.columns.is_file());
    assert_eq!(outcome.rows, 150);
    assert_eq!(outcome.artifacts.model.training_rows, 150);
    assert_eq!(outcome.artifacts.model.feature_count, outcome.artifacts.schema.len());
    assert!(outcome.evaluation.accuracy > 0.7, "accuracy {}", outcome.evaluation.accuracy);
    assert!(outcome.evaluation.holdout_accuracy.is_none());
    assert_eq!(outcome.evaluation.band_counts.values().sum::<usize>(), 150);

    let predictions = std::fs::read_to_string(&outcome.predictions_path)?;
    let mut lines = predictions.lines();
    let header = lines.next().unwrap_or_default();
    assert!(header.starts_with("Age,BMI,Fasting_Blood_Sugar"));
    assert!(header.contains("Blood Glucose"));
    assert!(header.ends_with("Predicted_Probability,Predicted_Status,Diabetes_Risk_Level"));
    assert_eq!(lines.count(), 150);
    Ok(())
}

/// Artifacts loaded from disk predict exactly like the in-memory model
#[test]
fn test_loaded_context_matches_in_memory_model() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let outcome = train_synthetic(dir.path(), 90, quiet())?;
    let config = config_in(dir.path());

    let loaded = RiskPredictor::new(Arc::new(ModelContext::load(&config.artifact_paths())?));
    let in_memory = RiskPredictor::new(Arc::new(ModelContext::<LogisticRegression>::try_from(outcome.artifacts.clone())?));
    assert_eq!(loaded.context().schema(), &outcome.artifacts.schema);

    let mut table = TrainingTable::read_csv(&config.dataset_path)?;
    derive_features(&mut table)?;
    for row in 0..table.rows() {
        let record = table.record(row);
        assert_eq!(loaded.probability(&record)?, in_memory.probability(&record)?, "row {row}");
    }
    Ok(())
}

/// Categorical dataset columns become dummy columns in the persisted schema
#[test]
fn test_schema_records_categorical_levels() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let outcome = train_synthetic(dir.path(), 60, quiet())?;
    let schema = &outcome.artifacts.schema;

    assert_eq!(
        schema.levels(diabetes_risk::ClinicalField::DietType),
        Some(&["Non-Vegetarian".to_string(), "Vegan".to_string(), "Vegetarian".to_string()][..])
    );
    assert!(schema.index_of("Diet_Type_Vegan").is_some());
    assert!(schema.index_of("Diet_Type_Non-Vegetarian").is_none());
    assert!(schema.index_of("Family history_Yes").is_some());
    Ok(())
}

/// A hold-out split reports its own accuracy and fits on the remaining rows
#[test]
fn test_holdout_evaluation() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let outcome = train_synthetic(dir.path(), 100, quiet().with_holdout_fraction(0.2).with_seed(3))?;

    assert_eq!(outcome.artifacts.model.training_rows, 80);
    let holdout = outcome.evaluation.holdout_accuracy.unwrap_or(-1.0);
    assert!((0.0..=1.0).contains(&holdout));
    Ok(())
}

/// A missing source column aborts training before anything is written
#[test]
fn test_missing_column_aborts_training() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path());
    write_synthetic_dataset(&config.dataset_path, 30, Some("HBA1C"))?;

    let err = Trainer::new(config.clone(), quiet()).run().unwrap_err();
    match err {
        RiskError::MissingFeatures(names) => assert_eq!(names, vec!["HbA1c".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!config.artifact_paths().columns.exists());
    assert!(!config.predictions_path.exists());
    Ok(())
}

/// Both classes are required to fit the classifier
#[test]
fn test_single_class_dataset_is_rejected() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let result = train_synthetic(dir.path(), 1, quiet());
    assert!(matches!(result, Err(RiskError::Dataset(_))));
    Ok(())
}

/// Starting without artifacts is a fatal load error
#[test]
fn test_missing_artifacts_are_fatal() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let err = ModelContext::load(&config_in(dir.path()).artifact_paths()).unwrap_err();
    assert!(err.is_fatal());
    Ok(())
}
