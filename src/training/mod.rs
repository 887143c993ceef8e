//! Offline training: dataset to artifacts, evaluation and predictions file.
//!
//! Rows are encoded through [`encode_aligned`], the same path serving uses, so
//! a training row and the identical request produce the same feature vector.

pub mod dataset;
pub mod derive;
pub mod evaluate;
pub mod output;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::artifacts::{ModelArtifact, TrainedArtifacts};
use crate::config::{PipelineConfig, TrainingConfig};
use crate::encoding::{StandardScaler, build_schema, encode_aligned, learn_levels};
use crate::error::Result;
use crate::model::{DECISION_THRESHOLD, LogisticRegression, ProbabilisticClassifier};
use crate::schema::{ClinicalField, EncodedVector, FeatureSchema};
use crate::utils::logging::{create_spinner, finish_and_clear, log_operation_complete, log_operation_start};

pub use dataset::{Column, TARGET_COLUMN, TrainingTable};
pub use derive::{DERIVED_COLUMNS, DerivedColumn, Transform, derive_features};
pub use evaluate::{EvaluationSummary, ProbabilityBand};

/// Everything a training run produced
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Artifacts as written to disk
    pub artifacts: TrainedArtifacts,
    /// Accuracy and probability bands
    pub evaluation: EvaluationSummary,
    /// Rows in the dataset
    pub rows: usize,
    /// Where the predictions file was written
    pub predictions_path: PathBuf,
}

/// Learn the categorical levels of the table's text feature columns and build the schema
pub fn learn_schema(table: &TrainingTable) -> Result<FeatureSchema> {
    let mut categorical = BTreeMap::new();
    for field in ClinicalField::ALL {
        let Some(values) = table.categorical_values(field) else {
            continue;
        };
        let levels = learn_levels(values.iter().map(String::as_str));
        if levels.is_empty() {
            log::debug!("Text column '{field}' has no values, treating it as numeric");
            continue;
        }
        categorical.insert(field, levels);
    }
    build_schema(&categorical)
}

/// Encode one table row exactly as a serving request with the same values
pub fn encode_row(table: &TrainingTable, row: usize, schema: &FeatureSchema) -> Result<EncodedVector> {
    encode_aligned(&table.record(row), schema).map(|(aligned, _)| aligned)
}

/// Training pipeline bound to its configuration
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    pipeline: PipelineConfig,
    training: TrainingConfig,
}

impl Trainer {
    /// Create a trainer
    #[must_use]
    pub const fn new(pipeline: PipelineConfig, training: TrainingConfig) -> Self {
        Self { pipeline, training }
    }

    /// Read the configured dataset and train on it
    pub fn run(&self) -> Result<TrainingOutcome> {
        let table = TrainingTable::read_csv(&self.pipeline.dataset_path)?;
        self.train_table(table)
    }

    /// Train on an already loaded table
    ///
    /// # Errors
    /// Aborts with [`crate::RiskError::MissingFeatures`] before fitting anything
    /// when a feature cannot be derived.
    pub fn train_table(&self, mut table: TrainingTable) -> Result<TrainingOutcome> {
        let start = Instant::now();
        log_operation_start("Training on", &self.pipeline.dataset_path);

        derive_features(&mut table)?;
        log::info!("Prepared dataset with columns: {:?}", table.column_names());

        let labels = table.labels()?;
        let schema = learn_schema(&table)?;
        log::info!("Features after encoding: {} rows x {} columns", table.rows(), schema.len());

        let spinner = self
            .training
            .show_progress
            .then(|| create_spinner(Some("Encoding training rows")));
        let encoded: Result<Vec<Vec<f64>>> = (0..table.rows())
            .into_par_iter()
            .map(|row| encode_row(&table, row, &schema).map(|v| v.values()))
            .collect();
        if let Some(pb) = &spinner {
            finish_and_clear(pb);
        }
        let encoded = encoded?;

        let (fit_idx, holdout_idx) =
            evaluate::holdout_split(table.rows(), self.training.holdout_fraction, self.training.seed);
        if !holdout_idx.is_empty() {
            log::info!("Holding out {} of {} rows for evaluation", holdout_idx.len(), table.rows());
        }

        let fit_rows = select(&encoded, &fit_idx);
        let scaler = StandardScaler::fit(&fit_rows)?;
        let scaled = encoded
            .iter()
            .map(|row| scaler.transform(row))
            .collect::<Result<Vec<_>>>()?;

        let fit_labels = select(&labels, &fit_idx);
        let classifier = LogisticRegression::fit(&select(&scaled, &fit_idx), &fit_labels, &self.training)?;
        log::info!("Model trained successfully");

        let artifacts = TrainedArtifacts {
            schema,
            scaler,
            model: ModelArtifact::new(classifier, fit_idx.len()),
        };
        artifacts.save(&self.pipeline.artifact_paths())?;

        let probabilities = scaled
            .iter()
            .map(|row| artifacts.model.classifier.predict_proba(row))
            .collect::<Result<Vec<_>>>()?;
        let predictions: Vec<u8> = probabilities
            .iter()
            .map(|&p| u8::from(p >= DECISION_THRESHOLD))
            .collect();

        let accuracy_on = |indices: &[usize]| {
            evaluate::accuracy(&select(&predictions, indices), &select(&labels, indices))
        };
        let evaluation = EvaluationSummary {
            accuracy: accuracy_on(&fit_idx),
            holdout_accuracy: (!holdout_idx.is_empty()).then(|| accuracy_on(&holdout_idx)),
            band_counts: evaluate::band_counts(&probabilities),
        };
        log::info!("Model accuracy: {:.2}%", evaluation.accuracy * 100.0);

        output::write_predictions(&self.pipeline.predictions_path, &table, &probabilities, &predictions)?;

        log_operation_complete("trained on", &self.pipeline.dataset_path, table.rows(), Some(start.elapsed()));
        Ok(TrainingOutcome {
            artifacts,
            evaluation,
            rows: table.rows(),
            predictions_path: self.pipeline.predictions_path.clone(),
        })
    }
}

/// Train with the given configuration
pub fn train(pipeline: &PipelineConfig, training: &TrainingConfig) -> Result<TrainingOutcome> {
    Trainer::new(pipeline.clone(), training.clone()).run()
}

fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}
