//! JSON persistence of the feature schema, scaler and classifier.
//!
//! The three files are written together by training and read together at
//! startup. Any failure while reading them is an [`RiskError::ArtifactLoad`].

use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ArtifactPaths;
use crate::encoding::StandardScaler;
use crate::error::util::{safe_create_file, safe_read_to_string};
use crate::error::{Result, RiskError};
use crate::model::{LogisticRegression, ProbabilisticClassifier};
use crate::schema::FeatureSchema;

/// Persisted classifier with training metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// When the classifier was fitted
    pub trained_at: DateTime<Utc>,
    /// Rows the classifier was fitted on
    pub training_rows: usize,
    /// Width of the feature vector
    pub feature_count: usize,
    /// Fitted parameters
    pub classifier: LogisticRegression,
}

impl ModelArtifact {
    /// Wrap a freshly fitted classifier, stamped with the current time
    #[must_use]
    pub fn new(classifier: LogisticRegression, training_rows: usize) -> Self {
        Self {
            trained_at: Utc::now(),
            training_rows,
            feature_count: classifier.n_features(),
            classifier,
        }
    }
}

/// The three artifacts shared by training and serving
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedArtifacts {
    /// Ordered post-encoding columns
    pub schema: FeatureSchema,
    /// Fitted scaler
    pub scaler: StandardScaler,
    /// Fitted classifier and metadata
    pub model: ModelArtifact,
}

impl TrainedArtifacts {
    /// Check that schema, scaler and classifier agree on the feature width
    pub fn check_dimensions(&self) -> Result<()> {
        let widths = [
            ("schema", self.schema.len()),
            ("scaler", self.scaler.n_features()),
            ("model", self.model.classifier.n_features()),
            ("model metadata", self.model.feature_count),
        ];
        if widths.iter().all(|(_, w)| *w == widths[0].1) {
            Ok(())
        } else {
            let detail = widths
                .iter()
                .map(|(name, w)| format!("{name}={w}"))
                .collect::<Vec<_>>()
                .join(", ");
            Err(RiskError::Inference(format!("Artifact feature widths disagree ({detail})")))
        }
    }

    /// Write all three artifacts
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        write_json(&self.schema, &paths.columns, "saving feature schema")?;
        write_json(&self.scaler, &paths.scaler, "saving scaler")?;
        write_json(&self.model, &paths.model, "saving model")?;
        log::info!(
            "Saved model to {}, scaler to {} and columns to {}",
            paths.model.display(),
            paths.scaler.display(),
            paths.columns.display()
        );
        Ok(())
    }

    /// Read and validate all three artifacts
    ///
    /// # Errors
    /// Every failure, including a width disagreement, is reported as
    /// [`RiskError::ArtifactLoad`] naming the offending artifact.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let schema: FeatureSchema = read_json("columns", &paths.columns)?;
        schema
            .validate()
            .map_err(|e| RiskError::artifact_load_with_source("columns", &paths.columns, "invalid schema", e))?;

        let scaler: StandardScaler = read_json("scaler", &paths.scaler)?;
        scaler
            .validate()
            .map_err(|e| RiskError::artifact_load_with_source("scaler", &paths.scaler, "invalid scaler", e))?;

        let model: ModelArtifact = read_json("model", &paths.model)?;
        let classifier = &model.classifier;
        LogisticRegression::from_parts(classifier.coefficients().to_vec(), classifier.intercept())
            .map_err(|e| RiskError::artifact_load_with_source("model", &paths.model, "invalid model", e))?;

        let artifacts = Self { schema, scaler, model };
        artifacts.check_dimensions().map_err(|e| {
            RiskError::artifact_load_with_source("model", &paths.model, "does not match schema and scaler", e)
        })?;

        log::info!(
            "Loaded model trained at {} on {} rows with {} features",
            artifacts.model.trained_at,
            artifacts.model.training_rows,
            artifacts.model.feature_count
        );
        Ok(artifacts)
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path, purpose: &str) -> Result<()> {
    let file = safe_create_file(path, purpose)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T> {
    let content = safe_read_to_string(path, &format!("loading {artifact}"))
        .map_err(|e| RiskError::artifact_load_with_source(artifact, path, "cannot read file", e))?;
    serde_json::from_str(&content)
        .map_err(|e| RiskError::artifact_load_with_source(artifact, path, "invalid JSON", e))
}
