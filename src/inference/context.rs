//! Immutable serving context loaded once at startup.

use crate::artifacts::TrainedArtifacts;
use crate::config::ArtifactPaths;
use crate::encoding::StandardScaler;
use crate::error::{Result, RiskError};
use crate::inference::encoder::ServingEncoder;
use crate::model::{LogisticRegression, ProbabilisticClassifier};
use crate::schema::FeatureSchema;

/// Feature schema, scaler and classifier used read-only by every request
///
/// Share it across threads with `Arc<ModelContext>`; nothing in it mutates
/// after construction.
#[derive(Debug, Clone)]
pub struct ModelContext<M = LogisticRegression> {
    schema: FeatureSchema,
    scaler: StandardScaler,
    model: M,
}

impl<M: ProbabilisticClassifier> ModelContext<M> {
    /// Assemble a context, checking that all parts agree on the feature width
    pub fn from_parts(schema: FeatureSchema, scaler: StandardScaler, model: M) -> Result<Self> {
        if schema.len() != scaler.n_features() || schema.len() != model.n_features() {
            return Err(RiskError::Inference(format!(
                "Schema has {} columns, scaler {} and model {}",
                schema.len(),
                scaler.n_features(),
                model.n_features()
            )));
        }
        Ok(Self { schema, scaler, model })
    }

    /// Persisted feature schema
    #[must_use]
    pub const fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Fitted scaler
    #[must_use]
    pub const fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Fitted classifier
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Encoder bound to this context's schema and scaler
    #[must_use]
    pub const fn encoder(&self) -> ServingEncoder<'_> {
        ServingEncoder::new(&self.schema, &self.scaler)
    }
}

impl ModelContext<LogisticRegression> {
    /// Load the three artifacts
    ///
    /// # Errors
    /// Any failure is a fatal [`RiskError::ArtifactLoad`].
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        TrainedArtifacts::load(paths).and_then(Self::try_from)
    }
}

impl TryFrom<TrainedArtifacts> for ModelContext<LogisticRegression> {
    type Error = RiskError;

    fn try_from(artifacts: TrainedArtifacts) -> Result<Self> {
        Self::from_parts(artifacts.schema, artifacts.scaler, artifacts.model.classifier)
    }
}
