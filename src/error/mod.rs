//! Error handling for the risk pipeline.

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;

pub mod util;

/// Specialized error type for training, encoding and inference
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// A persisted artifact could not be loaded; fatal at startup
    #[error("Failed to load {artifact} artifact from {}: {reason}", .path.display())]
    ArtifactLoad {
        /// Which artifact (model, scaler, columns)
        artifact: &'static str,
        /// Where it was expected
        path: PathBuf,
        /// Short description of the failure
        reason: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record could not be coerced or aligned to the feature schema
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The scaler or classifier rejected the input
    #[error("Inference error: {0}")]
    Inference(String),

    /// Required feature columns are absent from the derived training dataset
    #[error("Missing feature columns: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),

    /// Malformed training data
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing CSV through arrow
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error (de)serializing JSON artifacts or requests
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RiskError {
    /// Build an artifact load error without an underlying source
    #[must_use]
    pub fn artifact_load(artifact: &'static str, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            artifact,
            path: path.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Build an artifact load error that keeps the original cause
    #[must_use]
    pub fn artifact_load_with_source<E>(
        artifact: &'static str,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ArtifactLoad {
            artifact,
            path: path.into(),
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error must stop the process instead of failing a single request
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ArtifactLoad { .. })
    }
}

/// Result type for risk pipeline operations
pub type Result<T> = std::result::Result<T, RiskError>;
