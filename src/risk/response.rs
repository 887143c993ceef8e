//! Response objects handed to the serving layer.

use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::risk::PredictionResult;

/// Successful inference response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskResponse {
    /// Percentage and tier label
    pub message: String,
    /// Advice text for the tier
    pub advice: String,
    /// Display class tag
    pub class_name: String,
}

impl From<&PredictionResult> for RiskResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            message: result.message.clone(),
            advice: result.advice.clone(),
            class_name: result.class_name().to_string(),
        }
    }
}

/// Either a risk response or a structured error, serialized without a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    /// `{message, advice, class_name}`
    Success(RiskResponse),
    /// `{error}`
    Failure {
        /// Human readable failure description
        error: String,
    },
}

impl InferenceResponse {
    /// Wrap a pipeline error as a structured error response
    #[must_use]
    pub fn from_error(err: &RiskError) -> Self {
        Self::Failure {
            error: format!("Prediction error: {err}"),
        }
    }

    /// Whether this is an error response
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

impl From<crate::error::Result<PredictionResult>> for InferenceResponse {
    fn from(result: crate::error::Result<PredictionResult>) -> Self {
        match result {
            Ok(prediction) => Self::Success(RiskResponse::from(&prediction)),
            Err(err) => Self::from_error(&err),
        }
    }
}
