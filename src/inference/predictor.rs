//! Single and batch risk prediction over a shared model context.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::Value;

use crate::error::Result;
use crate::inference::context::ModelContext;
use crate::model::{LogisticRegression, ProbabilisticClassifier};
use crate::risk::{ClinicalIndicators, InferenceResponse, PredictionResult, classify, validate_probability};
use crate::schema::RawRecord;

/// Runs the full request pipeline: encode, score, classify
#[derive(Debug)]
pub struct RiskPredictor<M = LogisticRegression> {
    context: Arc<ModelContext<M>>,
}

impl<M> Clone for RiskPredictor<M> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
        }
    }
}

impl<M: ProbabilisticClassifier> RiskPredictor<M> {
    /// Create a predictor over a shared context
    #[must_use]
    pub const fn new(context: Arc<ModelContext<M>>) -> Self {
        Self { context }
    }

    /// The shared context
    #[must_use]
    pub fn context(&self) -> &ModelContext<M> {
        &self.context
    }

    /// Model probability for a record
    pub fn probability(&self, record: &RawRecord) -> Result<f64> {
        let scaled = self.context.encoder().encode(record)?;
        let prob = self.context.model().predict_proba(scaled.as_slice())?;
        validate_probability(prob)
    }

    /// Probability plus clinical risk tier for a record
    ///
    /// The clinical indicators are checked first so a malformed threshold
    /// field fails before the model is consulted.
    pub fn predict(&self, record: &RawRecord) -> Result<PredictionResult> {
        let indicators = ClinicalIndicators::from_record(record)?;
        let prob = self.probability(record)?;
        Ok(classify(prob, &indicators))
    }

    /// Predict many records in parallel; results keep input order
    pub fn predict_batch(&self, records: &[RawRecord]) -> Vec<Result<PredictionResult>> {
        let start = Instant::now();
        let results: Vec<_> = records.par_iter().map(|record| self.predict(record)).collect();
        log::debug!(
            "Scored {} records on {} threads in {:?}",
            records.len(),
            rayon::current_num_threads(),
            start.elapsed()
        );
        results
    }

    /// Predict and convert the outcome into a response object
    pub fn respond(&self, record: &RawRecord) -> InferenceResponse {
        let result = self.predict(record);
        if let Err(e) = &result {
            log::warn!("Prediction failed: {e}");
        }
        InferenceResponse::from(result)
    }

    /// Respond to a JSON request object
    pub fn respond_json(&self, request: &Value) -> InferenceResponse {
        match RawRecord::from_json_value(request) {
            Ok(record) => self.respond(&record),
            Err(e) => {
                log::warn!("Rejected request: {e}");
                InferenceResponse::from_error(&e)
            }
        }
    }
}
