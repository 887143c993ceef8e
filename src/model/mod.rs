//! Binary classifiers producing a diabetes probability.

pub mod logistic;

pub use logistic::LogisticRegression;

use crate::error::Result;

/// Probability threshold for the binary prediction
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A fitted binary classifier used in its read-only capacity
///
/// Implementations must be deterministic and free of interior mutability so a
/// single instance can serve concurrent requests.
pub trait ProbabilisticClassifier: Send + Sync {
    /// Number of input features the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Probability of the positive class for one scaled row
    ///
    /// # Errors
    /// Returns an inference error on a dimension mismatch or non-finite output.
    fn predict_proba(&self, row: &[f64]) -> Result<f64>;

    /// Binary prediction at [`DECISION_THRESHOLD`]
    fn predict(&self, row: &[f64]) -> Result<u8> {
        Ok(u8::from(self.predict_proba(row)? >= DECISION_THRESHOLD))
    }
}
