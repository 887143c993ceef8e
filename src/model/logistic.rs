//! L2-regularised logistic regression with balanced class weights.
//!
//! Fitted by full-batch gradient descent in a fixed summation order, so the
//! same data and configuration always produce the same coefficients.

use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::error::{Result, RiskError};
use crate::model::ProbabilisticClassifier;
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

/// Fitted logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Numerically stable logistic function
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Per-class weights `n / (2 * n_class)`, the "balanced" weighting
fn balanced_weights(labels: &[u8]) -> Result<[f64; 2]> {
    let positives = labels.iter().filter(|&&y| y == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(RiskError::Dataset(format!(
            "Training data must contain both classes ({negatives} negative, {positives} positive rows)"
        )));
    }
    let n = labels.len() as f64;
    Ok([n / (2.0 * negatives as f64), n / (2.0 * positives as f64)])
}

impl LogisticRegression {
    /// Build a model from known parameters
    pub fn from_parts(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.is_empty() || coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err(RiskError::Inference(
                "Model parameters must be finite and non-empty".to_string(),
            ));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Fit on scaled rows and 0/1 labels
    ///
    /// # Arguments
    /// * `rows` - Scaled feature rows, all of the same width
    /// * `labels` - Target class per row (0 or 1)
    /// * `config` - Learning rate, epochs and L2 strength
    ///
    /// # Errors
    /// Fails on empty or ragged input, mismatched label count, or a single class.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], config: &TrainingConfig) -> Result<Self> {
        if rows.is_empty() {
            return Err(RiskError::Dataset("Cannot fit a model on zero rows".to_string()));
        }
        if rows.len() != labels.len() {
            return Err(RiskError::Dataset(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let width = rows[0].len();
        if rows.iter().any(|r| r.len() != width) {
            return Err(RiskError::Dataset("Feature rows have differing widths".to_string()));
        }

        let class_weight = balanced_weights(labels)?;
        let total_weight: f64 = labels.iter().map(|&y| class_weight[usize::from(y)]).sum();

        let mut coefficients = vec![0.0; width];
        let mut intercept = 0.0;
        let mut gradient = vec![0.0; width];

        let progress = config
            .show_progress
            .then(|| create_main_progress_bar(config.epochs as u64, Some("Fitting logistic regression")));

        for _ in 0..config.epochs {
            gradient.iter_mut().for_each(|g| *g = 0.0);
            let mut intercept_gradient = 0.0;

            for (row, &label) in rows.iter().zip(labels) {
                let z = intercept + dot(&coefficients, row);
                let error = class_weight[usize::from(label)] * (sigmoid(z) - f64::from(label));
                for (g, x) in gradient.iter_mut().zip(row) {
                    *g += error * x;
                }
                intercept_gradient += error;
            }

            for (c, g) in coefficients.iter_mut().zip(&gradient) {
                *c -= config.learning_rate * (g / total_weight + config.l2 * *c);
            }
            intercept -= config.learning_rate * intercept_gradient / total_weight;

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress {
            finish_progress_bar(pb, Some("Model fitted"));
        }

        Self::from_parts(coefficients, intercept)
    }

    /// Fitted coefficients in schema column order
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted intercept
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl ProbabilisticClassifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(RiskError::Inference(format!(
                "Model expects {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        let p = sigmoid(self.intercept + dot(&self.coefficients, row));
        if p.is_finite() {
            Ok(p)
        } else {
            Err(RiskError::Inference("Model produced a non-finite probability".to_string()))
        }
    }
}
