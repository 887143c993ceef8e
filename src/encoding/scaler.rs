//! Standard scaling fitted once at training time.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// Per-column standardisation `(x - mean) / scale`
///
/// `scale` is the population standard deviation; zero-variance columns use a
/// scale of one so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from known parameters
    pub fn from_parts(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Fit column means and standard deviations over equally sized rows
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| RiskError::Dataset("Cannot fit scaler on zero rows".to_string()))?;
        let width = first.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RiskError::Dataset(format!(
                "Row {i} has {} columns, expected {width}",
                row.len()
            )));
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; width];
        for row in rows {
            for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
                *v += (x - m).powi(2);
            }
        }

        let scale = var
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();

        Self::from_parts(mean, scale)
    }

    /// Apply the fitted transform; never refits
    ///
    /// # Errors
    /// Returns an inference error when the row width differs from the fitted width.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.mean.len() {
            return Err(RiskError::Inference(format!(
                "Scaler expects {} features, got {}",
                self.mean.len(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    /// Number of columns the scaler was fitted on
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Fitted column means
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Fitted column scales
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Check that the parameters are usable (equal lengths, finite, positive scales)
    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(RiskError::Inference(format!(
                "Scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().any(|m| !m.is_finite()) || self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(RiskError::Inference(
                "Scaler parameters must be finite with positive scales".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_matches_population_statistics() {
        let rows = vec![vec![1.0, 5.0], vec![3.0, 5.0]];
        let scaler = StandardScaler::fit(&rows).unwrap();
        assert_eq!(scaler.mean(), &[2.0, 5.0]);
        assert_eq!(scaler.scale(), &[1.0, 1.0]);
        assert_eq!(scaler.transform(&[3.0, 5.0]).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn dimension_mismatch_is_an_inference_error() {
        let scaler = StandardScaler::from_parts(vec![0.0; 3], vec![1.0; 3]).unwrap();
        assert!(matches!(scaler.transform(&[1.0]), Err(RiskError::Inference(_))));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(StandardScaler::fit(&rows), Err(RiskError::Dataset(_))));
    }

    #[test]
    fn zero_scale_is_invalid() {
        assert!(StandardScaler::from_parts(vec![0.0], vec![0.0]).is_err());
    }
}
