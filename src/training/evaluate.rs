//! Post-training evaluation: accuracy, probability bands and hold-out split.

use std::collections::BTreeMap;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Coarse band of a predicted probability, written to the predictions file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProbabilityBand {
    /// p < 0.3
    Low,
    /// 0.3 <= p < 0.5
    Moderate,
    /// p >= 0.5
    High,
}

impl ProbabilityBand {
    /// Band of a probability
    #[must_use]
    pub fn from_probability(prob: f64) -> Self {
        if prob < 0.3 {
            Self::Low
        } else if prob < 0.5 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Label as written to CSV
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ProbabilityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metrics reported after training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Accuracy on the rows the model was fitted on
    pub accuracy: f64,
    /// Accuracy on the held-out rows, when a hold-out split was configured
    pub holdout_accuracy: Option<f64>,
    /// Number of rows per probability band, over the whole dataset
    pub band_counts: BTreeMap<ProbabilityBand, usize>,
}

/// Fraction of predictions equal to their label; 0 for empty input
#[must_use]
pub fn accuracy(predictions: &[u8], labels: &[u8]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions.iter().zip(labels).filter(|(p, l)| p == l).count();
    correct as f64 / predictions.len() as f64
}

/// Count probabilities per band
#[must_use]
pub fn band_counts(probabilities: &[f64]) -> BTreeMap<ProbabilityBand, usize> {
    let mut counts = BTreeMap::new();
    for &p in probabilities {
        *counts.entry(ProbabilityBand::from_probability(p)).or_insert(0) += 1;
    }
    counts
}

/// Split row indices into fitting and hold-out sets with a seeded shuffle
///
/// At least one row always stays in the fitting set. Both index lists are
/// returned in ascending order.
#[must_use]
pub fn holdout_split(rows: usize, fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let holdout = ((rows as f64) * fraction.clamp(0.0, 1.0)).round() as usize;
    let holdout = holdout.min(rows.saturating_sub(1));
    let mut indices: Vec<usize> = (0..rows).collect();
    if holdout == 0 {
        return (indices, Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let mut held = indices.split_off(rows - holdout);
    indices.sort_unstable();
    held.sort_unstable();
    (indices, held)
}
