//! Risk tiering: model probability plus clinical red flags.
//!
//! Points accumulate from independent conditions (a record can hit a
//! probability band and several clinical bands at once); the total selects
//! the tier. All thresholds are inclusive on their lower bound.

pub mod response;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::schema::{ClinicalField, CoercedValue, RawRecord};

pub use response::{InferenceResponse, RiskResponse};

/// Probability at or above which the model alone adds three points
pub const PROB_HIGH: f64 = 0.7;
/// Probability at or above which the model alone adds two points
pub const PROB_MODERATE: f64 = 0.3;
/// Fasting glucose in the diabetic range (mg/dL)
pub const GLUCOSE_DIABETIC: f64 = 126.0;
/// Fasting glucose in the prediabetic range (mg/dL)
pub const GLUCOSE_PREDIABETIC: f64 = 100.0;
/// HbA1c in the diabetic range (%)
pub const HBA1C_DIABETIC: f64 = 6.5;
/// HbA1c in the prediabetic range (%)
pub const HBA1C_PREDIABETIC: f64 = 5.7;
/// Obesity threshold
pub const BMI_OBESE: f64 = 30.0;
/// Hypertension threshold (mmHg)
pub const BLOOD_PRESSURE_HIGH: f64 = 140.0;
/// Minimum score for the High tier
pub const HIGH_TIER_SCORE: u32 = 5;
/// Minimum score for the Medium tier
pub const MEDIUM_TIER_SCORE: u32 = 3;

/// Final risk tier shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    /// Score below the Medium threshold
    None,
    /// Moderate risk
    Medium,
    /// High risk
    High,
}

impl RiskTier {
    /// Tier for a risk score
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        if score >= HIGH_TIER_SCORE {
            Self::High
        } else if score >= MEDIUM_TIER_SCORE {
            Self::Medium
        } else {
            Self::None
        }
    }

    /// Label appended to the percentage in the message
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High Risk",
            Self::Medium => "Medium Risk",
            Self::None => "No Risk",
        }
    }

    /// Display class tag for the UI
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::High => "high-risk",
            Self::Medium => "medium-risk",
            Self::None => "no-risk",
        }
    }

    /// Fixed advice text
    #[must_use]
    pub const fn advice(self) -> &'static str {
        match self {
            Self::High => {
                "Your results show a high risk. Please consult a healthcare professional immediately for diagnosis and lifestyle guidance."
            }
            Self::Medium => {
                "You’re at moderate risk. Start making small healthy changes — eat balanced meals, stay active, and monitor your health regularly."
            }
            Self::None => {
                "Your risk is low — keep it that way! Maintain a healthy lifestyle with regular exercise and a nutritious diet."
            }
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clinical values checked against fixed thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalIndicators {
    /// Fasting blood glucose
    pub blood_glucose: f64,
    /// HbA1c percentage
    pub hba1c: f64,
    /// Body mass index
    pub bmi: f64,
    /// Blood pressure
    pub blood_pressure: f64,
    /// Family history of diabetes
    pub family_history: bool,
}

impl ClinicalIndicators {
    /// Read the indicators from a raw record
    ///
    /// Empty fields count as zero.
    ///
    /// # Errors
    /// Returns an encoding error when a threshold field holds non-numeric text,
    /// since it cannot be compared against a threshold.
    pub fn from_record(record: &RawRecord) -> Result<Self> {
        let numeric = |field: ClinicalField| -> Result<f64> {
            match record.coerce(field)? {
                CoercedValue::Number(v) => Ok(v),
                CoercedValue::Text(text) => Err(RiskError::Encoding(format!(
                    "Field '{field}' must be numeric for risk scoring, got '{text}'"
                ))),
            }
        };

        Ok(Self {
            blood_glucose: numeric(ClinicalField::BloodGlucose)?,
            hba1c: numeric(ClinicalField::HbA1c)?,
            bmi: numeric(ClinicalField::Bmi)?,
            blood_pressure: numeric(ClinicalField::BloodPressure)?,
            family_history: family_history_flag(record.raw_text(ClinicalField::FamilyHistory)),
        })
    }
}

/// Interpret a family-history answer: `1`, `yes`, `y` or `true` mean present
#[must_use]
pub fn family_history_flag(raw: &str) -> bool {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<f64>() {
        return (v - 1.0).abs() < f64::EPSILON;
    }
    matches!(raw.to_ascii_lowercase().as_str(), "yes" | "y" | "true")
}

/// Points contributed by the model probability
#[must_use]
pub fn probability_points(prob: f64) -> u32 {
    if prob >= PROB_HIGH {
        3
    } else if prob >= PROB_MODERATE {
        2
    } else {
        0
    }
}

/// Points contributed by fasting blood glucose
#[must_use]
pub fn glucose_points(blood_glucose: f64) -> u32 {
    if blood_glucose >= GLUCOSE_DIABETIC {
        2
    } else if blood_glucose >= GLUCOSE_PREDIABETIC {
        1
    } else {
        0
    }
}

/// Points contributed by HbA1c
#[must_use]
pub fn hba1c_points(hba1c: f64) -> u32 {
    if hba1c >= HBA1C_DIABETIC {
        2
    } else if hba1c >= HBA1C_PREDIABETIC {
        1
    } else {
        0
    }
}

/// Total risk score for a probability and clinical indicators
#[must_use]
pub fn risk_score(prob: f64, indicators: &ClinicalIndicators) -> u32 {
    probability_points(prob)
        + glucose_points(indicators.blood_glucose)
        + hba1c_points(indicators.hba1c)
        + u32::from(indicators.bmi >= BMI_OBESE)
        + u32::from(indicators.blood_pressure >= BLOOD_PRESSURE_HIGH)
        + u32::from(indicators.family_history)
}

/// Outcome of risk classification for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Model probability of diabetes
    pub probability: f64,
    /// Accumulated risk points
    pub risk_score: u32,
    /// Tier selected by the score
    pub tier: RiskTier,
    /// Percentage and tier label, e.g. `80.0% High Risk`
    pub message: String,
    /// Fixed advice for the tier
    pub advice: String,
}

impl PredictionResult {
    /// Display class tag of the tier
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        self.tier.class_name()
    }
}

/// Classify a probability and clinical indicators into a tier with its message
///
/// Pure: the same inputs always yield the same result.
#[must_use]
pub fn classify(prob: f64, indicators: &ClinicalIndicators) -> PredictionResult {
    let score = risk_score(prob, indicators);
    let tier = RiskTier::from_score(score);
    PredictionResult {
        probability: prob,
        risk_score: score,
        tier,
        message: format!("{:.1}% {}", prob * 100.0, tier.label()),
        advice: tier.advice().to_string(),
    }
}

/// Check that a probability can be classified
pub fn validate_probability(prob: f64) -> Result<f64> {
    if prob.is_finite() && (0.0..=1.0).contains(&prob) {
        Ok(prob)
    } else {
        Err(RiskError::Inference(format!("Probability {prob} is outside [0, 1]")))
    }
}
