//! The sixteen clinical and lifestyle input fields.

use std::fmt;
use std::str::FromStr;

use crate::error::RiskError;

/// One of the named input fields collected per patient
///
/// The declaration order is the canonical column order used for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClinicalField {
    /// Age in years
    Age,
    /// Body mass index
    Bmi,
    /// Fasting blood glucose (mg/dL)
    BloodGlucose,
    /// Blood pressure (mmHg)
    BloodPressure,
    /// Glycated haemoglobin (%)
    HbA1c,
    /// Insulin level
    InsulinLevel,
    /// Skin fold thickness
    SkinThickness,
    /// Number of pregnancies
    Pregnancies,
    /// Family history of diabetes
    FamilyHistory,
    /// Physical activity level
    PhysicalActivity,
    /// Smoking status
    SmokingStatus,
    /// Alcohol intake
    AlcoholIntake,
    /// Diet type
    DietType,
    /// Cholesterol level
    Cholesterol,
    /// Triglycerides
    Triglycerides,
    /// Waist ratio
    WaistRatio,
}

/// Number of input fields
pub const FIELD_COUNT: usize = 16;

impl ClinicalField {
    /// All fields in canonical order
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::Age,
        Self::Bmi,
        Self::BloodGlucose,
        Self::BloodPressure,
        Self::HbA1c,
        Self::InsulinLevel,
        Self::SkinThickness,
        Self::Pregnancies,
        Self::FamilyHistory,
        Self::PhysicalActivity,
        Self::SmokingStatus,
        Self::AlcoholIntake,
        Self::DietType,
        Self::Cholesterol,
        Self::Triglycerides,
        Self::WaistRatio,
    ];

    /// Column / form name of the field, as used in datasets and requests
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Bmi => "BMI",
            Self::BloodGlucose => "Blood Glucose",
            Self::BloodPressure => "Blood Pressure",
            Self::HbA1c => "HbA1c",
            Self::InsulinLevel => "Insulin Level",
            Self::SkinThickness => "Skin thickness",
            Self::Pregnancies => "Pregnancies",
            Self::FamilyHistory => "Family history",
            Self::PhysicalActivity => "Physical Activity",
            Self::SmokingStatus => "Smoking status",
            Self::AlcoholIntake => "Alcohol Intake",
            Self::DietType => "Diet_Type",
            Self::Cholesterol => "Cholesterol",
            Self::Triglycerides => "Triglycerides",
            Self::WaistRatio => "Waist ratio",
        }
    }

    /// Position of the field in canonical order
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a field by its column name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Names of all fields in canonical order
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.name()).collect()
    }
}

impl fmt::Display for ClinicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClinicalField {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| RiskError::Encoding(format!("Unknown clinical field '{s}'")))
    }
}
