//! Derived feature columns built from the raw dataset columns.
//!
//! Each of the sixteen features is produced by a named transform of a source
//! column. Some are approximations and two are placeholders that reuse an
//! unrelated measurement; those are reported every time training runs.

use std::fmt;

use crate::error::{Result, RiskError};
use crate::schema::ClinicalField;
use crate::training::dataset::{Column, TrainingTable};
use crate::utils::logging::log_warning;

/// How a derived column is computed from its source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Source column used unchanged under its own name
    Identity,
    /// Source column copied under the feature name
    Alias,
    /// Source column multiplied by a constant
    Scale(f64),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("identity"),
            Self::Alias => f.write_str("alias"),
            Self::Scale(factor) => write!(f, "x {factor}"),
        }
    }
}

/// A feature column derived from one source column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedColumn {
    /// Feature produced
    pub target: ClinicalField,
    /// Raw dataset column read
    pub source: &'static str,
    /// Transform applied to the source
    pub transform: Transform,
    placeholder: bool,
}

impl DerivedColumn {
    const fn new(target: ClinicalField, source: &'static str, transform: Transform) -> Self {
        Self {
            target,
            source,
            transform,
            placeholder: false,
        }
    }

    const fn placeholder(target: ClinicalField, source: &'static str) -> Self {
        Self {
            target,
            source,
            transform: Transform::Alias,
            placeholder: true,
        }
    }

    /// Whether the source is a stand-in for a measurement the dataset lacks
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    fn apply(&self, column: &Column) -> Result<Column> {
        match (self.transform, column) {
            (Transform::Identity | Transform::Alias, _) => Ok(column.clone()),
            (Transform::Scale(factor), Column::Numeric(values)) => {
                Ok(Column::Numeric(values.iter().map(|v| v * factor).collect()))
            }
            (Transform::Scale(_), Column::Categorical(_)) => Err(RiskError::Dataset(format!(
                "Cannot derive '{}' by scaling non-numeric column '{}'",
                self.target, self.source
            ))),
        }
    }
}

/// Derivations for all sixteen features, in canonical order
pub const DERIVED_COLUMNS: [DerivedColumn; 16] = [
    DerivedColumn::new(ClinicalField::Age, "Age", Transform::Identity),
    DerivedColumn::new(ClinicalField::Bmi, "BMI", Transform::Identity),
    DerivedColumn::new(ClinicalField::BloodGlucose, "Fasting_Blood_Sugar", Transform::Alias),
    DerivedColumn::placeholder(ClinicalField::BloodPressure, "Heart_Rate"),
    DerivedColumn::new(ClinicalField::HbA1c, "HBA1C", Transform::Alias),
    DerivedColumn::placeholder(ClinicalField::InsulinLevel, "Glucose_Tolerance_Test_Result"),
    DerivedColumn::new(ClinicalField::SkinThickness, "Waist_Hip_Ratio", Transform::Scale(50.0)),
    DerivedColumn::new(ClinicalField::Pregnancies, "Pregnancies", Transform::Identity),
    DerivedColumn::new(ClinicalField::FamilyHistory, "Family_History", Transform::Alias),
    DerivedColumn::new(ClinicalField::PhysicalActivity, "Physical_Activity", Transform::Alias),
    DerivedColumn::new(ClinicalField::SmokingStatus, "Smoking_Status", Transform::Alias),
    DerivedColumn::new(ClinicalField::AlcoholIntake, "Alcohol_Intake", Transform::Alias),
    DerivedColumn::new(ClinicalField::DietType, "Diet_Type", Transform::Identity),
    DerivedColumn::new(ClinicalField::Cholesterol, "Cholesterol_Level", Transform::Alias),
    DerivedColumn::new(ClinicalField::Triglycerides, "Cholesterol_Level", Transform::Scale(0.8)),
    DerivedColumn::new(ClinicalField::WaistRatio, "Waist_Hip_Ratio", Transform::Scale(100.0)),
];

/// Add every derivable feature column to the table
///
/// A feature already present under its own name is left alone. A derivation
/// whose source is absent is skipped; [`missing_features`] reports it later.
///
/// # Errors
/// Returns a dataset error when a scaling transform meets a non-numeric source.
pub fn apply_derivations(table: &mut TrainingTable) -> Result<()> {
    for derived in &DERIVED_COLUMNS {
        let target = derived.target.name();
        if table.contains(target) {
            continue;
        }
        let Some(source) = table.column(derived.source) else {
            log::debug!("Source column '{}' absent, cannot derive '{target}'", derived.source);
            continue;
        };
        let column = derived.apply(source)?;
        if derived.is_placeholder() {
            log_warning(
                &format!(
                    "'{target}' is a placeholder taken from '{}' and does not measure the named quantity",
                    derived.source
                ),
                None,
            );
        }
        log::debug!("Derived '{target}' from '{}' ({})", derived.source, derived.transform);
        table.insert(target, column);
    }
    Ok(())
}

/// Feature names absent from the table, in canonical order
#[must_use]
pub fn missing_features(table: &TrainingTable) -> Vec<String> {
    ClinicalField::ALL
        .into_iter()
        .map(ClinicalField::name)
        .filter(|name| !table.contains(name))
        .map(str::to_string)
        .collect()
}

/// Derive the features and fail if any is still missing
pub fn derive_features(table: &mut TrainingTable) -> Result<()> {
    apply_derivations(table)?;
    let missing = missing_features(table);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RiskError::MissingFeatures(missing))
    }
}
