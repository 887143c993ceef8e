//! The persisted, ordered feature schema.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::schema::fields::ClinicalField;

/// Ordered post-encoding column names expected by the scaler and model
///
/// Fixed at training time and loaded unchanged at serving time. Alongside the
/// column list it records the full level list of every categorical field; the
/// first level of each list is the dropped reference level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
    #[serde(default)]
    categorical_levels: BTreeMap<String, Vec<String>>,
}

impl FeatureSchema {
    /// Build and validate a schema
    ///
    /// # Errors
    /// Fails when the column list is empty, contains duplicates, or a
    /// categorical entry does not name one of the input fields.
    pub fn new(columns: Vec<String>, categorical_levels: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let schema = Self {
            columns,
            categorical_levels,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Check the schema invariants
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(RiskError::Encoding("Feature schema has no columns".to_string()));
        }

        let mut seen = FxHashSet::default();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(RiskError::Encoding(format!(
                    "Feature schema lists column '{column}' more than once"
                )));
            }
        }

        for (field, levels) in &self.categorical_levels {
            if ClinicalField::from_name(field).is_none() {
                return Err(RiskError::Encoding(format!(
                    "Feature schema has levels for unknown field '{field}'"
                )));
            }
            if levels.is_empty() {
                return Err(RiskError::Encoding(format!(
                    "Categorical field '{field}' has no levels"
                )));
            }
        }
        Ok(())
    }

    /// Column names in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns (never true for a validated schema)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column
    #[must_use]
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Whether a field was one-hot encoded at training time
    #[must_use]
    pub fn is_categorical(&self, field: ClinicalField) -> bool {
        self.categorical_levels.contains_key(field.name())
    }

    /// All levels of a categorical field, reference level first
    #[must_use]
    pub fn levels(&self, field: ClinicalField) -> Option<&[String]> {
        self.categorical_levels.get(field.name()).map(Vec::as_slice)
    }

    /// The dropped reference level of a categorical field
    #[must_use]
    pub fn reference_level(&self, field: ClinicalField) -> Option<&str> {
        self.levels(field).and_then(|l| l.first()).map(String::as_str)
    }

    /// Categorical fields with their levels
    #[must_use]
    pub fn categorical_levels(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categorical_levels
    }
}

/// Name of the dummy column for one level of a categorical field
#[must_use]
pub fn dummy_column(field: ClinicalField, level: &str) -> String {
    format!("{}_{level}", field.name())
}
