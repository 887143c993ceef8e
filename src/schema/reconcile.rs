//! Alignment of an encoded row with the persisted feature schema.
//!
//! Every schema column absent from the row is filled with zero, every row
//! column unknown to the schema is dropped, and the result follows the schema's
//! column order exactly.

use crate::error::{Result, RiskError};
use crate::schema::encoded::EncodedVector;
use crate::schema::feature::FeatureSchema;

/// What reconciliation had to change to align a row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Schema columns missing from the row, filled with zero
    pub filled: Vec<String>,
    /// Row columns not in the schema, discarded
    pub dropped: Vec<String>,
}

impl ReconciliationReport {
    /// Whether the row already matched the schema's column set
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.filled.is_empty() && self.dropped.is_empty()
    }
}

/// Check which adaptations a row needs without building the aligned row
#[must_use]
pub fn check_row_against_schema(row: &EncodedVector, schema: &FeatureSchema) -> ReconciliationReport {
    let filled = schema
        .columns()
        .iter()
        .filter(|column| !row.contains(column))
        .cloned()
        .collect();
    let dropped = row
        .columns()
        .filter(|column| schema.index_of(column).is_none())
        .map(str::to_string)
        .collect();
    ReconciliationReport { filled, dropped }
}

/// Align a row to the schema
///
/// # Errors
/// Returns an encoding error if the aligned row is not fully numeric, i.e. a
/// kept value is not finite.
pub fn reconcile(row: &EncodedVector, schema: &FeatureSchema) -> Result<(EncodedVector, ReconciliationReport)> {
    let report = check_row_against_schema(row, schema);

    let mut aligned = EncodedVector::with_capacity(schema.len());
    for column in schema.columns() {
        let value = row.get(column).unwrap_or(0.0);
        if !value.is_finite() {
            return Err(RiskError::Encoding(format!(
                "Column '{column}' has non-finite value {value}"
            )));
        }
        aligned.insert(column.as_str(), value);
    }

    if aligned.len() != schema.len() {
        return Err(RiskError::Encoding(format!(
            "Aligned row has {} columns, schema expects {}",
            aligned.len(),
            schema.len()
        )));
    }

    if !report.is_exact() {
        log::debug!(
            "Reconciled row: filled {:?}, dropped {:?}",
            report.filled,
            report.dropped
        );
    }

    Ok((aligned, report))
}
