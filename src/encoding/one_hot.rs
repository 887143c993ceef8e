//! Drop-first one-hot encoding shared by training and serving.
//!
//! A categorical field with levels `[a, b, c]` (sorted) contributes the dummy
//! columns `<field>_b` and `<field>_c`; level `a` is the reference level and is
//! represented by all dummies being zero.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::error::Result;
use crate::schema::{ClinicalField, CoercedValue, EncodedVector, FeatureSchema, RawRecord, dummy_column};

/// Sorted, de-duplicated, non-empty levels of a categorical column
#[must_use]
pub fn learn_levels<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .sorted_unstable()
        .dedup()
        .map(str::to_string)
        .collect()
}

/// Build the feature schema from the categorical levels learned at training time
///
/// Numeric fields come first in canonical order, followed by the dummy columns
/// of each categorical field (canonical field order, sorted levels, reference
/// level dropped).
pub fn build_schema(categorical: &BTreeMap<ClinicalField, Vec<String>>) -> Result<FeatureSchema> {
    let numeric = ClinicalField::ALL
        .into_iter()
        .filter(|field| !categorical.contains_key(field))
        .map(|field| field.name().to_string());

    let dummies = categorical
        .iter()
        .flat_map(|(field, levels)| levels.iter().skip(1).map(|level| dummy_column(*field, level)));

    let columns = numeric.chain(dummies).collect_vec();
    let levels = categorical
        .iter()
        .map(|(field, levels)| (field.name().to_string(), levels.clone()))
        .collect();

    FeatureSchema::new(columns, levels)
}

/// Encode one record into an unaligned row
///
/// Fields the schema marks categorical emit `<field>_<value>` = 1 for a
/// non-empty value. Other fields are coerced; a number becomes the field's own
/// column, non-numeric text becomes a dummy column that reconciliation will
/// discard (leaving the numeric column at zero).
pub fn encode_record(record: &RawRecord, schema: &FeatureSchema) -> Result<EncodedVector> {
    let mut row = EncodedVector::with_capacity(schema.len());

    for field in ClinicalField::ALL {
        if schema.is_categorical(field) {
            let level = record.raw_text(field);
            if !level.is_empty() {
                row.insert(dummy_column(field, level), 1.0);
            }
            continue;
        }

        match record.coerce(field)? {
            CoercedValue::Number(value) => row.insert(field.name(), value),
            CoercedValue::Text(text) => {
                log::debug!("Numeric field '{field}' received text '{text}'");
                row.insert(dummy_column(field, &text), 1.0);
            }
        }
    }

    Ok(row)
}
