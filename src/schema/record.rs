//! Raw per-request input record and field coercion.

use serde_json::Value;

use crate::error::{Result, RiskError};
use crate::schema::fields::{ClinicalField, FIELD_COUNT};

/// A field value after coercion
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    /// Parsed number; empty or absent input coerces to `0.0`
    Number(f64),
    /// Non-numeric text, kept for categorical encoding
    Text(String),
}

/// Raw values for the sixteen input fields, exactly as submitted
///
/// Every field is optional; missing fields behave like empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: [Option<String>; FIELD_COUNT],
}

impl RawRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw value of a field
    pub fn set(&mut self, field: ClinicalField, value: impl Into<String>) {
        self.values[field.index()] = Some(value.into());
    }

    /// Builder-style variant of [`RawRecord::set`]
    #[must_use]
    pub fn with(mut self, field: ClinicalField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Raw value of a field, if one was submitted
    #[must_use]
    pub fn get(&self, field: ClinicalField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Raw value trimmed of surrounding whitespace; absent fields yield `""`
    #[must_use]
    pub fn raw_text(&self, field: ClinicalField) -> &str {
        self.get(field).map_or("", str::trim)
    }

    /// Build a record from a name-to-value mapping such as a submitted form
    ///
    /// Keys that are not one of the sixteen field names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            match ClinicalField::from_name(key.as_ref()) {
                Some(field) => record.set(field, value),
                None => log::debug!("Ignoring unknown request field '{}'", key.as_ref()),
            }
        }
        record
    }

    /// Build a record from a JSON object; numbers and booleans are taken as their text
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| RiskError::Encoding("Request must be a JSON object".to_string()))?;

        let pairs = object.iter().filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            Some((key.as_str(), text))
        });
        Ok(Self::from_pairs(pairs))
    }

    /// Coerce one field: numeric parse, empty to zero, otherwise keep the text
    ///
    /// # Errors
    /// Returns an encoding error for values that parse to a non-finite number
    /// (`NaN`, `inf`), which cannot be scaled.
    pub fn coerce(&self, field: ClinicalField) -> Result<CoercedValue> {
        let raw = self.raw_text(field);
        if raw.is_empty() {
            return Ok(CoercedValue::Number(0.0));
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(CoercedValue::Number(v)),
            Ok(_) => Err(RiskError::Encoding(format!(
                "Field '{field}' has non-finite value '{raw}'"
            ))),
            Err(_) => Ok(CoercedValue::Text(raw.to_string())),
        }
    }

    /// Iterate over `(field, raw value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ClinicalField, Option<&str>)> {
        ClinicalField::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}
