//! In-memory training table read from CSV with arrow.

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::error::util::safe_open_file;
use crate::error::{Result, RiskError};
use crate::schema::{ClinicalField, RawRecord};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Name of the label column
pub const TARGET_COLUMN: &str = "Diabetes_Status";

/// One column of the training table
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric or boolean source column; nulls read as zero
    Numeric(Vec<f64>),
    /// Any other source column as text; nulls read as empty strings
    Categorical(Vec<String>),
}

impl Column {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    /// Whether the column has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` as request text
    ///
    /// Numbers use their shortest round-trip representation, so parsing the
    /// text back yields the identical `f64`.
    #[must_use]
    pub fn text(&self, row: usize) -> String {
        match self {
            Self::Numeric(v) => v[row].to_string(),
            Self::Categorical(v) => v[row].clone(),
        }
    }

    fn from_array(array: &ArrayRef) -> Result<Self> {
        let data_type = array.data_type();
        if data_type.is_numeric() || *data_type == DataType::Boolean {
            let values = cast(array, &DataType::Float64)?;
            Ok(Self::Numeric(
                values
                    .as_primitive::<Float64Type>()
                    .iter()
                    .map(|v| v.unwrap_or(0.0))
                    .collect(),
            ))
        } else {
            let values = cast(array, &DataType::Utf8)?;
            Ok(Self::Categorical(
                values
                    .as_string::<i32>()
                    .iter()
                    .map(|v| v.unwrap_or_default().to_string())
                    .collect(),
            ))
        }
    }

    fn extend(&mut self, other: Self) -> Result<()> {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.extend(b),
            (Self::Categorical(a), Self::Categorical(b)) => a.extend(b),
            _ => {
                return Err(RiskError::Dataset(
                    "Column type changed between record batches".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Column-oriented training data keyed by column name
///
/// Keeps the original column order so the predictions file mirrors the input.
#[derive(Debug, Clone, Default)]
pub struct TrainingTable {
    rows: usize,
    order: Vec<String>,
    columns: FxHashMap<String, Column>,
}

impl TrainingTable {
    /// Create an empty table with a fixed number of rows
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Read a CSV file with a header row, inferring column types over the whole file
    pub fn read_csv(path: &Path) -> Result<Self> {
        let start = Instant::now();
        log_operation_start("Reading training dataset", path);

        let mut file = safe_open_file(path, "training dataset")?;
        let (schema, _) = Format::default().with_header(true).infer_schema(&mut file, None)?;
        file.rewind()?;

        let reader = ReaderBuilder::new(Arc::new(schema)).with_header(true).build(file)?;
        let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        let table = Self::from_batches(&batches)?;

        log_operation_complete("read", path, table.rows(), Some(start.elapsed()));
        Ok(table)
    }

    /// Build a table from record batches sharing one schema
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let Some(first) = batches.first() else {
            return Err(RiskError::Dataset("Training dataset has no rows".to_string()));
        };

        let schema = first.schema();
        let mut table = Self::new(0);
        for (i, field) in schema.fields().iter().enumerate() {
            let mut column = Column::from_array(first.column(i))?;
            for batch in &batches[1..] {
                column.extend(Column::from_array(batch.column(i))?)?;
            }
            table.order.push(field.name().clone());
            table.columns.insert(field.name().clone(), column);
        }
        table.rows = batches.iter().map(RecordBatch::num_rows).sum();

        if table.rows == 0 {
            return Err(RiskError::Dataset("Training dataset has no rows".to_string()));
        }
        Ok(table)
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Column names in insertion order
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.order
    }

    /// Whether a column exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Add or replace a column; new columns are appended to the order
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        debug_assert_eq!(column.len(), self.rows, "column '{name}' has the wrong length");
        if !self.columns.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.columns.insert(name, column);
    }

    /// Remove a column
    pub fn remove(&mut self, name: &str) -> Option<Column> {
        self.order.retain(|n| n != name);
        self.columns.remove(name)
    }

    /// Raw record for one row built from the sixteen feature columns
    #[must_use]
    pub fn record(&self, row: usize) -> RawRecord {
        let mut record = RawRecord::new();
        for field in ClinicalField::ALL {
            if let Some(column) = self.column(field.name()) {
                record.set(field, column.text(row));
            }
        }
        record
    }

    /// Text values of a feature column, if it is categorical
    #[must_use]
    pub fn categorical_values(&self, field: ClinicalField) -> Option<&[String]> {
        match self.column(field.name()) {
            Some(Column::Categorical(values)) => Some(values),
            _ => None,
        }
    }

    /// Binary labels from the target column
    ///
    /// A non-zero number, or `yes`, `true`, `positive`, `diabetic` in any
    /// case, is the positive class.
    pub fn labels(&self) -> Result<Vec<u8>> {
        match self.column(TARGET_COLUMN) {
            Some(Column::Numeric(values)) => Ok(values.iter().map(|&v| u8::from(v != 0.0)).collect()),
            Some(Column::Categorical(values)) => Ok(values.iter().map(|v| u8::from(is_positive_label(v))).collect()),
            None => Err(RiskError::Dataset(format!(
                "Target column '{TARGET_COLUMN}' is missing"
            ))),
        }
    }
}

fn is_positive_label(raw: &str) -> bool {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<f64>() {
        return v != 0.0;
    }
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "yes" | "true" | "positive" | "diabetic"
    )
}
