//! Predictions file written after training.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt8Array};
use arrow::csv::Writer;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::util::safe_create_file;
use crate::error::{Result, RiskError};
use crate::training::dataset::{Column, TrainingTable};
use crate::training::evaluate::ProbabilityBand;
use crate::utils::logging::log_operation_complete;

/// Column holding the predicted probability
pub const PROBABILITY_COLUMN: &str = "Predicted_Probability";
/// Column holding the 0/1 prediction
pub const STATUS_COLUMN: &str = "Predicted_Status";
/// Column holding the probability band
pub const RISK_LEVEL_COLUMN: &str = "Diabetes_Risk_Level";

/// Build a record batch of every table column plus the three prediction columns
pub fn predictions_batch(table: &TrainingTable, probabilities: &[f64], predictions: &[u8]) -> Result<RecordBatch> {
    if probabilities.len() != table.rows() || predictions.len() != table.rows() {
        return Err(RiskError::Dataset(format!(
            "{} rows but {} probabilities and {} predictions",
            table.rows(),
            probabilities.len(),
            predictions.len()
        )));
    }

    let mut fields = Vec::with_capacity(table.column_names().len() + 3);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());

    for name in table.column_names() {
        let Some(column) = table.column(name) else {
            continue;
        };
        match column {
            Column::Numeric(values) => {
                fields.push(Field::new(name, DataType::Float64, false));
                arrays.push(Arc::new(Float64Array::from(values.clone())));
            }
            Column::Categorical(values) => {
                fields.push(Field::new(name, DataType::Utf8, false));
                arrays.push(Arc::new(StringArray::from_iter_values(values)));
            }
        }
    }

    fields.push(Field::new(PROBABILITY_COLUMN, DataType::Float64, false));
    arrays.push(Arc::new(Float64Array::from(probabilities.to_vec())));
    fields.push(Field::new(STATUS_COLUMN, DataType::UInt8, false));
    arrays.push(Arc::new(UInt8Array::from(predictions.to_vec())));
    fields.push(Field::new(RISK_LEVEL_COLUMN, DataType::Utf8, false));
    arrays.push(Arc::new(StringArray::from_iter_values(
        probabilities.iter().map(|&p| ProbabilityBand::from_probability(p).label()),
    )));

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Write the predictions CSV with a header row
pub fn write_predictions(path: &Path, table: &TrainingTable, probabilities: &[f64], predictions: &[u8]) -> Result<()> {
    let batch = predictions_batch(table, probabilities, predictions)?;
    let file = safe_create_file(path, "writing predictions")?;
    let mut writer = Writer::new(BufWriter::new(file));
    writer.write(&batch)?;
    writer.into_inner().flush()?;
    log_operation_complete("wrote", path, batch.num_rows(), None);
    Ok(())
}
