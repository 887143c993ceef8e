//! Row encoding: drop-first one-hot encoding and standard scaling.

pub mod one_hot;
pub mod scaler;

pub use one_hot::{build_schema, encode_record, learn_levels};
pub use scaler::StandardScaler;

use crate::error::Result;
use crate::schema::{EncodedVector, FeatureSchema, RawRecord, ReconciliationReport, reconcile};

/// Encode a record and align it with the schema in one step
///
/// This is the single row-encoding path; training and serving both go through it.
pub fn encode_aligned(record: &RawRecord, schema: &FeatureSchema) -> Result<(EncodedVector, ReconciliationReport)> {
    let row = encode_record(record, schema)?;
    reconcile(&row, schema)
}
