//! Request encoding against the persisted schema and scaler.

use crate::encoding::{StandardScaler, encode_aligned};
use crate::error::Result;
use crate::schema::{EncodedVector, FeatureSchema, RawRecord, ScaledVector};

/// Turns a raw request into the scaled vector the classifier expects
///
/// Borrowed from a [`crate::inference::ModelContext`]; it never refits or
/// changes the schema.
#[derive(Debug, Clone, Copy)]
pub struct ServingEncoder<'a> {
    schema: &'a FeatureSchema,
    scaler: &'a StandardScaler,
}

impl<'a> ServingEncoder<'a> {
    /// Bind an encoder to a schema and scaler
    #[must_use]
    pub const fn new(schema: &'a FeatureSchema, scaler: &'a StandardScaler) -> Self {
        Self { schema, scaler }
    }

    /// One-hot encode and reconcile a record, before scaling
    pub fn align(&self, record: &RawRecord) -> Result<EncodedVector> {
        let (aligned, report) = encode_aligned(record, self.schema)?;
        if !report.filled.is_empty() {
            log::debug!("Filled absent columns with 0: {:?}", report.filled);
        }
        if !report.dropped.is_empty() {
            log::debug!("Dropped columns unknown to the schema: {:?}", report.dropped);
        }
        Ok(aligned)
    }

    /// Align and scale a record
    pub fn encode(&self, record: &RawRecord) -> Result<ScaledVector> {
        let aligned = self.align(record)?;
        self.scaler.transform(&aligned.values()).map(ScaledVector)
    }
}
