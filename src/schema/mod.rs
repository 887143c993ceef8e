//! Input fields, raw records and the feature schema contract.
//!
//! The schema is the one piece both the training and the serving path depend
//! on: a row encoded for the model must carry exactly the schema's columns in
//! the schema's order.

pub mod encoded;
pub mod feature;
pub mod fields;
pub mod reconcile;
pub mod record;

// Re-export the main schema types and functions for easier access
pub use encoded::{EncodedVector, ScaledVector};
pub use feature::{FeatureSchema, dummy_column};
pub use fields::{ClinicalField, FIELD_COUNT};
pub use reconcile::{ReconciliationReport, check_row_against_schema, reconcile};
pub use record::{CoercedValue, RawRecord};
