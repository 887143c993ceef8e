//! Test utilities shared by unit and integration tests
//!
//! This module provides sample requests, a synthetic dataset writer and
//! hand-built model contexts.

pub mod helpers;

// Re-export commonly used functions for convenience
pub use fixtures::{
    full_record, high_risk_record, low_risk_record, medium_risk_record, synthetic_dataset_csv,
    write_synthetic_dataset,
};
pub use helpers::{constant_probability_context, constant_probability_predictor, sample_schema};
