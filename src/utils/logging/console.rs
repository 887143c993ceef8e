//! Console output utilities
//!
//! This module provides formatted console output for the command line tool.

use crate::schema::FeatureSchema;
use crate::training::evaluate::EvaluationSummary;

/// Print the columns and categorical levels of a feature schema
pub fn print_schema_info(schema: &FeatureSchema) {
    println!("Feature schema ({} columns):", schema.len());
    for (i, column) in schema.columns().iter().enumerate() {
        println!("  {i:>3}. {column}");
    }
    if !schema.categorical_levels().is_empty() {
        println!("Categorical fields (reference level first):");
        for (field, levels) in schema.categorical_levels() {
            println!("  - {field}: {}", levels.join(", "));
        }
    }
}

/// Print accuracy and risk band distribution after training
pub fn print_evaluation_summary(summary: &EvaluationSummary) {
    println!("Model accuracy: {:.2}%", summary.accuracy * 100.0);
    if let Some(holdout) = summary.holdout_accuracy {
        println!("Hold-out accuracy: {:.2}%", holdout * 100.0);
    }
    println!("Risk level distribution:");
    for (band, count) in &summary.band_counts {
        println!("  {band:<8} {count}");
    }
}
