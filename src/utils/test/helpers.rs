//! Test helper functions
//!
//! Hand-built contexts whose probability is known in advance, so tests can
//! exercise the request pipeline without training.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::encoding::{StandardScaler, build_schema};
use crate::error::Result;
use crate::inference::{ModelContext, RiskPredictor};
use crate::model::LogisticRegression;
use crate::schema::{ClinicalField, FeatureSchema};

/// Schema with the four categorical fields used by the synthetic dataset
pub fn sample_schema() -> Result<FeatureSchema> {
    let levels = |values: &[&str]| values.iter().map(|v| (*v).to_string()).collect::<Vec<_>>();
    build_schema(&BTreeMap::from([
        (ClinicalField::FamilyHistory, levels(&["No", "Yes"])),
        (ClinicalField::PhysicalActivity, levels(&["High", "Low", "Moderate"])),
        (ClinicalField::SmokingStatus, levels(&["Current", "Former", "Never"])),
        (ClinicalField::DietType, levels(&["Non-Vegetarian", "Vegan", "Vegetarian"])),
    ]))
}

/// Context that scores every request with the same probability
///
/// Identity scaler and all-zero coefficients; the intercept is the logit of `prob`.
pub fn constant_probability_context(prob: f64) -> Result<ModelContext> {
    let schema = sample_schema()?;
    let width = schema.len();
    let scaler = StandardScaler::from_parts(vec![0.0; width], vec![1.0; width])?;
    let model = LogisticRegression::from_parts(vec![0.0; width], (prob / (1.0 - prob)).ln())?;
    ModelContext::from_parts(schema, scaler, model)
}

/// Predictor over [`constant_probability_context`]
pub fn constant_probability_predictor(prob: f64) -> Result<RiskPredictor> {
    Ok(RiskPredictor::new(Arc::new(constant_probability_context(prob)?)))
}
