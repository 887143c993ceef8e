use std::sync::Arc;

use diabetes_risk::schema::{ClinicalField, RawRecord};
use diabetes_risk::training::{TrainingTable, derive_features, encode_row, learn_schema};
use diabetes_risk::utils::test::{
    constant_probability_predictor, full_record, high_risk_record, low_risk_record, medium_risk_record,
    sample_schema, synthetic_dataset_csv,
};
use diabetes_risk::{LogisticRegression, ModelContext, RiskPredictor, RiskTier, StandardScaler, encode_aligned};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scaled_context() -> diabetes_risk::Result<ModelContext> {
    let schema = sample_schema()?;
    let width = schema.len();
    let mean = (0..width).map(|i| i as f64 * 1.5).collect();
    let scale = (0..width).map(|i| 1.0 + i as f64 / 7.0).collect();
    let coefficients = (0..width).map(|i| if i % 2 == 0 { 0.01 } else { -0.02 }).collect();
    ModelContext::from_parts(
        schema,
        StandardScaler::from_parts(mean, scale)?,
        LogisticRegression::from_parts(coefficients, 0.1)?,
    )
}

/// Encoding the same request twice yields bit-identical vectors
#[test]
fn test_encoding_is_deterministic() -> diabetes_risk::Result<()> {
    let context = scaled_context()?;
    let encoder = context.encoder();
    let first = encoder.encode(&full_record())?;
    let second = encoder.encode(&full_record())?;

    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(first.as_slice()), bits(second.as_slice()));
    assert_eq!(first.len(), context.schema().len());
    Ok(())
}

/// A dataset row and the same values submitted as a request encode identically
#[test]
fn test_training_and_serving_encode_rows_identically() -> diabetes_risk::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dataset.csv");
    std::fs::write(&path, synthetic_dataset_csv(12, None))?;

    let mut table = TrainingTable::read_csv(&path)?;
    derive_features(&mut table)?;
    let schema = learn_schema(&table)?;

    for row in 0..table.rows() {
        let from_training = encode_row(&table, row, &schema)?;
        let request = RawRecord::from_pairs(
            ClinicalField::ALL
                .iter()
                .filter_map(|f| table.column(f.name()).map(|c| (f.name(), c.text(row)))),
        );
        let (from_serving, _) = encode_aligned(&request, &schema)?;
        assert_eq!(from_training, from_serving, "row {row}");
    }
    Ok(())
}

/// The predictor combines probability and clinical flags into the expected tiers
#[test]
fn test_predictor_tiers() -> diabetes_risk::Result<()> {
    let predictor = constant_probability_predictor(0.5)?;

    assert_eq!(predictor.predict(&high_risk_record())?.tier, RiskTier::High);
    assert_eq!(predictor.predict(&medium_risk_record())?.tier, RiskTier::Medium);
    // probability 0.5 adds two points on its own
    assert_eq!(predictor.predict(&low_risk_record())?.tier, RiskTier::None);
    Ok(())
}

/// Batch results come back in request order, failures included
#[test]
fn test_batch_keeps_order() -> diabetes_risk::Result<()> {
    let predictor = constant_probability_predictor(0.1)?;
    let records = vec![
        high_risk_record(),
        low_risk_record().with(ClinicalField::Bmi, "tall"),
        medium_risk_record(),
        low_risk_record(),
    ];

    let results = predictor.predict_batch(&records);
    assert_eq!(results.len(), 4);
    assert!(matches!(&results[0], Ok(r) if r.tier == RiskTier::High));
    assert!(results[1].is_err());
    assert!(matches!(&results[2], Ok(r) if r.risk_score == 2));
    assert!(matches!(&results[3], Ok(r) if r.tier == RiskTier::None));
    Ok(())
}

/// One context can serve many threads at once
#[test]
fn test_shared_context_across_threads() -> diabetes_risk::Result<()> {
    let predictor = RiskPredictor::new(Arc::new(scaled_context()?));
    let expected = predictor.predict(&full_record())?;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let predictor = predictor.clone();
            std::thread::spawn(move || predictor.predict(&full_record()))
        })
        .collect();
    for handle in handles {
        let result = handle.join().expect("worker thread panicked")?;
        assert_eq!(result, expected);
    }
    Ok(())
}

proptest! {
    /// Arbitrary numeric requests encode deterministically and to the schema width
    #[test]
    fn prop_numeric_requests_are_deterministic(
        age in 0u32..100,
        bmi in 10.0f64..60.0,
        glucose in 40.0f64..300.0,
        hba1c in 3.0f64..15.0,
    ) {
        let context = scaled_context().unwrap();
        let record = RawRecord::new()
            .with(ClinicalField::Age, age.to_string())
            .with(ClinicalField::Bmi, bmi.to_string())
            .with(ClinicalField::BloodGlucose, glucose.to_string())
            .with(ClinicalField::HbA1c, hba1c.to_string());

        let a = context.encoder().encode(&record).unwrap();
        let b = context.encoder().encode(&record).unwrap();
        prop_assert_eq!(a.len(), context.schema().len());
        prop_assert_eq!(a, b);
    }
}
