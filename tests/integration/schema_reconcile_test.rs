use diabetes_risk::encoding::encode_aligned;
use diabetes_risk::schema::{ClinicalField, RawRecord};
use diabetes_risk::utils::test::{full_record, sample_schema};
use pretty_assertions::assert_eq;

/// The aligned row lists exactly the schema's columns, in order
#[test]
fn test_aligned_columns_equal_schema() -> diabetes_risk::Result<()> {
    let schema = sample_schema()?;
    let (aligned, _) = encode_aligned(&full_record(), &schema)?;

    let columns: Vec<&str> = aligned.columns().collect();
    let expected: Vec<&str> = schema.columns().iter().map(String::as_str).collect();
    assert_eq!(columns, expected);
    assert_eq!(aligned.len(), schema.len());
    Ok(())
}

/// An empty request aligns to all zeros
#[test]
fn test_empty_request_is_all_zero() -> diabetes_risk::Result<()> {
    let schema = sample_schema()?;
    let (aligned, report) = encode_aligned(&RawRecord::new(), &schema)?;

    assert!(aligned.values().iter().all(|v| *v == 0.0));
    assert!(report.dropped.is_empty());
    // numeric fields are present as zero; only the dummy columns need filling
    assert!(report.filled.iter().all(|c| c.contains('_')));
    Ok(())
}

/// Blank numeric fields coerce to zero instead of failing
#[test]
fn test_blank_numeric_field_is_zero() -> diabetes_risk::Result<()> {
    let schema = sample_schema()?;
    let record = full_record().with(ClinicalField::Cholesterol, "   ");
    let (aligned, _) = encode_aligned(&record, &schema)?;
    assert_eq!(aligned.get("Cholesterol"), Some(0.0));
    Ok(())
}

/// Reference and unseen levels both leave every dummy of the field at zero
#[test]
fn test_reference_and_unseen_levels() -> diabetes_risk::Result<()> {
    let schema = sample_schema()?;
    let dummies = |record: &RawRecord| -> diabetes_risk::Result<Vec<f64>> {
        let (aligned, _) = encode_aligned(record, &schema)?;
        Ok(aligned
            .iter()
            .filter(|(c, _)| c.starts_with("Diet_Type_"))
            .map(|(_, v)| v)
            .collect())
    };

    let reference = full_record().with(ClinicalField::DietType, "Non-Vegetarian");
    let unseen = full_record().with(ClinicalField::DietType, "Carnivore");
    let known = full_record().with(ClinicalField::DietType, "Vegan");

    assert_eq!(dummies(&reference)?, vec![0.0, 0.0]);
    assert_eq!(dummies(&unseen)?, vec![0.0, 0.0]);
    assert_eq!(dummies(&known)?, vec![1.0, 0.0]);
    Ok(())
}

/// Text in a numeric field is dropped and the numeric column falls back to zero
#[test]
fn test_text_in_numeric_field() -> diabetes_risk::Result<()> {
    let schema = sample_schema()?;
    let record = full_record().with(ClinicalField::Triglycerides, "elevated");
    let (aligned, report) = encode_aligned(&record, &schema)?;

    assert_eq!(aligned.get("Triglycerides"), Some(0.0));
    assert_eq!(report.dropped, vec!["Triglycerides_elevated".to_string()]);
    assert!(report.filled.contains(&"Triglycerides".to_string()));
    Ok(())
}

/// A non-finite number cannot be encoded
#[test]
fn test_non_finite_value_is_rejected() -> diabetes_risk::Result<()> {
    let schema = sample_schema()?;
    let record = full_record().with(ClinicalField::Age, "NaN");
    assert!(matches!(
        encode_aligned(&record, &schema),
        Err(diabetes_risk::RiskError::Encoding(_))
    ));
    Ok(())
}
