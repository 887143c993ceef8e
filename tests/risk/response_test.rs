use diabetes_risk::InferenceResponse;
use diabetes_risk::schema::ClinicalField;
use diabetes_risk::utils::test::{constant_probability_predictor, high_risk_record, low_risk_record};
use serde_json::json;

/// A scored request serializes to message, advice and class name only
#[test]
fn test_success_response_shape() -> diabetes_risk::Result<()> {
    let predictor = constant_probability_predictor(0.8)?;
    let response = predictor.respond(&high_risk_record());

    let value = serde_json::to_value(&response)?;
    assert_eq!(value["message"], "80.0% High Risk");
    assert_eq!(value["class_name"], "high-risk");
    assert!(value["advice"].as_str().is_some_and(|a| a.contains("healthcare professional")));
    assert_eq!(value.as_object().map(serde_json::Map::len), Some(3));
    Ok(())
}

/// Text in a clinical threshold field becomes a structured error, not a panic
#[test]
fn test_bad_threshold_field_becomes_error_response() -> diabetes_risk::Result<()> {
    let predictor = constant_probability_predictor(0.2)?;
    let record = low_risk_record().with(ClinicalField::HbA1c, "unknown");
    let response = predictor.respond(&record);

    assert!(response.is_error());
    let InferenceResponse::Failure { error } = response else {
        panic!("expected an error response");
    };
    assert!(error.starts_with("Prediction error: "));
    assert!(error.contains("HbA1c"));
    Ok(())
}

/// JSON requests accept numbers, strings and unknown keys
#[test]
fn test_json_request() -> diabetes_risk::Result<()> {
    let predictor = constant_probability_predictor(0.2)?;
    let request = json!({
        "Blood Glucose": 110,
        "HbA1c": "5.8",
        "BMI": 25,
        "Blood Pressure": 120,
        "Family history": "No",
        "Favourite colour": "green"
    });

    let value = serde_json::to_value(predictor.respond_json(&request))?;
    assert_eq!(value["message"], "20.0% No Risk");
    Ok(())
}

/// A request that is not an object is rejected with an error response
#[test]
fn test_non_object_request() -> diabetes_risk::Result<()> {
    let predictor = constant_probability_predictor(0.2)?;
    let response = predictor.respond_json(&json!(["not", "an", "object"]));
    assert!(response.is_error());
    Ok(())
}
