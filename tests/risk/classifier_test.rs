use diabetes_risk::risk::{ClinicalIndicators, RiskTier, classify, glucose_points, risk_score};
use proptest::prelude::*;

fn indicators(blood_glucose: f64, hba1c: f64, bmi: f64, blood_pressure: f64, family_history: bool) -> ClinicalIndicators {
    ClinicalIndicators {
        blood_glucose,
        hba1c,
        bmi,
        blood_pressure,
        family_history,
    }
}

/// Every red flag raised at once
#[test]
fn test_all_flags_give_high_risk() {
    let result = classify(0.8, &indicators(130.0, 7.0, 32.0, 145.0, true));
    assert_eq!(result.risk_score, 10);
    assert_eq!(result.tier, RiskTier::High);
    assert_eq!(result.message, "80.0% High Risk");
    assert_eq!(result.class_name(), "high-risk");
    assert!(result.advice.starts_with("Your results show a high risk."));
}

/// Nothing above any threshold
#[test]
fn test_no_flags_give_no_risk() {
    let result = classify(0.2, &indicators(85.0, 5.0, 22.0, 110.0, false));
    assert_eq!(result.risk_score, 0);
    assert_eq!(result.tier, RiskTier::None);
    assert_eq!(result.message, "20.0% No Risk");
    assert_eq!(result.class_name(), "no-risk");
}

/// Moderate probability with prediabetic labs
#[test]
fn test_prediabetic_values_give_medium_risk() {
    let result = classify(0.5, &indicators(110.0, 5.8, 25.0, 120.0, false));
    assert_eq!(result.risk_score, 4);
    assert_eq!(result.tier, RiskTier::Medium);
    assert_eq!(result.message, "50.0% Medium Risk");
    assert_eq!(result.class_name(), "medium-risk");
    assert!(result.advice.starts_with("You’re at moderate risk."));
}

/// Clinical flags alone can reach the High tier even at a low probability
#[test]
fn test_clinical_flags_without_model_support() {
    let result = classify(0.05, &indicators(130.0, 6.6, 31.0, 100.0, false));
    assert_eq!(result.risk_score, 5);
    assert_eq!(result.tier, RiskTier::High);
    assert_eq!(result.message, "5.0% High Risk");
}

/// Glucose bands are inclusive on their lower bound
#[test]
fn test_glucose_boundaries() {
    assert_eq!(glucose_points(126.0), 2);
    assert_eq!(glucose_points(125.999), 1);
    assert_eq!(glucose_points(100.0), 1);
    assert_eq!(glucose_points(99.0), 0);
}

/// The same inputs always classify the same way
#[test]
fn test_classification_is_pure() {
    let input = indicators(118.0, 6.1, 29.9, 139.9, true);
    assert_eq!(classify(0.42, &input), classify(0.42, &input));
}

proptest! {
    /// Raising the probability never lowers the score
    #[test]
    fn prop_score_monotonic_in_probability(
        p in 0.0f64..=1.0,
        q in 0.0f64..=1.0,
        glucose in 50.0f64..200.0,
        hba1c in 4.0f64..10.0,
    ) {
        let (low, high) = if p <= q { (p, q) } else { (q, p) };
        let base = indicators(glucose, hba1c, 25.0, 120.0, false);
        prop_assert!(risk_score(low, &base) <= risk_score(high, &base));
    }

    /// Raising any clinical value never lowers the score
    #[test]
    fn prop_score_monotonic_in_clinical_values(
        prob in 0.0f64..=1.0,
        glucose in 50.0f64..200.0,
        hba1c in 4.0f64..10.0,
        bmi in 15.0f64..45.0,
        bp in 80.0f64..180.0,
        bump in 0.0f64..50.0,
        family in any::<bool>(),
    ) {
        let base = indicators(glucose, hba1c, bmi, bp, family);
        let score = risk_score(prob, &base);
        prop_assert!(score <= risk_score(prob, &indicators(glucose + bump, hba1c, bmi, bp, family)));
        prop_assert!(score <= risk_score(prob, &indicators(glucose, hba1c + bump / 10.0, bmi, bp, family)));
        prop_assert!(score <= risk_score(prob, &indicators(glucose, hba1c, bmi + bump, bp, family)));
        prop_assert!(score <= risk_score(prob, &indicators(glucose, hba1c, bmi, bp + bump, family)));
        prop_assert!(score <= risk_score(prob, &indicators(glucose, hba1c, bmi, bp, true)));
    }

    /// The tier always agrees with the score thresholds
    #[test]
    fn prop_tier_matches_score(
        prob in 0.0f64..=1.0,
        glucose in 50.0f64..200.0,
        hba1c in 4.0f64..10.0,
        family in any::<bool>(),
    ) {
        let result = classify(prob, &indicators(glucose, hba1c, 28.0, 130.0, family));
        let expected = match result.risk_score {
            s if s >= 5 => RiskTier::High,
            s if s >= 3 => RiskTier::Medium,
            _ => RiskTier::None,
        };
        prop_assert_eq!(result.tier, expected);
    }
}
