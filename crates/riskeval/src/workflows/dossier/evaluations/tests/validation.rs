use super::common::*;
use crate::workflows::dossier::evaluations::domain::{FactorId, ManualOverride, RiskLevel};
use crate::workflows::dossier::evaluations::validation::{
    missing_observations, validate_for_submission, validate_manual_override, ValidationError,
};

#[test]
fn low_weights_never_require_observations() {
    let factors = factor_set(3, "");
    assert_eq!(missing_observations(&factors).count(), 0);
}

#[test]
fn blank_and_whitespace_observations_count_as_missing() {
    let mut factors = factor_set(1, "");
    factors[0].weight = 4;
    factors[1].weight = 5;
    factors[1].observation = "   ".to_string();
    factors[2].weight = 4;
    factors[2].observation = "expediente con antecedentes".to_string();

    let missing: Vec<FactorId> = missing_observations(&factors)
        .map(|factor| factor.factor_id)
        .collect();

    assert_eq!(missing, vec![FactorId::Producto, FactorId::Canal]);
}

#[test]
fn missing_observations_is_idempotent() {
    let mut factors = factor_set(1, "");
    factors[5].weight = 5;

    let first: Vec<FactorId> = missing_observations(&factors)
        .map(|factor| factor.factor_id)
        .collect();
    let second: Vec<FactorId> = missing_observations(&factors)
        .map(|factor| factor.factor_id)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first, vec![FactorId::Pep]);
}

#[test]
fn submission_error_names_the_offending_factors() {
    let evaluation = draft_evaluation()
        .with_factor_weight(FactorId::Pep, 5, "")
        .expect("weight in range");

    match validate_for_submission(&evaluation) {
        Err(ValidationError::MissingObservations { factors }) => {
            assert_eq!(factors, vec![FactorId::Pep]);
            let message = ValidationError::MissingObservations { factors }.to_string();
            assert!(message.contains("Exposición PEP"));
        }
        other => panic!("expected missing observations, got {other:?}"),
    }
}

#[test]
fn submission_passes_once_observations_are_filled() {
    let evaluation = draft_evaluation()
        .with_factor_weight(FactorId::Pep, 5, "cargo público declarado en 2024")
        .expect("weight in range");

    validate_for_submission(&evaluation).expect("no missing observations");
}

#[test]
fn override_justification_is_mandatory() {
    let evaluation = draft_evaluation().with_manual_override(ManualOverride {
        level: RiskLevel::Alto,
        applied_by: officer().user_id,
        justification: "  ".to_string(),
    });

    match validate_manual_override(&evaluation) {
        Err(ValidationError::MissingOverrideJustification) => {}
        other => panic!("expected missing justification, got {other:?}"),
    }
}

#[test]
fn absent_override_needs_no_justification() {
    validate_manual_override(&draft_evaluation()).expect("no override present");
}
