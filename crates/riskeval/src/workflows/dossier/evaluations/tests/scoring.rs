use super::common::*;
use crate::workflows::dossier::evaluations::domain::{FactorId, RiskLevel};
use crate::workflows::dossier::evaluations::scoring::{
    average_score, max_possible_score, total_score, ScoringError, ScoringThresholds,
};

#[test]
fn average_is_total_over_count_for_uniform_sets() {
    for weight in 0..=5u8 {
        let factors = factor_set(weight, "observación de control");
        let total = total_score(&factors);
        let average = average_score(&factors).expect("seven factors");

        assert_eq!(total, u32::from(weight) * 7);
        assert_eq!(average, f64::from(total) / 7.0);
    }
}

#[test]
fn average_holds_for_mixed_weights() {
    let mut factors = factor_set(1, "");
    factors[0].weight = 5;
    factors[0].observation = "producto de prima única de alto monto".to_string();
    factors[3].weight = 3;

    let total = total_score(&factors);
    assert_eq!(total, 5 + 1 + 1 + 3 + 1 + 1 + 1);
    let average = average_score(&factors).expect("seven factors");
    assert_eq!(average, f64::from(total) / 7.0);
}

#[test]
fn empty_factor_set_is_an_explicit_error() {
    match average_score(&[]) {
        Err(ScoringError::EmptyFactorSet) => {}
        other => panic!("expected empty factor set error, got {other:?}"),
    }
}

#[test]
fn classification_boundaries_are_inclusive_on_the_lower_level() {
    let engine = scoring_engine();

    assert_eq!(engine.classify(0.0), RiskLevel::Bajo);
    assert_eq!(engine.classify(1.5), RiskLevel::Bajo);
    assert_eq!(engine.classify(1.51), RiskLevel::Medio);
    assert_eq!(engine.classify(3.5), RiskLevel::Medio);
    assert_eq!(engine.classify(3.51), RiskLevel::Alto);
    assert_eq!(engine.classify(5.0), RiskLevel::Alto);
}

#[test]
fn max_possible_score_reflects_the_scale_ceiling() {
    let factors = factor_set(2, "");
    assert_eq!(max_possible_score(&factors), 35);
}

#[test]
fn summary_matches_the_standalone_rules() {
    let engine = scoring_engine();
    let factors = factor_set(4, "fondos de origen bancario");

    let summary = engine.summarize(&factors).expect("seven factors");

    assert_eq!(summary.total_score, 28);
    assert_eq!(summary.average_score, 4.0);
    assert_eq!(summary.max_possible_score, 35);
    assert_eq!(summary.level, RiskLevel::Alto);
    assert_eq!(summary.level, engine.classify(summary.average_score));
}

#[test]
fn threshold_constructor_falls_back_on_nonsense_inputs() {
    let default = ScoringThresholds::default();

    assert_eq!(ScoringThresholds::new(f64::NAN, 3.5), default);
    assert_eq!(ScoringThresholds::new(3.5, 1.5), default);
    assert_eq!(ScoringThresholds::new(-1.0, 3.5), default);

    let custom = ScoringThresholds::new(2.0, 4.0);
    assert_eq!(custom.bajo_max(), 2.0);
    assert_eq!(custom.medio_max(), 4.0);
}

#[test]
fn classification_ignores_factor_identity() {
    // Same weights assigned to different factors classify identically.
    let engine = scoring_engine();
    let mut left = factor_set(0, "");
    let mut right = factor_set(0, "");
    left[0].weight = 5;
    left[0].observation = "producto de prima única".to_string();
    let last = right.len() - 1;
    right[last].weight = 5;
    right[last].observation = "sin controles compensatorios".to_string();

    let left_summary = engine.summarize(&left).expect("seven factors");
    let right_summary = engine.summarize(&right).expect("seven factors");

    assert_eq!(left_summary.level, right_summary.level);
    assert_eq!(left_summary.total_score, right_summary.total_score);
    assert_eq!(left[0].factor_id, FactorId::Producto);
}
