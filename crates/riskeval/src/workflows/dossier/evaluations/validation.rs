use super::domain::{FactorId, RiskEvaluation, RiskFactor};

/// Validation errors gating the exit from draft. Messages carry the exact
/// offending factor names because compliance reviewers must see them
/// verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("mandatory observations missing for: {}", join_factor_names(.factors))]
    MissingObservations { factors: Vec<FactorId> },
    #[error("manual override requires a justification")]
    MissingOverrideJustification,
}

fn join_factor_names(factors: &[FactorId]) -> String {
    factors
        .iter()
        .map(|factor| factor.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Factors whose weight demands an observation that is still blank.
/// Restartable filter with no side effects; calling it twice over the same
/// slice yields the same factors.
pub fn missing_observations(factors: &[RiskFactor]) -> impl Iterator<Item = &RiskFactor> {
    factors
        .iter()
        .filter(|factor| factor.requires_observation() && !factor.has_observation())
}

pub fn validate_for_submission(evaluation: &RiskEvaluation) -> Result<(), ValidationError> {
    let factors: Vec<FactorId> = missing_observations(&evaluation.risk_factors)
        .map(|factor| factor.factor_id)
        .collect();

    if factors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingObservations { factors })
    }
}

pub fn validate_manual_override(evaluation: &RiskEvaluation) -> Result<(), ValidationError> {
    match &evaluation.manual_override {
        Some(o) if o.justification.trim().is_empty() => {
            Err(ValidationError::MissingOverrideJustification)
        }
        _ => Ok(()),
    }
}
