use super::super::domain::{RiskFactor, MAX_FACTOR_WEIGHT};

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("cannot average an empty factor set")]
    EmptyFactorSet,
}

/// Sum of all factor weights.
pub fn total_score(factors: &[RiskFactor]) -> u32 {
    factors
        .iter()
        .map(|factor| u32::from(factor.weight))
        .sum()
}

/// Average weight across the factor set. The catalogue fixes the set at
/// seven entries, but the division guard stays explicit.
pub fn average_score(factors: &[RiskFactor]) -> Result<f64, ScoringError> {
    if factors.is_empty() {
        return Err(ScoringError::EmptyFactorSet);
    }

    Ok(f64::from(total_score(factors)) / factors.len() as f64)
}

/// Ceiling of the scale for display purposes; never used to classify.
pub fn max_possible_score(factors: &[RiskFactor]) -> u32 {
    factors.len() as u32 * u32::from(MAX_FACTOR_WEIGHT)
}
