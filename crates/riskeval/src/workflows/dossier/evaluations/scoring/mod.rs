mod rules;
mod thresholds;

pub use rules::{average_score, max_possible_score, total_score, ScoringError};
pub use thresholds::ScoringThresholds;

use serde::{Deserialize, Serialize};

use super::domain::{RiskFactor, RiskLevel};

/// Stateless engine applying the classification thresholds to a factor
/// set. Pure and clock-free, so drafts can be re-scored on every edit and
/// the same engine finalizes the submission snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    thresholds: ScoringThresholds,
}

impl ScoringEngine {
    pub fn new(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    pub fn classify(&self, average_score: f64) -> RiskLevel {
        self.thresholds.classify(average_score)
    }

    pub fn summarize(&self, factors: &[RiskFactor]) -> Result<ScoreSummary, ScoringError> {
        let total = total_score(factors);
        let average = average_score(factors)?;

        Ok(ScoreSummary {
            total_score: total,
            average_score: average,
            max_possible_score: max_possible_score(factors),
            level: self.thresholds.classify(average),
        })
    }
}

/// Composite score derived from a factor set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_score: u32,
    pub average_score: f64,
    pub max_possible_score: u32,
    pub level: RiskLevel,
}
