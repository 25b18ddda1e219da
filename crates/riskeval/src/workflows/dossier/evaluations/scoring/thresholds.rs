use serde::{Deserialize, Serialize};

use super::super::domain::RiskLevel;

const DEFAULT_BAJO_MAX: f64 = 1.5;
const DEFAULT_MEDIO_MAX: f64 = 3.5;

/// Classification boundaries. The defaults are the regulator-facing
/// thresholds: an average of exactly 1.5 classifies Bajo and exactly 3.5
/// classifies Medio, inclusive on the lower level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    bajo_max: f64,
    medio_max: f64,
}

impl ScoringThresholds {
    pub fn new(bajo_max: f64, medio_max: f64) -> Self {
        let sane = bajo_max.is_finite()
            && medio_max.is_finite()
            && bajo_max > 0.0
            && medio_max > bajo_max;

        if sane {
            Self { bajo_max, medio_max }
        } else {
            Self::default()
        }
    }

    pub fn bajo_max(&self) -> f64 {
        self.bajo_max
    }

    pub fn medio_max(&self) -> f64 {
        self.medio_max
    }

    pub fn classify(&self, average_score: f64) -> RiskLevel {
        if average_score <= self.bajo_max {
            RiskLevel::Bajo
        } else if average_score <= self.medio_max {
            RiskLevel::Medio
        } else {
            RiskLevel::Alto
        }
    }
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            bajo_max: DEFAULT_BAJO_MAX,
            medio_max: DEFAULT_MEDIO_MAX,
        }
    }
}
