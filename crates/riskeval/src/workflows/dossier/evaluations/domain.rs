use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::dossier::DossierId;

/// Identifier wrapper for evaluation records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

/// Highest weight a single factor may carry.
pub const MAX_FACTOR_WEIGHT: u8 = 5;

/// Weight at and above which a written observation becomes mandatory.
pub const OBSERVATION_THRESHOLD: u8 = 4;

/// The seven dimensions of the risk-based methodology. The catalogue is
/// closed: factors are never added, removed, or duplicated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FactorId {
    Producto,
    Canal,
    Ubicacion,
    Fondos,
    Beneficiario,
    Pep,
    Controles,
}

impl FactorId {
    /// Canonical catalogue order used when building a fresh evaluation.
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Producto,
            Self::Canal,
            Self::Ubicacion,
            Self::Fondos,
            Self::Beneficiario,
            Self::Pep,
            Self::Controles,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Producto => "Producto",
            Self::Canal => "Canal de distribución",
            Self::Ubicacion => "Ubicación geográfica",
            Self::Fondos => "Origen de fondos",
            Self::Beneficiario => "Beneficiario final",
            Self::Pep => "Exposición PEP",
            Self::Controles => "Controles internos",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Producto => "Inherent risk of the insurance product under contract",
            Self::Canal => "Distribution channel through which the relationship originated",
            Self::Ubicacion => "Geographic exposure of the subject's residence and operations",
            Self::Fondos => "Transparency of the declared source of funds",
            Self::Beneficiario => "Clarity of the ultimate beneficiary of the policy",
            Self::Pep => "Politically exposed person indicators on the subject",
            Self::Controles => "Strength of the mitigating controls already in place",
        }
    }
}

/// A single weighted, observable risk dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor_id: FactorId,
    pub weight: u8,
    pub observation: String,
}

impl RiskFactor {
    pub fn unevaluated(factor_id: FactorId) -> Self {
        Self {
            factor_id,
            weight: 0,
            observation: String::new(),
        }
    }

    /// True iff the weight demands a written observation. Derived from the
    /// weight on every call so the two can never drift apart.
    pub fn requires_observation(&self) -> bool {
        self.weight >= OBSERVATION_THRESHOLD
    }

    pub fn has_observation(&self) -> bool {
        !self.observation.trim().is_empty()
    }
}

/// Classification buckets mandated by the risk-based methodology.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Bajo,
    Medio,
    Alto,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bajo => "bajo",
            Self::Medio => "medio",
            Self::Alto => "alto",
        }
    }
}

/// Why the evaluation was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationType {
    Initial,
    Periodic,
    EventDriven,
}

impl EvaluationType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Periodic => "periodic",
            Self::EventDriven => "event_driven",
        }
    }
}

/// Workflow status of an evaluation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Approved and Rejected records admit no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// A compliance officer's justified adjustment of the computed level. The
/// computed `final_risk_level` is left untouched; the override carries its
/// own level so both remain visible to auditors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub level: RiskLevel,
    pub applied_by: String,
    pub justification: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FactorUpdateError {
    #[error("weight {0} is outside the 0-5 scale")]
    WeightOutOfRange(u8),
}

/// One versioned assessment of a dossier. Records are append-only: a
/// re-evaluation inserts the next version instead of touching a prior one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvaluation {
    pub evaluation_id: EvaluationId,
    pub dossier_id: DossierId,
    pub version: u32,
    pub evaluation_type: EvaluationType,
    pub risk_factors: Vec<RiskFactor>,
    pub total_score: u32,
    pub final_risk_level: RiskLevel,
    pub status: EvaluationStatus,
    pub comments: String,
    pub evaluator_user_id: String,
    pub evaluator_name: String,
    pub manual_override: Option<ManualOverride>,
    pub created_at: DateTime<Utc>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl RiskEvaluation {
    /// Open a fresh draft carrying the full factor catalogue at weight 0.
    pub fn draft(
        evaluation_id: EvaluationId,
        dossier_id: DossierId,
        version: u32,
        evaluation_type: EvaluationType,
        evaluator_user_id: impl Into<String>,
        evaluator_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let risk_factors = FactorId::ordered()
            .into_iter()
            .map(RiskFactor::unevaluated)
            .collect();

        Self {
            evaluation_id,
            dossier_id,
            version,
            evaluation_type,
            risk_factors,
            total_score: 0,
            final_risk_level: RiskLevel::Bajo,
            status: EvaluationStatus::Draft,
            comments: String::new(),
            evaluator_user_id: evaluator_user_id.into(),
            evaluator_name: evaluator_name.into(),
            manual_override: None,
            created_at,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            rejected_at: None,
        }
    }

    pub fn factor(&self, factor_id: FactorId) -> Option<&RiskFactor> {
        self.risk_factors
            .iter()
            .find(|factor| factor.factor_id == factor_id)
    }

    /// Return a copy with the named factor's weight and observation
    /// replaced. The factor set itself never changes shape.
    pub fn with_factor_weight(
        &self,
        factor_id: FactorId,
        weight: u8,
        observation: impl Into<String>,
    ) -> Result<Self, FactorUpdateError> {
        if weight > MAX_FACTOR_WEIGHT {
            return Err(FactorUpdateError::WeightOutOfRange(weight));
        }

        let mut next = self.clone();
        if let Some(factor) = next
            .risk_factors
            .iter_mut()
            .find(|factor| factor.factor_id == factor_id)
        {
            factor.weight = weight;
            factor.observation = observation.into();
        }

        Ok(next)
    }

    pub fn with_comments(&self, comments: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.comments = comments.into();
        next
    }

    pub fn with_manual_override(&self, manual_override: ManualOverride) -> Self {
        let mut next = self.clone();
        next.manual_override = Some(manual_override);
        next
    }

    pub fn has_manual_override(&self) -> bool {
        self.manual_override.is_some()
    }

    /// Level the calling workflow should act on: the override when one was
    /// recorded, the computed classification otherwise.
    pub fn effective_risk_level(&self) -> RiskLevel {
        self.manual_override
            .as_ref()
            .map(|o| o.level)
            .unwrap_or(self.final_risk_level)
    }

    pub fn status_view(&self) -> EvaluationStatusView {
        let factors = self
            .risk_factors
            .iter()
            .map(|factor| FactorView {
                factor_id: factor.factor_id,
                name: factor.factor_id.name(),
                weight: factor.weight,
                requires_observation: factor.requires_observation(),
                observation: factor.observation.clone(),
            })
            .collect();

        let count = self.risk_factors.len() as u32;
        let average_score = if count == 0 {
            0.0
        } else {
            f64::from(self.total_score) / f64::from(count)
        };

        EvaluationStatusView {
            evaluation_id: self.evaluation_id.clone(),
            dossier_id: self.dossier_id.clone(),
            version: self.version,
            evaluation_type: self.evaluation_type.label(),
            status: self.status.label(),
            total_score: self.total_score,
            max_possible_score: count * u32::from(MAX_FACTOR_WEIGHT),
            average_score,
            final_risk_level: self.final_risk_level.label(),
            effective_risk_level: self.effective_risk_level().label(),
            has_manual_override: self.has_manual_override(),
            factors,
            approved_by: self.approved_by.clone(),
            rejection_reason: self.rejection_reason.clone(),
        }
    }
}

/// Sanitized per-factor row for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct FactorView {
    pub factor_id: FactorId,
    pub name: &'static str,
    pub weight: u8,
    pub requires_observation: bool,
    pub observation: String,
}

/// Sanitized representation of an evaluation's exposed state.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationStatusView {
    pub evaluation_id: EvaluationId,
    pub dossier_id: DossierId,
    pub version: u32,
    pub evaluation_type: &'static str,
    pub status: &'static str,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub average_score: f64,
    pub final_risk_level: &'static str,
    pub effective_risk_level: &'static str,
    pub has_manual_override: bool,
    pub factors: Vec<FactorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
