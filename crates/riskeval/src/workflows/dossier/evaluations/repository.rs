use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::dossier::DossierId;

use super::domain::{
    EvaluationId, EvaluationStatus, EvaluationType, RiskEvaluation, RiskLevel,
};

/// Storage abstraction so the workflow can be exercised in isolation.
/// Records are append-only from the workflow's point of view: terminal
/// evaluations stay on file forever and re-assessment inserts the next
/// version for the dossier.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: RiskEvaluation) -> Result<RiskEvaluation, RepositoryError>;
    fn update(&self, evaluation: RiskEvaluation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<RiskEvaluation>, RepositoryError>;
    fn history(&self, dossier_id: &DossierId) -> Result<Vec<EvaluationSummary>, RepositoryError>;
    fn latest_version(&self, dossier_id: &DossierId) -> Result<Option<u32>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("evaluation already exists")]
    Conflict,
    #[error("evaluation not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact listing row for a dossier's evaluation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub evaluation_id: EvaluationId,
    pub version: u32,
    pub evaluation_type: EvaluationType,
    pub status: EvaluationStatus,
    pub total_score: u32,
    pub final_risk_level: RiskLevel,
    pub evaluator_name: String,
    pub created_at: DateTime<Utc>,
}

impl EvaluationSummary {
    pub fn of(evaluation: &RiskEvaluation) -> Self {
        Self {
            evaluation_id: evaluation.evaluation_id.clone(),
            version: evaluation.version,
            evaluation_type: evaluation.evaluation_type,
            status: evaluation.status,
            total_score: evaluation.total_score,
            final_risk_level: evaluation.final_risk_level,
            evaluator_name: evaluation.evaluator_name.clone(),
            created_at: evaluation.created_at,
        }
    }
}

/// Immutable trail entry emitted on every successful transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub evaluation_id: EvaluationId,
    pub from_status: EvaluationStatus,
    pub to_status: EvaluationStatus,
    pub actor_id: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// Trail storage is delegated to the host; the workflow only defines the
/// event shape and when events fire.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}
