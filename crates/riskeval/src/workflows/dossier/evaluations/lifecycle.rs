//! Pure transition functions for the evaluation state machine.
//!
//! Each function computes the successor record from an immutable snapshot,
//! or fails without touching anything. Permission checks and persistence
//! live in the service layer; timestamps are injected by the caller so the
//! transitions stay clock-free.

use chrono::{DateTime, Utc};

use super::authorization::Action;
use super::domain::{EvaluationStatus, RiskEvaluation};
use super::scoring::{ScoringEngine, ScoringError};
use super::validation::{self, ValidationError};

/// Raised when an action does not apply to the record's current status.
#[derive(Debug, thiserror::Error)]
#[error("cannot {} an evaluation in status {}", .action.label(), .status.label())]
pub struct InvalidStateTransition {
    pub action: Action,
    pub status: EvaluationStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("rejection requires a reason")]
    MissingRejectionReason,
}

fn require_status(
    evaluation: &RiskEvaluation,
    action: Action,
    expected: EvaluationStatus,
) -> Result<(), InvalidStateTransition> {
    if evaluation.status == expected {
        Ok(())
    } else {
        Err(InvalidStateTransition {
            action,
            status: evaluation.status,
        })
    }
}

/// Draft -> Draft: refresh the derived score and classification after an
/// edit. The preview uses the same engine that later freezes the
/// submission snapshot.
pub fn recompute_draft(
    evaluation: &RiskEvaluation,
    engine: &ScoringEngine,
) -> Result<RiskEvaluation, TransitionError> {
    require_status(evaluation, Action::Update, EvaluationStatus::Draft)?;

    let summary = engine.summarize(&evaluation.risk_factors)?;
    let mut next = evaluation.clone();
    next.total_score = summary.total_score;
    next.final_risk_level = summary.level;
    Ok(next)
}

/// Draft -> PendingApproval: validate the justification rules and freeze
/// the computed score into the record.
pub fn submit(
    evaluation: &RiskEvaluation,
    engine: &ScoringEngine,
) -> Result<RiskEvaluation, TransitionError> {
    require_status(evaluation, Action::Submit, EvaluationStatus::Draft)?;
    validation::validate_for_submission(evaluation)?;
    validation::validate_manual_override(evaluation)?;

    let summary = engine.summarize(&evaluation.risk_factors)?;
    let mut next = evaluation.clone();
    next.total_score = summary.total_score;
    next.final_risk_level = summary.level;
    next.status = EvaluationStatus::PendingApproval;
    Ok(next)
}

/// PendingApproval -> Approved.
pub fn approve(
    evaluation: &RiskEvaluation,
    approver_id: &str,
    at: DateTime<Utc>,
) -> Result<RiskEvaluation, TransitionError> {
    require_status(evaluation, Action::Approve, EvaluationStatus::PendingApproval)?;

    let mut next = evaluation.clone();
    next.status = EvaluationStatus::Approved;
    next.approved_by = Some(approver_id.to_string());
    next.approved_at = Some(at);
    Ok(next)
}

/// PendingApproval -> Rejected. The reason is stored verbatim; only a
/// blank reason is refused.
pub fn reject(
    evaluation: &RiskEvaluation,
    reason: &str,
    at: DateTime<Utc>,
) -> Result<RiskEvaluation, TransitionError> {
    require_status(evaluation, Action::Reject, EvaluationStatus::PendingApproval)?;

    if reason.trim().is_empty() {
        return Err(TransitionError::MissingRejectionReason);
    }

    let mut next = evaluation.clone();
    next.status = EvaluationStatus::Rejected;
    next.rejection_reason = Some(reason.to_string());
    next.rejected_at = Some(at);
    Ok(next)
}
