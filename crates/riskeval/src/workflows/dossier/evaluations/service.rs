use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::dossier::DossierId;

use super::authorization::{AccessPolicy, Action, ActorContext, AuthorizationError};
use super::domain::{
    EvaluationId, EvaluationStatus, EvaluationType, FactorId, FactorUpdateError, ManualOverride,
    RiskEvaluation, RiskLevel,
};
use super::lifecycle::{self, InvalidStateTransition, TransitionError};
use super::repository::{
    AuditError, AuditEvent, AuditSink, EvaluationRepository, EvaluationSummary, RepositoryError,
};
use super::scoring::{ScoringEngine, ScoringError};
use super::validation::{self, ValidationError};

/// Service composing the scoring engine, access policy, repository, and
/// audit trail behind the evaluation workflow.
///
/// Every mutating call re-reads the record from the repository before
/// computing effects, so a transition's status precondition is checked
/// against the latest persisted state. Effects are computed on an
/// immutable copy and persisted in a single `update`; on any failure
/// nothing is applied.
pub struct EvaluationService<R, A, P> {
    repository: Arc<R>,
    audit: Arc<A>,
    policy: Arc<P>,
    engine: Arc<ScoringEngine>,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("ev-{id:06}"))
}

/// Draft edits applied in one batch. Factor updates replace the weight and
/// observation of the named factor; `comments` replaces the narrative when
/// present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftUpdate {
    #[serde(default)]
    pub factors: Vec<FactorUpdate>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorUpdate {
    pub factor_id: FactorId,
    pub weight: u8,
    #[serde(default)]
    pub observation: String,
}

/// Request to record a compliance officer's level adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualOverrideRequest {
    pub level: RiskLevel,
    pub justification: String,
}

impl<R, A, P> EvaluationService<R, A, P>
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>, policy: Arc<P>, engine: ScoringEngine) -> Self {
        Self {
            repository,
            audit,
            policy,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Open a new draft against a dossier. Allocates the next version so a
    /// re-assessment never revives or overwrites a prior record.
    pub fn start_evaluation(
        &self,
        actor: &ActorContext,
        dossier_id: DossierId,
        evaluation_type: EvaluationType,
        at: DateTime<Utc>,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        let version = self
            .repository
            .latest_version(&dossier_id)?
            .map_or(1, |latest| latest + 1);

        let draft = RiskEvaluation::draft(
            next_evaluation_id(),
            dossier_id,
            version,
            evaluation_type,
            actor.user_id.clone(),
            actor.display_name.clone(),
            at,
        );

        self.authorize(actor, Action::Create, &draft)?;
        let stored = self.repository.insert(draft)?;
        Ok(stored)
    }

    /// Apply factor and comment edits to a draft and refresh the derived
    /// classification.
    pub fn save_draft(
        &self,
        actor: &ActorContext,
        evaluation_id: &EvaluationId,
        update: DraftUpdate,
        at: DateTime<Utc>,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        let current = self.load(evaluation_id)?;
        self.authorize(actor, Action::Update, &current)?;

        if current.status != EvaluationStatus::Draft {
            return Err(InvalidStateTransition {
                action: Action::Update,
                status: current.status,
            }
            .into());
        }

        let mut next = current.clone();
        for factor in &update.factors {
            next = next.with_factor_weight(
                factor.factor_id,
                factor.weight,
                factor.observation.clone(),
            )?;
        }
        if let Some(comments) = update.comments {
            next = next.with_comments(comments);
        }

        let next = lifecycle::recompute_draft(&next, &self.engine)?;
        self.repository.update(next.clone())?;
        self.trail(&current, &next, actor, at, None)?;
        Ok(next)
    }

    /// Record a justified level adjustment on a draft. Gated behind the
    /// approval capability: overriding the computed classification is a
    /// compliance-officer power.
    pub fn apply_manual_override(
        &self,
        actor: &ActorContext,
        evaluation_id: &EvaluationId,
        request: ManualOverrideRequest,
        at: DateTime<Utc>,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        let current = self.load(evaluation_id)?;
        self.authorize(actor, Action::Approve, &current)?;

        if current.status != EvaluationStatus::Draft {
            return Err(InvalidStateTransition {
                action: Action::Update,
                status: current.status,
            }
            .into());
        }

        let next = current.with_manual_override(ManualOverride {
            level: request.level,
            applied_by: actor.user_id.clone(),
            justification: request.justification,
        });
        validation::validate_manual_override(&next)?;

        self.repository.update(next.clone())?;
        let justification = next
            .manual_override
            .as_ref()
            .map(|o| o.justification.clone());
        self.trail(&current, &next, actor, at, justification)?;
        Ok(next)
    }

    /// Move a draft to pending approval, freezing the computed score.
    pub fn submit(
        &self,
        actor: &ActorContext,
        evaluation_id: &EvaluationId,
        at: DateTime<Utc>,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        let current = self.load(evaluation_id)?;
        self.authorize(actor, Action::Submit, &current)?;

        let next = lifecycle::submit(&current, &self.engine)?;
        self.repository.update(next.clone())?;
        self.trail(&current, &next, actor, at, None)?;
        Ok(next)
    }

    pub fn approve(
        &self,
        actor: &ActorContext,
        evaluation_id: &EvaluationId,
        at: DateTime<Utc>,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        let current = self.load(evaluation_id)?;
        self.authorize(actor, Action::Approve, &current)?;

        let next = lifecycle::approve(&current, &actor.user_id, at)?;
        self.repository.update(next.clone())?;
        self.trail(&current, &next, actor, at, None)?;
        Ok(next)
    }

    pub fn reject(
        &self,
        actor: &ActorContext,
        evaluation_id: &EvaluationId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        let current = self.load(evaluation_id)?;
        self.authorize(actor, Action::Reject, &current)?;

        let next = lifecycle::reject(&current, reason, at)?;
        self.repository.update(next.clone())?;
        let justification = next.rejection_reason.clone();
        self.trail(&current, &next, actor, at, justification)?;
        Ok(next)
    }

    pub fn evaluation(
        &self,
        evaluation_id: &EvaluationId,
    ) -> Result<RiskEvaluation, EvaluationServiceError> {
        self.load(evaluation_id)
    }

    pub fn dossier_history(
        &self,
        dossier_id: &DossierId,
    ) -> Result<Vec<EvaluationSummary>, EvaluationServiceError> {
        Ok(self.repository.history(dossier_id)?)
    }

    fn load(&self, evaluation_id: &EvaluationId) -> Result<RiskEvaluation, EvaluationServiceError> {
        Ok(self
            .repository
            .fetch(evaluation_id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    fn authorize(
        &self,
        actor: &ActorContext,
        action: Action,
        evaluation: &RiskEvaluation,
    ) -> Result<(), AuthorizationError> {
        if self.policy.actor_can_perform(actor, action, evaluation) {
            Ok(())
        } else {
            Err(AuthorizationError {
                actor_id: actor.user_id.clone(),
                action,
            })
        }
    }

    fn trail(
        &self,
        before: &RiskEvaluation,
        after: &RiskEvaluation,
        actor: &ActorContext,
        at: DateTime<Utc>,
        justification: Option<String>,
    ) -> Result<(), AuditError> {
        self.audit.record(AuditEvent {
            evaluation_id: after.evaluation_id.clone(),
            from_status: before.status,
            to_status: after.status,
            actor_id: actor.user_id.clone(),
            occurred_at: at,
            justification,
        })
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    InvalidTransition(#[from] InvalidStateTransition),
    #[error("rejection requires a reason")]
    MissingRejectionReason,
    #[error(transparent)]
    Factor(#[from] FactorUpdateError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl From<TransitionError> for EvaluationServiceError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::Validation(inner) => Self::Validation(inner),
            TransitionError::InvalidState(inner) => Self::InvalidTransition(inner),
            TransitionError::Scoring(inner) => Self::Scoring(inner),
            TransitionError::MissingRejectionReason => Self::MissingRejectionReason,
        }
    }
}
