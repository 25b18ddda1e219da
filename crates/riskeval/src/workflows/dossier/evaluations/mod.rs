//! Dossier risk evaluation: factor scoring, submission validation, and the
//! draft → pending-approval → approved/rejected lifecycle.
//!
//! Scoring and validation are pure functions; the lifecycle transitions
//! are atomic and clock-free, with timestamps and identity injected by the
//! caller. Persistence, audit storage, and the permission store live
//! behind traits so hosts can bring their own collaborators.

pub mod authorization;
pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use authorization::{AccessPolicy, Action, ActorContext, AuthorizationError, Role};
pub use domain::{
    EvaluationId, EvaluationStatus, EvaluationStatusView, EvaluationType, FactorId, FactorView,
    ManualOverride, RiskEvaluation, RiskFactor, RiskLevel, MAX_FACTOR_WEIGHT,
    OBSERVATION_THRESHOLD,
};
pub use lifecycle::{InvalidStateTransition, TransitionError};
pub use repository::{
    AuditError, AuditEvent, AuditSink, EvaluationRepository, EvaluationSummary, RepositoryError,
};
pub use router::evaluation_router;
pub use scoring::{ScoreSummary, ScoringEngine, ScoringError, ScoringThresholds};
pub use service::{
    DraftUpdate, EvaluationService, EvaluationServiceError, FactorUpdate, ManualOverrideRequest,
};
pub use validation::{
    missing_observations, validate_for_submission, validate_manual_override, ValidationError,
};
