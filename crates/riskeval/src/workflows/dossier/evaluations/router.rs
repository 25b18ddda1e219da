use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::workflows::dossier::DossierId;

use super::authorization::{AccessPolicy, ActorContext};
use super::domain::{EvaluationId, EvaluationType, RiskLevel};
use super::repository::{AuditSink, EvaluationRepository, RepositoryError};
use super::service::{
    DraftUpdate, EvaluationService, EvaluationServiceError, FactorUpdate, ManualOverrideRequest,
};

/// Router builder exposing the evaluation workflow over HTTP. Request
/// bodies carry the acting user explicitly; session handling belongs to
/// whatever gateway fronts this service.
pub fn evaluation_router<R, A, P>(service: Arc<EvaluationService<R, A, P>>) -> Router
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    Router::new()
        .route(
            "/api/v1/dossiers/:dossier_id/evaluations",
            post(start_handler::<R, A, P>).get(history_handler::<R, A, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id",
            get(status_handler::<R, A, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/draft",
            put(draft_handler::<R, A, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/override",
            post(override_handler::<R, A, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/submit",
            post(submit_handler::<R, A, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/approve",
            post(approve_handler::<R, A, P>),
        )
        .route(
            "/api/v1/evaluations/:evaluation_id/reject",
            post(reject_handler::<R, A, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartEvaluationRequest {
    pub(crate) actor: ActorContext,
    pub(crate) evaluation_type: EvaluationType,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftRequest {
    pub(crate) actor: ActorContext,
    #[serde(default)]
    pub(crate) factors: Vec<FactorUpdate>,
    #[serde(default)]
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverrideRequest {
    pub(crate) actor: ActorContext,
    pub(crate) level: RiskLevel,
    pub(crate) justification: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorRequest {
    pub(crate) actor: ActorContext,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    pub(crate) actor: ActorContext,
    pub(crate) reason: String,
}

pub(crate) async fn start_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(dossier_id): Path<String>,
    axum::Json(request): axum::Json<StartEvaluationRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    match service.start_evaluation(
        &request.actor,
        DossierId(dossier_id),
        request.evaluation_type,
        Utc::now(),
    ) {
        Ok(evaluation) => {
            (StatusCode::CREATED, axum::Json(evaluation.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(dossier_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    let dossier_id = DossierId(dossier_id);
    match service.dossier_history(&dossier_id) {
        Ok(summaries) => (
            StatusCode::OK,
            axum::Json(json!({
                "dossier_id": dossier_id.0,
                "evaluations": summaries,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    match service.evaluation(&EvaluationId(evaluation_id)) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn draft_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<DraftRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    let update = DraftUpdate {
        factors: request.factors,
        comments: request.comments,
    };
    match service.save_draft(
        &request.actor,
        &EvaluationId(evaluation_id),
        update,
        Utc::now(),
    ) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn override_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<OverrideRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    let override_request = ManualOverrideRequest {
        level: request.level,
        justification: request.justification,
    };
    match service.apply_manual_override(
        &request.actor,
        &EvaluationId(evaluation_id),
        override_request,
        Utc::now(),
    ) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    match service.submit(&request.actor, &EvaluationId(evaluation_id), Utc::now()) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    match service.approve(&request.actor, &EvaluationId(evaluation_id), Utc::now()) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R, A, P>(
    State(service): State<Arc<EvaluationService<R, A, P>>>,
    Path(evaluation_id): Path<String>,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    match service.reject(
        &request.actor,
        &EvaluationId(evaluation_id),
        &request.reason,
        Utc::now(),
    ) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map workflow failures to HTTP statuses. Validation and authorization
/// messages pass through verbatim so the reviewer sees the exact missing
/// factors or denied action.
fn error_response(error: EvaluationServiceError) -> Response {
    let status = match &error {
        EvaluationServiceError::Validation(_)
        | EvaluationServiceError::Factor(_)
        | EvaluationServiceError::MissingRejectionReason => StatusCode::UNPROCESSABLE_ENTITY,
        EvaluationServiceError::Authorization(_) => StatusCode::FORBIDDEN,
        EvaluationServiceError::InvalidTransition(_) => StatusCode::CONFLICT,
        EvaluationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EvaluationServiceError::Scoring(_)
        | EvaluationServiceError::Repository(_)
        | EvaluationServiceError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
