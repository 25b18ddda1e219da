use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use riskeval::workflows::dossier::evaluations::{
    evaluation_router, AccessPolicy, AuditSink, EvaluationRepository, EvaluationService,
};
use riskeval::workflows::dossier::{DossierDirectory, DossierId};

pub(crate) fn with_evaluation_routes<R, A, P>(
    service: Arc<EvaluationService<R, A, P>>,
) -> axum::Router
where
    R: EvaluationRepository + 'static,
    A: AuditSink + 'static,
    P: AccessPolicy + 'static,
{
    evaluation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/dossiers/:dossier_id",
            axum::routing::get(dossier_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Display lookup against the external dossier reference service; the
/// evaluation workflow itself never touches dossier data.
pub(crate) async fn dossier_endpoint(
    Path(dossier_id): Path<String>,
    Extension(directory): Extension<Arc<dyn DossierDirectory>>,
) -> impl IntoResponse {
    let dossier_id = DossierId(dossier_id);
    match directory.lookup(&dossier_id) {
        Ok(Some(info)) => (
            StatusCode::OK,
            Json(json!({
                "dossier_id": dossier_id.0,
                "display_name": info.display_name,
                "subject_type": info.subject_type,
                "subject_type_label": info.subject_type.label(),
            })),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "dossier not found" })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}
