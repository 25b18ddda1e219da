use crate::cli::ServeArgs;
use crate::infra::{
    default_scoring_engine, AppState, InMemoryAuditSink, InMemoryEvaluationRepository,
    RoleAccessPolicy, SeededDossierDirectory,
};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use riskeval::config::AppConfig;
use riskeval::error::AppError;
use riskeval::telemetry;
use riskeval::workflows::dossier::evaluations::EvaluationService;
use riskeval::workflows::dossier::DossierDirectory;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryEvaluationRepository::default());
    let audit = Arc::new(InMemoryAuditSink::default());
    let directory: Arc<dyn DossierDirectory> =
        Arc::new(SeededDossierDirectory::with_sample_dossiers());
    let evaluation_service = Arc::new(EvaluationService::new(
        repository,
        audit,
        Arc::new(RoleAccessPolicy),
        default_scoring_engine(),
    ));

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(Extension(directory))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "dossier risk evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
