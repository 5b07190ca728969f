use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDocuments, InMemoryIntakeForms, InMemoryProjects};
use crate::routes::with_operational_routes;
use axum::extract::DefaultBodyLimit;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use pa_intake::config::AppConfig;
use pa_intake::error::AppError;
use pa_intake::telemetry;
use pa_intake::workflows::assistant::{
    assistant_router, AiClientError, AnthropicClient, HttpChatRelay,
};
use pa_intake::workflows::intake::{intake_router, EvaluationConfig, IntakeFormService};
use pa_intake::workflows::projects::{
    document_router, project_router, DocumentService, LocalUploadStore, ProjectService,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.ai.api_key.is_none() {
        warn!("LLM_API_KEY is not set; PAPPG validation will use local rules only");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        uploads_dir: config.storage.uploads_dir.clone(),
    };

    let app = build_app(&config, app_state)?.layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "PA intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Wire the record stores, upload storage and AI collaborators into one router.
pub(crate) fn build_app(config: &AppConfig, state: AppState) -> Result<Router, AppError> {
    let completion = Arc::new(AnthropicClient::new(&config.ai)?);
    let relay = Arc::new(HttpChatRelay::new(&config.assistant).map_err(AiClientError::from)?);

    let projects = Arc::new(InMemoryProjects::default());
    let uploads = Arc::new(LocalUploadStore::new(config.storage.uploads_dir.clone()));

    let intake_service = Arc::new(IntakeFormService::new(
        Arc::new(InMemoryIntakeForms::default()),
        completion,
        EvaluationConfig::default(),
    ));
    let project_service = Arc::new(ProjectService::new(projects.clone()));
    let document_service = Arc::new(DocumentService::new(
        projects,
        Arc::new(InMemoryDocuments::default()),
        uploads,
    ));

    let api = intake_router(intake_service)
        .merge(project_router(project_service))
        .merge(document_router(document_service))
        .merge(assistant_router(relay));

    Ok(with_operational_routes(api)
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .layer(Extension(state)))
}
