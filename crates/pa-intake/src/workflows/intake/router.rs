use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::domain::{IntakeFormId, UserId};
use super::repository::IntakeFormRepository;
use super::service::{IntakeFormService, IntakeServiceError};
use super::submission::IntakeSubmission;
use crate::workflows::assistant::CompletionClient;
use crate::workflows::http::{message_response, repository_failure};

/// Router builder exposing the intake form endpoints.
pub fn intake_router<R, C>(service: Arc<IntakeFormService<R, C>>) -> Router
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    Router::new()
        .route("/api/intake", post(create_handler::<R, C>))
        .route("/api/intake/user/:user_id", get(list_handler::<R, C>))
        .route("/api/intake/process-pda", post(process_pda_handler::<R, C>))
        .route("/api/intake/validate-ai", post(validate_ai_handler::<R, C>))
        .route("/api/intake/suggestions", post(suggestions_handler::<R, C>))
        .route("/api/intake/validate-costs", post(validate_costs_handler::<R, C>))
        .route(
            "/api/intake/:id",
            get(get_handler::<R, C>).put(update_handler::<R, C>),
        )
        .route("/api/intake/:id/generate", post(generate_handler::<R, C>))
        .route("/api/intake/:id/validate", post(validate_handler::<R, C>))
        .with_state(service)
}

pub(crate) async fn create_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Json(submission): Json<IntakeSubmission>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.create(submission) {
        Ok(form) => (StatusCode::CREATED, Json(form)).into_response(),
        Err(error) => service_failure(&error),
    }
}

pub(crate) async fn list_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.list_for_user(&UserId(user_id)) {
        Ok(forms) => (StatusCode::OK, Json(forms)).into_response(),
        Err(error) => service_failure(&error),
    }
}

pub(crate) async fn get_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Path(id): Path<String>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.get(&IntakeFormId(id)) {
        Ok(form) => (StatusCode::OK, Json(form)).into_response(),
        Err(error) => service_failure(&error),
    }
}

pub(crate) async fn update_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Path(id): Path<String>,
    Json(submission): Json<IntakeSubmission>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.update(&IntakeFormId(id), submission) {
        Ok(form) => (StatusCode::OK, Json(form)).into_response(),
        Err(error) => service_failure(&error),
    }
}

pub(crate) async fn generate_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Path(id): Path<String>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.generate(&IntakeFormId(id)) {
        Ok(form) => (StatusCode::OK, Json(form)).into_response(),
        Err(error) => service_failure(&error),
    }
}

pub(crate) async fn validate_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Path(id): Path<String>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.validate(&IntakeFormId(id)).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => service_failure(&error),
    }
}

pub(crate) async fn validate_ai_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Json(payload): Json<Value>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    let report = service.validate_submission(&payload).await;
    (StatusCode::OK, Json(report)).into_response()
}

pub(crate) async fn suggestions_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Json(payload): Json<Value>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.suggestions(&payload).await {
        Ok(suggestions) => (StatusCode::OK, Json(suggestions)).into_response(),
        Err(error) => assistant_failure("Failed to generate suggestions", &error),
    }
}

pub(crate) async fn validate_costs_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    Json(payload): Json<Value>,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    match service.validate_costs(&payload).await {
        Ok(review) => (StatusCode::OK, Json(review)).into_response(),
        Err(error) => assistant_failure("Failed to validate cost estimates", &error),
    }
}

pub(crate) async fn process_pda_handler<R, C>(
    State(service): State<Arc<IntakeFormService<R, C>>>,
    mut multipart: Multipart,
) -> Response
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    let mut contents = None;
    let mut file_type = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(rejection) => {
                return message_response(StatusCode::BAD_REQUEST, rejection.body_text())
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => match field.bytes().await {
                Ok(bytes) => contents = Some(bytes),
                Err(rejection) => {
                    return message_response(StatusCode::BAD_REQUEST, rejection.body_text())
                }
            },
            Some("fileType") => match field.text().await {
                Ok(text) if !text.trim().is_empty() => file_type = Some(text),
                Ok(_) => {}
                Err(rejection) => {
                    return message_response(StatusCode::BAD_REQUEST, rejection.body_text())
                }
            },
            _ => {}
        }
    }

    let Some(contents) = contents else {
        return message_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    let file_type = file_type.unwrap_or_else(|| "PDA".to_string());

    match service.extract_pda(&contents, &file_type).await {
        Ok(extracted) => {
            let payload = json!({
                "success": true,
                "extractedData": extracted,
                "message": "Document processed successfully",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => assistant_failure("Failed to process document", &error),
    }
}

fn service_failure(error: &IntakeServiceError) -> Response {
    match error {
        IntakeServiceError::Validation(problem) => {
            message_response(StatusCode::BAD_REQUEST, problem.to_string())
        }
        IntakeServiceError::Repository(failure) => repository_failure(failure),
        IntakeServiceError::Assistant(failure) => {
            message_response(StatusCode::INTERNAL_SERVER_ERROR, failure.to_string())
        }
    }
}

fn assistant_failure(message: &str, error: &IntakeServiceError) -> Response {
    error!(%error, context = message, "AI assistant request failed");
    let payload = json!({
        "message": message,
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
