use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::RepositoryError;

/// Every failure leaving the intake API is a `{ "message": ... }` envelope.
pub(crate) fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "message": message.into() });
    (status, Json(payload)).into_response()
}

pub(crate) fn repository_failure(error: &RepositoryError) -> Response {
    match error {
        RepositoryError::NotFound { .. } => message_response(StatusCode::NOT_FOUND, error.to_string()),
        RepositoryError::Conflict => message_response(StatusCode::CONFLICT, error.to_string()),
        RepositoryError::Unavailable(_) => {
            message_response(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}
