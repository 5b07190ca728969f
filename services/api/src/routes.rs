use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::io::ErrorKind;
use std::path::Component;
use tracing::warn;

/// Health, readiness, metrics and stored-upload routes around the API routers.
pub(crate) fn with_operational_routes(app: Router) -> Router {
    app.route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/uploads/*path", get(stored_upload))
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

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Serve a file from the uploads directory. Only plain relative names are accepted.
pub(crate) async fn stored_upload(
    Extension(state): Extension<AppState>,
    Path(path): Path<String>,
) -> Response {
    let relative = std::path::Path::new(&path);
    let plain = !path.contains('\\')
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !plain {
        return message(StatusCode::BAD_REQUEST, "Invalid upload path");
    }

    match tokio::fs::read(state.uploads_dir.join(relative)).await {
        Ok(contents) => {
            let content_type = mime_guess::from_path(relative).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.to_string())],
                contents,
            )
                .into_response()
        }
        Err(error) if error.kind() == ErrorKind::NotFound => {
            message(StatusCode::NOT_FOUND, "File not found")
        }
        Err(error) => {
            warn!(%error, path = %path, "failed to read stored upload");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file")
        }
    }
}
