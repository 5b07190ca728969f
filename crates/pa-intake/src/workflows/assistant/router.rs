use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::relay::{ChatRelay, RelayError};

/// Router exposing the chat relay endpoint.
pub fn assistant_router<T>(relay: Arc<T>) -> Router
where
    T: ChatRelay + 'static,
{
    Router::new()
        .route("/api/pa-assistant", post(relay_handler::<T>))
        .with_state(relay)
}

pub(crate) async fn relay_handler<T>(State(relay): State<Arc<T>>, Json(message): Json<Value>) -> Response
where
    T: ChatRelay + 'static,
{
    info!("relaying message to PA assistant");

    match relay.relay(message).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(failure) => {
            error!(error = %failure, "PA assistant relay failed");
            relay_failure(failure)
        }
    }
}

fn relay_failure(failure: RelayError) -> Response {
    match failure {
        RelayError::Upstream { status, ref body } => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let payload = json!({
                "error": "API error",
                "message": failure.to_string(),
                "details": body,
            });
            (code, Json(payload)).into_response()
        }
        RelayError::NoResponse(_) => {
            let payload = json!({
                "error": "No response from API",
                "message": "The service is not responding",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        RelayError::Setup(message) => {
            let payload = json!({
                "error": "Request setup error",
                "message": message,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
