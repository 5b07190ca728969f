use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::assistant::{
    AiClientError, ChatRelay, CompletionClient, CompletionRequest, IntakeAssistant, RelayError,
};
use crate::workflows::intake::{ComplianceEvaluator, EvaluationConfig};

/// Completion client returning a fixed outcome.
pub(super) struct CannedCompletion {
    outcome: Result<Option<String>, u16>,
    pub(super) prompts: Mutex<Vec<String>>,
}

impl CannedCompletion {
    pub(super) fn text(text: &str) -> Self {
        Self {
            outcome: Ok(Some(text.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn without_content() -> Self {
        Self {
            outcome: Ok(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn http_error(status: u16) -> Self {
        Self {
            outcome: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for CannedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, AiClientError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(request.prompt);
        match &self.outcome {
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(AiClientError::Status {
                status: *status,
                body: "upstream failure".to_string(),
            }),
        }
    }
}

pub(super) fn assistant(client: CannedCompletion) -> IntakeAssistant<CannedCompletion> {
    IntakeAssistant::new(
        Arc::new(client),
        ComplianceEvaluator::new(EvaluationConfig::default()),
    )
}

pub(super) enum RelayOutcome {
    Reply(Value),
    Upstream(u16, Value),
    Silent,
    Unconfigured,
}

/// Relay that records forwarded messages and answers with a fixed outcome.
pub(super) struct ScriptedRelay {
    outcome: RelayOutcome,
    pub(super) forwarded: Mutex<Vec<Value>>,
}

impl ScriptedRelay {
    pub(super) fn new(outcome: RelayOutcome) -> Self {
        Self {
            outcome,
            forwarded: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatRelay for ScriptedRelay {
    async fn relay(&self, message: Value) -> Result<Value, RelayError> {
        self.forwarded
            .lock()
            .expect("relay mutex poisoned")
            .push(message);
        match &self.outcome {
            RelayOutcome::Reply(reply) => Ok(reply.clone()),
            RelayOutcome::Upstream(status, body) => Err(RelayError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            RelayOutcome::Silent => Err(RelayError::NoResponse("timed out".to_string())),
            RelayOutcome::Unconfigured => Err(RelayError::Setup(
                "PA_ASSISTANT_URL is not configured".to_string(),
            )),
        }
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn chat_request(body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/pa-assistant")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}
