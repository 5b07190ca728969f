use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::AssistantConfig;

/// Forwards chat messages to the external PA assistant.
#[async_trait]
pub trait ChatRelay: Send + Sync {
    async fn relay(&self, message: Value) -> Result<Value, RelayError>;
}

/// Relay failures, split the way callers need to report them.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The assistant answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Upstream { status: u16, body: Value },
    /// The request went out but nothing came back.
    #[error("no response from assistant: {0}")]
    NoResponse(String),
    /// The request could not be built or sent.
    #[error("{0}")]
    Setup(String),
}

/// Relay backed by an HTTP endpoint and a static bearer credential.
pub struct HttpChatRelay {
    client: Client,
    endpoint: Option<String>,
    bearer_token: Option<String>,
}

impl HttpChatRelay {
    pub fn new(config: &AssistantConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            bearer_token: config.bearer_token.clone(),
        })
    }
}

#[async_trait]
impl ChatRelay for HttpChatRelay {
    async fn relay(&self, message: Value) -> Result<Value, RelayError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| RelayError::Setup("PA_ASSISTANT_URL is not configured".to_string()))?;

        let mut request = self.client.post(endpoint).json(&message);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|error| RelayError::NoResponse(error.to_string()))
    }
}

fn classify_send_error(error: reqwest::Error) -> RelayError {
    if error.is_builder() {
        RelayError::Setup(error.to_string())
    } else {
        RelayError::NoResponse(error.to_string())
    }
}
