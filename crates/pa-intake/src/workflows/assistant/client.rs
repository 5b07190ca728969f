use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AiConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A single-turn prompt for the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

/// Opaque request/response collaborator that turns a prompt into reply text.
///
/// `Ok(None)` means the endpoint answered without any content block.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, AiClientError>;
}

/// Error types for the AI completion collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AiClientError {
    #[error("AI request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI reply contained no text")]
    EmptyReply,

    #[error("AI reply did not contain a JSON object")]
    MissingJson,

    #[error("AI reply JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM_API_KEY is not configured")]
    MissingApiKey,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Option<Vec<ContentBlock>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Client for an Anthropic messages-style endpoint.
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl AnthropicClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, AiClientError> {
        let api_key = self.api_key.as_deref().ok_or(AiClientError::MissingApiKey)?;

        let body = MessagesRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: MessagesResponse = response.json().await?;
        match reply.content {
            None => Ok(None),
            Some(blocks) => blocks
                .into_iter()
                .next()
                .and_then(|block| block.text)
                .map(Some)
                .ok_or(AiClientError::EmptyReply),
        }
    }
}

/// Parse the outermost `{ ... }` span of a reply as JSON.
pub fn extract_json_object(text: &str) -> Result<Value, AiClientError> {
    let start = text.find('{').ok_or(AiClientError::MissingJson)?;
    let end = text.rfind('}').ok_or(AiClientError::MissingJson)?;
    if end < start {
        return Err(AiClientError::MissingJson);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}
