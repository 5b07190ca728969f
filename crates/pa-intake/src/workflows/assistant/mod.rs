//! AI collaborator plumbing: the completion client, the intake review adapter
//! with its local-rule fallback, and the chat relay.

mod adapter;
mod client;
mod relay;
pub mod router;

#[cfg(test)]
mod tests;

pub use adapter::{AssistantError, IntakeAssistant};
pub use client::{
    extract_json_object, AiClientError, AnthropicClient, CompletionClient, CompletionRequest,
};
pub use relay::{ChatRelay, HttpChatRelay, RelayError};
pub use router::assistant_router;
