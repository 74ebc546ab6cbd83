//! Pluggable LLM provider trait.
//!
//! Implementations translate [`ChatRequest`]/[`ChatResponse`] into a
//! specific SDK call. Agent logic never sees the SDK.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::AgentError;

/// A chat completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (`groq`, `openai`, ...).
    fn name(&self) -> &'static str;

    /// Executes one chat completion. No retries.
    ///
    /// # Errors
    ///
    /// [`AgentError::Auth`] for rejected credentials,
    /// [`AgentError::Transport`] when the API is unreachable and
    /// [`AgentError::ApiRequest`] for other upstream failures.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError>;
}
