//! Agent trait definition.
//!
//! An agent is a fixed system prompt plus model settings and, optionally, a
//! set of tools. [`execute_with_tools`] drives one turn through the
//! agentic loop.

use async_trait::async_trait;
use serde::Serialize;

use super::agentic_loop::{ToolInvocation, agentic_loop};
use super::executor::ToolExecutor;
use super::message::{ChatMessage, ChatRequest, TokenUsage};
use super::provider::LlmProvider;
use super::tool::ToolDefinition;
use crate::error::AgentError;

/// Response from an agent turn.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    /// Final text.
    pub content: String,
    /// Usage over every model call in the turn.
    pub usage: TokenUsage,
    /// Why the model stopped (`stop`, `length`, ...).
    pub finish_reason: Option<String>,
    /// Tools called during the turn.
    pub tool_calls: Vec<ToolInvocation>,
}

/// Implemented by every agent.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging.
    fn name(&self) -> &'static str;

    /// Model id.
    fn model(&self) -> &str;

    /// System prompt.
    fn system_prompt(&self) -> &str;

    /// Sampling temperature.
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Completion token limit.
    fn max_tokens(&self) -> u32 {
        1024
    }

    /// Tools offered to the model. Empty disables tool calling.
    fn tools(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    /// Tool loop limit.
    fn max_tool_iterations(&self) -> usize {
        10
    }

    /// Builds the initial request for `user_msg`.
    fn request(&self, user_msg: &str, tools: Vec<ToolDefinition>) -> ChatRequest {
        ChatRequest {
            model: self.model().to_string(),
            messages: vec![
                ChatMessage::system(self.system_prompt()),
                ChatMessage::user(user_msg),
            ],
            temperature: Some(self.temperature()),
            max_tokens: Some(self.max_tokens()),
            tools,
        }
    }

    /// One model call without tools.
    ///
    /// # Errors
    ///
    /// Propagates provider errors.
    async fn execute(&self, provider: &dyn LlmProvider, user_msg: &str) -> Result<AgentResponse, AgentError> {
        let response = provider.chat(&self.request(user_msg, Vec::new())).await?;
        Ok(AgentResponse {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
            tool_calls: Vec::new(),
        })
    }
}

/// Runs one turn, using the agentic loop when the agent has tools.
///
/// # Errors
///
/// Provider errors, or [`AgentError::ToolLoopExceeded`].
pub async fn execute_with_tools(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    user_msg: &str,
    executor: &ToolExecutor,
) -> Result<AgentResponse, AgentError> {
    let tool_defs = agent.tools();
    if tool_defs.is_empty() {
        return agent.execute(provider, user_msg).await;
    }

    let mut request = agent.request(user_msg, tool_defs);
    let outcome = agentic_loop(provider, &mut request, executor, agent.max_tool_iterations()).await?;

    Ok(AgentResponse {
        content: outcome.response.content,
        usage: outcome.usage,
        finish_reason: outcome.response.finish_reason,
        tool_calls: outcome.invocations,
    })
}
