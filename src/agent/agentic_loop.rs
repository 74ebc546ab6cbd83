//! Agentic tool-calling loop.
//!
//! Sends the conversation to the model, executes any tool calls in the
//! reply, appends the results and repeats until the model answers in plain
//! text or the iteration limit is hit.

use serde::Serialize;
use tracing::debug;

use super::executor::ToolExecutor;
use super::message::{ChatMessage, ChatRequest, ChatResponse, TokenUsage};
use super::provider::LlmProvider;
use crate::error::AgentError;

/// A tool call made during the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    /// Tool name as requested by the model.
    pub name: String,
    /// Whether the call returned an error result.
    pub is_error: bool,
}

/// Final model reply plus what happened on the way.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// The text-only reply that ended the loop.
    pub response: ChatResponse,
    /// Tool calls in execution order.
    pub invocations: Vec<ToolInvocation>,
    /// Usage summed over every model call.
    pub usage: TokenUsage,
}

/// Runs model → tools → model … on `request`, which is extended in place.
///
/// # Errors
///
/// [`AgentError::ToolLoopExceeded`] when the model still wants tools after
/// `max_iterations` calls. Provider errors propagate unchanged.
pub async fn agentic_loop(
    provider: &dyn LlmProvider,
    request: &mut ChatRequest,
    executor: &ToolExecutor,
    max_iterations: usize,
) -> Result<LoopOutcome, AgentError> {
    let mut invocations = Vec::new();
    let mut usage = TokenUsage::default();

    for iteration in 0..max_iterations {
        let response = provider.chat(request).await?;
        usage.accumulate(response.usage);

        if response.tool_calls.is_empty() {
            debug!(iteration, tool_calls = invocations.len(), "model produced final answer");
            return Ok(LoopOutcome {
                response,
                invocations,
                usage,
            });
        }

        debug!(iteration, count = response.tool_calls.len(), "executing tool calls");
        request
            .messages
            .push(ChatMessage::assistant_tool_calls(response.tool_calls.clone()));

        for call in &response.tool_calls {
            let result = executor.execute(call).await;
            debug!(
                tool = call.name,
                call_id = call.id,
                is_error = result.is_error,
                "tool call complete"
            );
            invocations.push(ToolInvocation {
                name: call.name.clone(),
                is_error: result.is_error,
            });
            request
                .messages
                .push(ChatMessage::tool(&result.tool_call_id, &result.content));
        }
    }

    Err(AgentError::ToolLoopExceeded { max_iterations })
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::message::Role;
    use crate::agent::tool::{ToolCall, ToolRegistry};
    use crate::logging::Logger;
    use crate::tools::testing;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    /// Returns `tool_rounds` rounds of one `search_faq` call, then text.
    pub(crate) struct MockToolProvider {
        call_count: AtomicUsize,
        tool_rounds: usize,
    }

    impl MockToolProvider {
        pub(crate) const fn new(tool_rounds: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                tool_rounds,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockToolProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);
            let usage = TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            };

            if count < self.tool_rounds {
                Ok(ChatResponse {
                    content: String::new(),
                    usage,
                    tool_calls: vec![ToolCall {
                        id: format!("call_{count}"),
                        name: "search_faq".to_string(),
                        arguments: r#"{"query":"almonds"}"#.to_string(),
                    }],
                    finish_reason: Some("tool_calls".to_string()),
                })
            } else {
                Ok(ChatResponse {
                    content: "Final answer based on tool results.".to_string(),
                    usage,
                    tool_calls: Vec::new(),
                    finish_reason: Some("stop".to_string()),
                })
            }
        }
    }

    fn executor() -> ToolExecutor {
        ToolExecutor::new(Arc::new(testing::tools(Logger::disabled())), ToolRegistry::all())
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "test".to_string(),
            messages: vec![ChatMessage::system("test"), ChatMessage::user("query")],
            temperature: Some(0.0),
            max_tokens: Some(1024),
            tools: ToolRegistry::all().definitions(),
        }
    }

    #[tokio::test]
    async fn test_single_tool_round() {
        let mut request = request();
        let outcome = agentic_loop(&MockToolProvider::new(1), &mut request, &executor(), 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(outcome.response.content, "Final answer based on tool results.");
        // system + user + assistant(tool_calls) + tool(result)
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[3].role, Role::Tool);
        assert!(request.messages[3].content.starts_with("Found 3 relevant FAQ entries"));
        assert_eq!(outcome.invocations.len(), 1);
        assert_eq!(outcome.usage.total_tokens, 30);
    }

    #[tokio::test]
    async fn test_multiple_rounds() {
        let mut request = request();
        let outcome = agentic_loop(&MockToolProvider::new(3), &mut request, &executor(), 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(request.messages.len(), 8);
        assert_eq!(outcome.invocations.len(), 3);
        assert!(outcome.invocations.iter().all(|i| i.name == "search_faq" && !i.is_error));
    }

    #[tokio::test]
    async fn test_exceeds_max() {
        let mut request = request();
        let result = agentic_loop(&MockToolProvider::new(100), &mut request, &executor(), 2).await;
        assert!(matches!(result, Err(AgentError::ToolLoopExceeded { max_iterations: 2 })));
    }

    #[tokio::test]
    async fn test_no_tools_needed() {
        let mut request = request();
        let outcome = agentic_loop(&MockToolProvider::new(0), &mut request, &executor(), 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));
        assert_eq!(request.messages.len(), 2);
        assert!(outcome.invocations.is_empty());
    }
}
