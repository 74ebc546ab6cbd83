//! In-process runtime.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::{AgentRuntime, InvocationRequest, InvocationResponse};
use crate::agent::{FaqAgent, LlmProvider, ToolExecutor, execute_with_tools};
use crate::error::AgentError;
use crate::logging::{InvocationTrace, Logger, RequestIds};

/// Runs the FAQ agent's tool loop against a model provider.
pub struct LocalRuntime {
    agent: FaqAgent,
    provider: Arc<dyn LlmProvider>,
    executor: ToolExecutor,
    logger: Logger,
}

impl std::fmt::Debug for LocalRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRuntime")
            .field("agent", &self.agent)
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl LocalRuntime {
    /// Creates a runtime.
    pub fn new(
        agent: FaqAgent,
        provider: Arc<dyn LlmProvider>,
        executor: ToolExecutor,
        logger: Logger,
    ) -> Self {
        Self {
            agent,
            provider,
            executor,
            logger,
        }
    }
}

#[async_trait]
impl AgentRuntime for LocalRuntime {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse, AgentError> {
        let ids = RequestIds::new(request.session_id.as_deref());

        let turn = async {
            info!(provider = self.provider.name(), "invoking FAQ agent");
            let result =
                execute_with_tools(&self.agent, self.provider.as_ref(), &request.prompt, &self.executor)
                    .await;
            match &result {
                Ok(response) => info!(
                    tool_calls = response.tool_calls.len(),
                    total_tokens = response.usage.total_tokens,
                    "agent turn complete"
                ),
                Err(e) => error!(error = %e, "agent turn failed"),
            }
            result
        };
        let response = self.logger.scope(&ids, turn).await?;

        self.logger.record_trace(&InvocationTrace {
            ids: &ids,
            query: &request.prompt,
            tool_calls: response.tool_calls.iter().map(|t| t.name.as_str()).collect(),
            response: &response.content,
        });

        Ok(InvocationResponse {
            result: response.content,
            session_id: ids.session_id,
            request_id: ids.request_id,
            tool_calls: response.tool_calls,
        })
    }
}
