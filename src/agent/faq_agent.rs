//! The FAQ assistant.

use super::tool::{ToolDefinition, ToolRegistry};
use super::traits::Agent;
use crate::config::ModelConfig;

/// Answers customer questions from the FAQ knowledge base.
#[derive(Debug, Clone)]
pub struct FaqAgent {
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    max_tool_iterations: usize,
    registry: ToolRegistry,
}

impl FaqAgent {
    /// Creates the agent from model settings, a system prompt and the
    /// enabled tools.
    pub fn new(config: &ModelConfig, system_prompt: String, registry: ToolRegistry) -> Self {
        Self {
            model: config.model.clone(),
            system_prompt,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_tool_iterations: config.max_tool_iterations,
            registry,
        }
    }
}

impl Agent for FaqAgent {
    fn name(&self) -> &'static str {
        "faq"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::agentic_loop::tests::MockToolProvider;
    use crate::agent::executor::ToolExecutor;
    use crate::agent::prompt::FAQ_SYSTEM_PROMPT;
    use crate::agent::traits::execute_with_tools;
    use crate::config::AppConfig;
    use crate::logging::Logger;
    use crate::tools::testing;
    use std::sync::Arc;

    fn agent(registry: ToolRegistry) -> FaqAgent {
        let config = AppConfig::builder()
            .api_key("test")
            .max_tool_iterations(4)
            .build()
            .unwrap_or_else(|e| panic!("{e}"));
        FaqAgent::new(&config.model, FAQ_SYSTEM_PROMPT.to_string(), registry)
    }

    #[test]
    fn test_settings_from_config() {
        let agent = agent(ToolRegistry::all());
        assert_eq!(agent.model(), "openai/gpt-oss-20b");
        assert_eq!(agent.max_tool_iterations(), 4);
        assert!(agent.temperature().abs() < f32::EPSILON);
        assert_eq!(agent.tools().len(), 3);
    }

    #[tokio::test]
    async fn test_turn_records_tool_calls() {
        let registry = ToolRegistry::all();
        let executor = ToolExecutor::new(Arc::new(testing::tools(Logger::disabled())), registry.clone());
        let response = execute_with_tools(&agent(registry), &MockToolProvider::new(2), "almonds?", &executor)
            .await
            .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(response.tool_calls.len(), 2);
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_turn_hits_iteration_limit() {
        let registry = ToolRegistry::all();
        let executor = ToolExecutor::new(Arc::new(testing::tools(Logger::disabled())), registry.clone());
        let result = execute_with_tools(&agent(registry), &MockToolProvider::new(50), "almonds?", &executor).await;
        assert!(matches!(
            result,
            Err(crate::error::AgentError::ToolLoopExceeded { max_iterations: 4 })
        ));
    }
}
