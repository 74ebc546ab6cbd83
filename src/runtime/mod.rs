//! Agent runtimes: where an utterance is turned into an answer.
//!
//! [`LocalRuntime`] runs the tool-calling loop in-process; [`RemoteRuntime`]
//! forwards the utterance to a hosted runtime over HTTP. Both return the
//! same [`InvocationResponse`]. Neither retries.

mod local;
mod remote;

pub use local::LocalRuntime;
pub use remote::RemoteRuntime;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::{FaqAgent, ToolExecutor, ToolInvocation, create_provider, load_system_prompt};
use crate::config::{AppConfig, RuntimeTarget};
use crate::embedding::create_embedder;
use crate::error::{AgentError, Error};
use crate::logging::Logger;
use crate::store::{TextSplitter, build_store};
use crate::tools::FaqTools;

/// Header carrying the runtime session id.
pub const SESSION_HEADER: &str = "X-Amzn-Bedrock-AgentCore-Runtime-Session-Id";

/// One utterance to answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// User text, forwarded unmodified.
    pub prompt: String,
    /// Prior session to continue, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl InvocationRequest {
    /// Creates a request.
    pub fn new(prompt: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            session_id,
        }
    }
}

/// The answer plus correlation ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    /// Final answer text.
    pub result: String,
    /// Session the invocation ran in.
    pub session_id: String,
    /// Id of this invocation.
    pub request_id: String,
    /// Tools called, when known. Remote runtimes do not report them.
    pub tool_calls: Vec<ToolInvocation>,
}

impl InvocationResponse {
    /// The `{"result": ...}` payload returned to callers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "result": self.result })
    }
}

/// Something that answers utterances.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// `local` or `remote`.
    fn name(&self) -> &'static str;

    /// Answers one utterance.
    ///
    /// # Errors
    ///
    /// Model, transport or tool-loop failures, surfaced as-is.
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse, AgentError>;
}

/// Loads the corpus and builds the tool bodies.
pub fn load_tools(config: &AppConfig, logger: &Logger) -> Result<Arc<FaqTools>, Error> {
    let embedder = create_embedder(&config.embedder, &config.embedding_model)?;
    let store = logger.in_scope(|| build_store(&config.faq_path, embedder, &TextSplitter::default()))?;
    Ok(Arc::new(FaqTools::new(Arc::new(store), config.search, logger.clone())))
}

/// Builds the runtime selected by [`AppConfig::runtime_target`].
pub fn connect(config: &AppConfig, logger: &Logger) -> Result<Arc<dyn AgentRuntime>, Error> {
    match config.runtime_target()? {
        RuntimeTarget::Remote { url, bearer_token } => {
            logger.in_scope(|| tracing::info!(%url, "using remote agent runtime"));
            Ok(Arc::new(RemoteRuntime::new(url, bearer_token, logger.clone())?))
        }
        RuntimeTarget::Local => {
            let provider = create_provider(&config.model)?;
            let tools = load_tools(config, logger)?;
            let prompt = logger.in_scope(|| load_system_prompt(config.prompt_path.as_deref()));
            let agent = FaqAgent::new(&config.model, prompt, config.tools.clone());
            let executor = ToolExecutor::new(tools, config.tools.clone());
            logger.in_scope(|| {
                tracing::info!(
                    provider = provider.name(),
                    model = %config.model.model,
                    tools = config.tools.len(),
                    "using local agent runtime"
                );
            });
            Ok(Arc::new(LocalRuntime::new(agent, provider, executor, logger.clone())))
        }
    }
}
