//! OpenAI-compatible provider using `async-openai`.
//!
//! Serves both Groq and OpenAI: only the base URL and the key differ.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessage,
    ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestToolMessage, ChatCompletionRequestToolMessageContent,
    ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequest, FunctionCall, FunctionObject,
};
use async_trait::async_trait;

use crate::agent::message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
use crate::agent::provider::LlmProvider;
use crate::agent::tool::ToolCall;
use crate::config::{ModelConfig, ProviderKind};
use crate::error::{AgentError, ConfigError};

/// Chat completions over the OpenAI wire protocol.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    kind: ProviderKind,
}

impl OpenAiProvider {
    /// Creates a provider from model settings.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ApiKeyMissing`] when no key is configured.
    pub fn new(config: &ModelConfig) -> Result<Self, ConfigError> {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.require_api_key()?);

        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            kind: config.provider,
        })
    }

    fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::System => ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                name: None,
            }),
            Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                name: None,
            }),
            Role::Assistant => {
                let tool_calls = (!msg.tool_calls.is_empty()).then(|| {
                    msg.tool_calls
                        .iter()
                        .map(|tc| ChatCompletionMessageToolCall {
                            id: tc.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: tc.name.clone(),
                                arguments: tc.arguments.clone(),
                            },
                        })
                        .collect()
                });
                let content = (!msg.content.is_empty())
                    .then(|| ChatCompletionRequestAssistantMessageContent::Text(msg.content.clone()));

                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content,
                    name: None,
                    tool_calls,
                    refusal: None,
                    audio: None,
                    function_call: None,
                })
            }
            Role::Tool => ChatCompletionRequestMessage::Tool(ChatCompletionRequestToolMessage {
                content: ChatCompletionRequestToolMessageContent::Text(msg.content.clone()),
                tool_call_id: msg.tool_call_id.clone().unwrap_or_default(),
            }),
        }
    }

    fn build_request(request: &ChatRequest) -> CreateChatCompletionRequest {
        let tools = (!request.tools.is_empty()).then(|| {
            request
                .tools
                .iter()
                .map(|td| ChatCompletionTool {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionObject {
                        name: td.name.clone(),
                        description: Some(td.description.clone()),
                        parameters: Some(td.parameters.clone()),
                        strict: None,
                    },
                })
                .collect()
        });

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(Self::convert_message).collect(),
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
            tools,
            ..Default::default()
        }
    }
}

/// Classifies an SDK error. No retry happens at any level.
fn map_error(err: OpenAIError) -> AgentError {
    match err {
        OpenAIError::ApiError(api) => {
            let auth = api
                .code
                .as_deref()
                .or(api.r#type.as_deref())
                .is_some_and(|c| c.contains("api_key") || c.contains("auth") || c.contains("permission"));
            if auth {
                AgentError::Auth {
                    message: api.message,
                }
            } else {
                AgentError::ApiRequest {
                    message: api.message,
                    status: None,
                }
            }
        }
        OpenAIError::Reqwest(e) => match e.status().map(|s| s.as_u16()) {
            Some(code @ (401 | 403)) => AgentError::Auth {
                message: format!("HTTP {code}: {e}"),
            },
            Some(code) => AgentError::ApiRequest {
                message: e.to_string(),
                status: Some(code),
            },
            None => AgentError::Transport {
                message: e.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(e) => AgentError::ResponseParse {
            message: e.to_string(),
        },
        other => AgentError::ApiRequest {
            message: other.to_string(),
            status: None,
        },
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("kind", &self.kind)
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        let response = self
            .client
            .chat()
            .create(Self::build_request(request))
            .await
            .map_err(map_error)?;

        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let tool_calls = choice
            .and_then(|c| c.message.tool_calls.as_ref())
            .map(|tcs| {
                tcs.iter()
                    .map(|tc| ToolCall {
                        id: tc.id.clone(),
                        name: tc.function.name.clone(),
                        arguments: tc.function.arguments.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = choice.and_then(|c| {
            c.finish_reason
                .as_ref()
                .map(|fr| format!("{fr:?}").to_lowercase())
        });

        let usage = response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            content,
            usage,
            tool_calls,
            finish_reason,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::tool::ToolRegistry;
    use crate::config::AppConfig;

    fn model_config(key: Option<&str>) -> ModelConfig {
        let mut builder = AppConfig::builder();
        if let Some(key) = key {
            builder = builder.api_key(key);
        }
        builder.build().unwrap_or_else(|e| panic!("{e}")).model
    }

    #[test]
    fn test_new_requires_key() {
        assert!(matches!(
            OpenAiProvider::new(&model_config(None)),
            Err(ConfigError::ApiKeyMissing { .. })
        ));
        let provider = OpenAiProvider::new(&model_config(Some("gsk"))).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(provider.name(), "groq");
    }

    #[test]
    fn test_convert_assistant_with_tool_calls() {
        let msg = ChatMessage::assistant_tool_calls(vec![ToolCall {
            id: "call_1".to_string(),
            name: "search_faq".to_string(),
            arguments: r#"{"query":"almonds"}"#.to_string(),
        }]);
        let ChatCompletionRequestMessage::Assistant(a) = OpenAiProvider::convert_message(&msg) else {
            panic!("expected assistant message");
        };
        assert_eq!(a.tool_calls.as_ref().map_or(0, Vec::len), 1);
        assert!(a.content.is_none());
    }

    #[test]
    fn test_convert_roles() {
        assert!(matches!(
            OpenAiProvider::convert_message(&ChatMessage::system("s")),
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            OpenAiProvider::convert_message(&ChatMessage::tool("call_1", "r")),
            ChatCompletionRequestMessage::Tool(_)
        ));
    }

    #[test]
    fn test_build_request_keeps_zero_temperature() {
        let request = ChatRequest {
            model: "openai/gpt-oss-20b".to_string(),
            messages: vec![ChatMessage::user("I want 1kg of almonds")],
            temperature: Some(0.0),
            max_tokens: Some(256),
            tools: ToolRegistry::all().definitions(),
        };
        let built = OpenAiProvider::build_request(&request);
        assert_eq!(built.temperature, Some(0.0));
        assert_eq!(built.tools.as_ref().map_or(0, Vec::len), 3);
        assert_eq!(built.max_completion_tokens, Some(256));
    }
}
