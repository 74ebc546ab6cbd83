//! Tool-calling FAQ agent.
//!
//! A provider abstraction over OpenAI-compatible chat APIs, the tool
//! registry and executor, and the agentic loop that ties them together.
//!
//! # Architecture
//!
//! ```text
//! utterance → FaqAgent (system prompt + tool definitions)
//!   └── agentic_loop
//!         ├── LlmProvider::chat
//!         ├── ToolExecutor → FaqTools → DocumentStore
//!         └── repeat until a text-only reply
//! ```

pub mod agentic_loop;
pub mod client;
pub mod executor;
pub mod faq_agent;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod tool;
pub mod traits;

pub use agentic_loop::{LoopOutcome, ToolInvocation, agentic_loop};
pub use client::create_provider;
pub use executor::ToolExecutor;
pub use faq_agent::FaqAgent;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use prompt::{FAQ_SYSTEM_PROMPT, load_system_prompt};
pub use provider::LlmProvider;
pub use tool::{ToolCall, ToolDefinition, ToolName, ToolRegistry, ToolResult};
pub use traits::{Agent, AgentResponse, execute_with_tools};
