//! # faq-agent
//!
//! An FAQ assistant: a tool-calling agent that answers customer questions
//! from a CSV knowledge base through three retrieval tools.
//!
//! ## Tools
//!
//! | Tool | Returns |
//! |------|---------|
//! | `search_faq` | short snippets of the top matches |
//! | `search_detailed_faq` | complete entries, 1-20 of them |
//! | `reformulate_query` | an aspect-focused context block |
//!
//! ## Runtimes
//!
//! The agent runs in-process against a Groq or OpenAI-compatible model
//! ([`runtime::LocalRuntime`]), or utterances are forwarded to a deployed
//! AgentCore runtime ([`runtime::RemoteRuntime`]). The choice follows
//! [`config::AppConfig::runtime_target`].
//!
//! ## Example
//!
//! ```no_run
//! use faq_agent::config::AppConfig;
//! use faq_agent::logging::Logger;
//! use faq_agent::runtime::{InvocationRequest, connect};
//!
//! # async fn run() -> faq_agent::Result<()> {
//! let config = AppConfig::from_env()?;
//! let runtime = connect(&config, &Logger::disabled())?;
//! let response = runtime
//!     .invoke(InvocationRequest::new("I want 1kg of almonds", None))
//!     .await?;
//! println!("{}", response.to_json());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod logging;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod runtime;
pub mod server;
pub mod store;
pub mod tools;

pub use error::{Error, Result};
