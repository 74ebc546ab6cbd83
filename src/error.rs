//! Error types for the FAQ agent.
//!
//! Each layer has its own error enum; [`Error`] unifies them for the CLI
//! and maps each class of failure to a process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by CLI-level code.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// FAQ corpus or document store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Tool invoked with bad input.
    #[error("tool error: {0}")]
    Tool(#[from] ToolError),

    /// Agent runtime or model provider failure.
    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// `2` for configuration errors, `3` for transport, auth or upstream API
    /// failures, `1` for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Agent(
                AgentError::Transport { .. } | AgentError::Auth { .. } | AgentError::ApiRequest { .. },
            ) => 3,
            _ => 1,
        }
    }
}

/// Configuration errors. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key for the configured model provider.
    #[error("no API key found for provider '{provider}' (set GROQ_API_KEY, OPENAI_API_KEY or FAQ_AGENT_API_KEY)")]
    ApiKeyMissing {
        /// Provider name.
        provider: String,
    },

    /// Credentials required by the selected runtime target are missing.
    #[error("missing credentials: {what}")]
    MissingCredentials {
        /// Which credential is missing.
        what: String,
    },

    /// Region string is not a valid AWS region identifier.
    #[error("invalid region '{region}'")]
    InvalidRegion {
        /// The rejected value.
        region: String,
    },

    /// A deployed agent was named but no invocation URL can be derived.
    #[error("incomplete remote runtime target: {message}")]
    IncompleteRemoteTarget {
        /// What is missing.
        message: String,
    },

    /// A configuration value could not be parsed or is out of range.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Reason.
        message: String,
    },

    /// The AgentCore manifest could not be read or parsed.
    #[error("manifest {}: {message}", path.display())]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Reason.
        message: String,
    },

    /// A configured tool name is not in the registry.
    #[error("unknown tool '{name}' (expected one of: search_faq, search_detailed_faq, reformulate_query)")]
    UnknownTool {
        /// Rejected tool name.
        name: String,
    },

    /// Unsupported model provider.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name.
        name: String,
    },

    /// Unsupported or not compiled-in embedder.
    #[error("unsupported embedder: {name}")]
    UnsupportedEmbedder {
        /// Embedder name.
        name: String,
    },
}

/// FAQ corpus and document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Corpus file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Corpus path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV record.
    #[error("malformed CSV in {}: {message}", path.display())]
    Csv {
        /// Corpus path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Required CSV column is absent.
    #[error("{} has no '{column}' column", path.display())]
    MissingColumn {
        /// Corpus path.
        path: PathBuf,
        /// Column name.
        column: String,
    },

    /// Embedding model failure.
    #[error("embedding failed: {message}")]
    Embedding {
        /// Reason.
        message: String,
    },

    /// The store cannot serve queries.
    #[error("document store unavailable: {message}")]
    Unavailable {
        /// Reason.
        message: String,
    },
}

/// Errors raised by tool functions.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Malformed tool input. Never coerced.
    #[error("invalid argument for {tool}: {message}")]
    InvalidArgument {
        /// Tool name.
        tool: String,
        /// Reason.
        message: String,
    },

    /// Tool name not registered or not enabled.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// Requested tool name.
        name: String,
    },
}

impl ToolError {
    /// Shorthand for [`ToolError::InvalidArgument`].
    pub fn invalid(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

/// Agent runtime and model provider errors.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Upstream API returned an error response.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error message.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// Upstream rejected the credentials.
    #[error("authentication failed: {message}")]
    Auth {
        /// Error message.
        message: String,
    },

    /// The runtime could not be reached.
    #[error("transport failure: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("failed to parse response: {message}")]
    ResponseParse {
        /// Error message.
        message: String,
    },

    /// A tool call could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Tool name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The model kept requesting tools past the iteration limit.
    #[error("tool loop exceeded {max_iterations} iterations")]
    ToolLoopExceeded {
        /// Configured limit.
        max_iterations: usize,
    },
}

/// CLI command errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad command-line input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command failed while running.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Output could not be formatted.
    #[error("output formatting failed: {0}")]
    OutputFormat(String),
}
