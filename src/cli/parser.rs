//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::server::{DEFAULT_HOST, DEFAULT_PORT};

/// FAQ agent: answers customer questions from an FAQ knowledge base.
///
/// Runs the tool-calling agent in-process, or forwards utterances to a
/// deployed AgentCore runtime when one is configured.
#[derive(Parser, Debug)]
#[command(name = "faq-agent")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// FAQ corpus CSV (Question and Answer columns).
    #[arg(long, global = true)]
    pub faq: Option<PathBuf>,

    /// AgentCore manifest. Defaults to `.bedrock_agentcore.yaml` when present.
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one utterance to the agent and print `{"result": ...}`.
    #[command(after_help = r#"Examples:
  faq-agent invoke "I want 1kg of almonds"
  faq-agent invoke "and cashews?" --session-id 3f2b...
  faq-agent invoke "hello" --endpoint http://localhost:8080
"#)]
    Invoke {
        /// The customer's message.
        utterance: String,

        /// Continue an existing session.
        #[arg(long)]
        session_id: Option<String>,

        /// Runtime base URL. Overrides the manifest and local runtime.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Serve the AgentCore HTTP contract (`POST /invocations`, `GET /ping`).
    #[command(after_help = r#"Examples:
  faq-agent serve                       # 0.0.0.0:8080
  faq-agent serve --host 127.0.0.1 --port 9000
"#)]
    Serve {
        /// Host to bind to.
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to.
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Search the FAQ corpus the way the agent's tools do.
    #[command(after_help = r#"Examples:
  faq-agent search "almond price"
  faq-agent search "shipping" --detailed -k 2
  faq-agent --format json search "cashews"
"#)]
    Search {
        /// Search query text.
        query: String,

        /// Return full entries (`search_detailed_faq`) instead of snippets.
        #[arg(long)]
        detailed: bool,

        /// Number of results.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Build an aspect-focused context block (`reformulate_query`).
    #[command(after_help = r#"Examples:
  faq-agent reformulate "I want 1kg of almonds" --aspect pricing
  faq-agent reformulate --aspect "shipping costs"
"#)]
    Reformulate {
        /// The customer's original question.
        #[arg(default_value = "")]
        original_query: String,

        /// Aspect to focus on.
        #[arg(short, long)]
        aspect: String,
    },

    /// List the tools offered to the model.
    Tools,

    /// Start MCP (Model Context Protocol) server.
    #[cfg(feature = "mcp")]
    #[command(subcommand)]
    Mcp(McpCommands),
}

/// MCP server subcommands.
#[cfg(feature = "mcp")]
#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Serve over stdin/stdout.
    #[command(after_help = r#"Examples:
  faq-agent mcp stdio
  faq-agent --faq data/nuts_shop_faq.csv mcp stdio
"#)]
    Stdio,

    /// Serve streamable HTTP at `/mcp`.
    #[command(after_help = r#"Examples:
  faq-agent mcp http                        # Listen on 127.0.0.1:3000
  faq-agent mcp http --host 0.0.0.0 --port 3001
"#)]
    Http {
        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to.
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}
