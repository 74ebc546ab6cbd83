//! CLI command implementations.
//!
//! Each command resolves an [`AppConfig`] from flags, the environment and
//! the manifest, then runs against it. Commands that talk to a model or
//! serve HTTP build their own tokio runtime.

use std::net::SocketAddr;

#[cfg(feature = "mcp")]
use crate::cli::parser::McpCommands;
use crate::cli::output::{OutputFormat, format_context, format_entries, format_snippets, format_tools};
use crate::cli::parser::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{CommandError, Result};
use crate::logging::Logger;
use crate::runtime::{InvocationRequest, connect, load_tools};
use crate::server::{ServerState, serve, shutdown_signal};
use crate::tools::{render_entries, render_snippets};

/// Flag values that override the environment.
#[derive(Debug, Clone, Default)]
struct Overrides<'a> {
    endpoint: Option<&'a str>,
    search_k: Option<usize>,
}

fn load_config(cli: &Cli, overrides: &Overrides<'_>) -> Result<AppConfig> {
    let mut builder = AppConfig::builder();
    if let Some(path) = &cli.faq {
        builder = builder.faq_path(path);
    }
    if let Some(path) = &cli.manifest {
        builder = builder.manifest_path(path);
    }
    if let Some(url) = overrides.endpoint {
        builder = builder.endpoint(url);
    }
    if let Some(k) = overrides.search_k {
        builder = builder.search_k(k);
    }
    Ok(builder.from_env()?.discover_manifest()?.build()?)
}

fn tokio_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

/// Executes the CLI command.
///
/// Returns the text to print on stdout.
///
/// # Errors
///
/// Configuration, store, tool or runtime failures; see
/// [`crate::Error::exit_code`].
pub fn execute(cli: &Cli, logger: &Logger) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Invoke {
            utterance,
            session_id,
            endpoint,
        } => {
            let overrides = Overrides {
                endpoint: endpoint.as_deref(),
                ..Overrides::default()
            };
            let config = load_config(cli, &overrides)?;
            cmd_invoke(&config, logger, utterance, session_id.clone(), format)
        }
        Commands::Serve { host, port } => {
            let config = load_config(cli, &Overrides::default())?;
            cmd_serve(&config, logger, host, *port)
        }
        Commands::Search {
            query,
            detailed,
            top_k,
        } => {
            let overrides = Overrides {
                search_k: top_k.filter(|_| !detailed),
                ..Overrides::default()
            };
            let config = load_config(cli, &overrides)?;
            let num_results = if *detailed { *top_k } else { None };
            cmd_search(&config, logger, query, *detailed, num_results, format)
        }
        Commands::Reformulate {
            original_query,
            aspect,
        } => {
            let config = load_config(cli, &Overrides::default())?;
            cmd_reformulate(&config, logger, original_query, aspect, format)
        }
        Commands::Tools => {
            let config = load_config(cli, &Overrides::default())?;
            format_tools(&config.tools.definitions(), format)
        }
        #[cfg(feature = "mcp")]
        Commands::Mcp(cmd) => {
            let config = load_config(cli, &Overrides::default())?;
            cmd_mcp(&config, logger, cmd)
        }
    }
}

fn cmd_invoke(
    config: &AppConfig,
    logger: &Logger,
    utterance: &str,
    session_id: Option<String>,
    format: OutputFormat,
) -> Result<String> {
    let runtime = connect(config, logger)?;
    let rt = tokio_runtime()?;
    let response = rt.block_on(runtime.invoke(InvocationRequest::new(utterance, session_id)))?;

    let rendered = match format {
        OutputFormat::Text => serde_json::to_string(&response.to_json()),
        OutputFormat::Json => serde_json::to_string_pretty(&response),
    };
    rendered.map_err(|e| CommandError::OutputFormat(e.to_string()).into())
}

fn cmd_serve(config: &AppConfig, logger: &Logger, host: &str, port: u16) -> Result<String> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| CommandError::InvalidArgument(format!("bad listen address {host}:{port}: {e}")))?;

    let runtime = connect(config, logger)?;
    let rt = tokio_runtime()?;
    rt.block_on(serve(ServerState::new(runtime, logger.clone()), addr, shutdown_signal()))
        .map_err(|e| CommandError::ExecutionFailed(e.to_string()))?;

    Ok(String::new())
}

fn cmd_search(
    config: &AppConfig,
    logger: &Logger,
    query: &str,
    detailed: bool,
    num_results: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let tools = load_tools(config, logger)?;

    if detailed {
        let entries = tools.search_detailed_faq(query, num_results)?;
        format_entries(&render_entries(&entries), &entries, format)
    } else {
        let snippets = tools.search_faq(query)?;
        format_snippets(&render_snippets(&snippets), &snippets, format)
    }
}

fn cmd_reformulate(
    config: &AppConfig,
    logger: &Logger,
    original_query: &str,
    aspect: &str,
    format: OutputFormat,
) -> Result<String> {
    let tools = load_tools(config, logger)?;
    let context = tools.reformulate_query(original_query, aspect)?;
    format_context(&context, aspect, format)
}

#[cfg(feature = "mcp")]
fn cmd_mcp(config: &AppConfig, logger: &Logger, cmd: &McpCommands) -> Result<String> {
    use crate::mcp::{FaqMcpServer, serve_http, serve_stdio};

    let server = FaqMcpServer::new(load_tools(config, logger)?, config.tools.clone());
    let rt = tokio_runtime()?;

    rt.block_on(async {
        match cmd {
            McpCommands::Stdio => serve_stdio(server, logger).await,
            McpCommands::Http { host, port } => serve_http(server, host, *port, logger).await,
        }
    })
    .map_err(|e| CommandError::ExecutionFailed(format!("MCP server error: {e}")))?;

    Ok(String::new())
}
