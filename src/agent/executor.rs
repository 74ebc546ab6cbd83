//! Dispatches model tool calls to [`FaqTools`].
//!
//! Arguments arrive as JSON text from the model. Bad input becomes an
//! error [`ToolResult`] the model can read and correct; it never aborts
//! the turn.

use std::sync::Arc;

use serde::Deserialize;
use tracing::Span;

use super::tool::{ToolCall, ToolName, ToolRegistry, ToolResult};
use crate::error::ToolError;
use crate::tools::{FaqTools, render_entries, render_snippets};

/// Maximum raw byte length of tool argument JSON from the model.
const MAX_TOOL_ARGS_LEN: usize = 100_000;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchArgs {
    query: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedSearchArgs {
    query: String,
    #[serde(default)]
    num_results: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReformulateArgs {
    #[serde(default)]
    original_query: String,
    focus_aspect: String,
}

fn parse_args<'a, T: Deserialize<'a>>(tool: ToolName, raw: &'a str) -> Result<T, ToolError> {
    // Some models send an empty string for "no arguments".
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|e| ToolError::invalid(tool.as_str(), e.to_string()))
}

/// Executes tool calls against a shared [`FaqTools`].
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    tools: Arc<FaqTools>,
    registry: ToolRegistry,
}

impl ToolExecutor {
    /// Creates an executor for the enabled tools in `registry`.
    pub const fn new(tools: Arc<FaqTools>, registry: ToolRegistry) -> Self {
        Self { tools, registry }
    }

    /// The enabled tools.
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs one tool call.
    ///
    /// The tool body embeds the query and scans the store, so it runs on
    /// the blocking pool inside the caller's span.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            return ToolResult::error(
                call,
                format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            );
        }

        let Some(tool) = self.registry.resolve(&call.name) else {
            let err = ToolError::UnknownTool {
                name: call.name.clone(),
            };
            return ToolResult::error(call, err.to_string());
        };

        let tools = Arc::clone(&self.tools);
        let raw = call.arguments.clone();
        let span = Span::current();
        let outcome =
            tokio::task::spawn_blocking(move || span.in_scope(|| dispatch(&tools, tool, &raw))).await;

        match outcome {
            Ok(Ok(content)) => ToolResult::ok(call, content),
            Ok(Err(e)) => ToolResult::error(call, e.to_string()),
            Err(e) => ToolResult::error(call, format!("tool task failed: {e}")),
        }
    }
}

fn dispatch(tools: &FaqTools, tool: ToolName, raw: &str) -> Result<String, ToolError> {
    match tool {
        ToolName::SearchFaq => {
            let args: SearchArgs = parse_args(tool, raw)?;
            Ok(render_snippets(&tools.search_faq(&args.query)?))
        }
        ToolName::SearchDetailedFaq => {
            let args: DetailedSearchArgs = parse_args(tool, raw)?;
            Ok(render_entries(
                &tools.search_detailed_faq(&args.query, args.num_results)?,
            ))
        }
        ToolName::ReformulateQuery => {
            let args: ReformulateArgs = parse_args(tool, raw)?;
            tools.reformulate_query(&args.original_query, &args.focus_aspect)
        }
    }
}
