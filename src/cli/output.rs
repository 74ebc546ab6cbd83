//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::agent::ToolDefinition;
use crate::error::{CommandError, Result};
use crate::store::FaqEntry;
use crate::tools::FaqSnippet;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name; anything other than `json` is text.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| CommandError::OutputFormat(e.to_string()).into())
}

/// Snippets from `search_faq`.
pub fn format_snippets(rendered: &str, snippets: &[FaqSnippet], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(rendered.to_string()),
        OutputFormat::Json => to_json(snippets),
    }
}

/// Full entries from `search_detailed_faq`.
pub fn format_entries<E>(rendered: &str, entries: &[E], format: OutputFormat) -> Result<String>
where
    E: AsRef<FaqEntry>,
{
    match format {
        OutputFormat::Text => Ok(rendered.to_string()),
        OutputFormat::Json => {
            let entries: Vec<&FaqEntry> = entries.iter().map(AsRef::as_ref).collect();
            to_json(&entries)
        }
    }
}

/// The reformulated context block.
pub fn format_context(context: &str, aspect: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(context.to_string()),
        OutputFormat::Json => to_json(&serde_json::json!({
            "focus_aspect": aspect,
            "context": context,
        })),
    }
}

/// Tool definitions offered to the model.
pub fn format_tools(tools: &[ToolDefinition], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(tools),
        OutputFormat::Text => {
            let mut out = String::new();
            for tool in tools {
                let _ = writeln!(out, "{}", tool.name);
                let _ = writeln!(out, "    {}", tool.description);
            }
            Ok(out)
        }
    }
}
