//! MCP server exposing the FAQ tools.
//!
//! Tool bodies embed the query on the CPU, so each call runs on
//! `spawn_blocking`.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use crate::agent::{ToolName, ToolRegistry};
use crate::error::ToolError;
use crate::tools::{FaqTools, render_entries, render_snippets};

use super::params::{DetailedSearchParams, ReformulateParams, SearchParams};

/// FAQ knowledge base over MCP.
#[derive(Clone)]
pub struct FaqMcpServer {
    tool_router: ToolRouter<Self>,
    tools: Arc<FaqTools>,
    registry: ToolRegistry,
}

impl std::fmt::Debug for FaqMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaqMcpServer")
            .field("tools", &self.tools)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

fn to_mcp(err: ToolError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

impl FaqMcpServer {
    /// Serves `tools`, restricted to the tools enabled in `registry`.
    pub fn new(tools: Arc<FaqTools>, registry: ToolRegistry) -> Self {
        Self {
            tool_router: Self::tool_router(),
            tools,
            registry,
        }
    }

    fn ensure_enabled(&self, tool: ToolName) -> Result<(), McpError> {
        if self.registry.contains(tool) {
            Ok(())
        } else {
            Err(to_mcp(ToolError::UnknownTool {
                name: tool.as_str().to_string(),
            }))
        }
    }

    async fn run_blocking<F>(&self, tool: ToolName, f: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&FaqTools) -> Result<String, ToolError> + Send + 'static,
    {
        self.ensure_enabled(tool)?;
        let tools = Arc::clone(&self.tools);
        let text = tokio::task::spawn_blocking(move || f(&tools))
            .await
            .map_err(|e| McpError::internal_error(format!("Task join error: {e}"), None))?
            .map_err(to_mcp)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_router]
impl FaqMcpServer {
    /// Short snippets of the most relevant FAQ entries.
    #[tool(
        name = "search_faq",
        description = "Search the FAQ knowledge base for entries relevant to a question. Returns short snippets of the top matches."
    )]
    async fn search_faq(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(ToolName::SearchFaq, move |tools| {
            Ok(render_snippets(&tools.search_faq(&params.query)?))
        })
        .await
    }

    /// Full FAQ entries.
    #[tool(
        name = "search_detailed_faq",
        description = "Search the FAQ knowledge base and return complete entries. Use when snippets are not enough to answer."
    )]
    async fn search_detailed_faq(
        &self,
        Parameters(params): Parameters<DetailedSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(ToolName::SearchDetailedFaq, move |tools| {
            Ok(render_entries(
                &tools.search_detailed_faq(&params.query, params.num_results)?,
            ))
        })
        .await
    }

    /// Context block focused on one aspect of the question.
    #[tool(
        name = "reformulate_query",
        description = "Search the FAQ for one specific aspect of the customer's question (for example pricing, shipping or storage) and return the matching entries."
    )]
    async fn reformulate_query(
        &self,
        Parameters(params): Parameters<ReformulateParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking(ToolName::ReformulateQuery, move |tools| {
            tools.reformulate_query(&params.original_query, &params.focus_aspect)
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for FaqMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "faq-agent".to_string(),
                title: Some("FAQ Agent MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "FAQ knowledge base with {} indexed entries. Use `search_faq` for quick lookups, \
                 `search_detailed_faq` for complete answers and `reformulate_query` to focus on \
                 one aspect of a question.",
                self.tools.corpus_size()
            )),
        }
    }
}
