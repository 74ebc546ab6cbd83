//! MCP tool parameter types.
//!
//! `schemars` derives the input schemas the MCP protocol advertises.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for `search_faq`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The customer's question or search terms.
    pub query: String,
}

/// Parameters for `search_detailed_faq`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DetailedSearchParams {
    /// The customer's question or search terms.
    pub query: String,

    /// How many entries to return (1-20, default 5).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_results: Option<usize>,
}

/// Parameters for `reformulate_query`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReformulateParams {
    /// The customer's original question. May be empty.
    #[serde(default)]
    pub original_query: String,

    /// The aspect to focus the search on, e.g. `shipping` or `pricing`.
    pub focus_aspect: String,
}
