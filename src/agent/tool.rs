//! Tool definitions and the explicit tool registry.
//!
//! The model sees a JSON-schema definition for each enabled tool. Which
//! tools are enabled is decided once at startup by [`ToolRegistry`];
//! unknown names are a configuration error, not a runtime surprise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ConfigError;
use crate::tools::MAX_DETAILED_RESULTS;

/// A tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name, matching [`ToolName::as_str`].
    pub name: String,
    /// What the tool does and when to use it.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id.
    pub id: String,
    /// Requested tool.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

/// Outcome of one tool call, fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Call this answers.
    pub tool_call_id: String,
    /// Rendered output or error message.
    pub content: String,
    /// Whether the call failed.
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result.
    pub fn ok(call: &ToolCall, content: String) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            content,
            is_error: false,
        }
    }

    /// Failed result carrying `message`.
    pub fn error(call: &ToolCall, message: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            content: message.into(),
            is_error: true,
        }
    }
}

/// The FAQ tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Quick top-K search returning snippets.
    SearchFaq,
    /// Wider search returning full entries.
    SearchDetailedFaq,
    /// Aspect-focused search.
    ReformulateQuery,
}

impl ToolName {
    /// Every tool, in advertisement order.
    pub const ALL: [Self; 3] = [Self::SearchFaq, Self::SearchDetailedFaq, Self::ReformulateQuery];

    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SearchFaq => "search_faq",
            Self::SearchDetailedFaq => "search_detailed_faq",
            Self::ReformulateQuery => "reformulate_query",
        }
    }

    /// JSON-schema definition sent to the model.
    pub fn definition(self) -> ToolDefinition {
        let (description, parameters) = match self {
            Self::SearchFaq => (
                "Search the FAQ knowledge base for relevant information. Use this first when \
                 the user asks about products, services, prices or policies.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query to find relevant FAQ entries."
                        }
                    },
                    "required": ["query"],
                    "additionalProperties": false
                }),
            ),
            Self::SearchDetailedFaq => (
                "Search the FAQ knowledge base with more results and full entries. Use this \
                 when the initial search does not provide enough information.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query."
                        },
                        "num_results": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": MAX_DETAILED_RESULTS,
                            "description": "Number of entries to retrieve. Defaults to 5."
                        }
                    },
                    "required": ["query"],
                    "additionalProperties": false
                }),
            ),
            Self::ReformulateQuery => (
                "Search for one specific aspect of the user's question (for example \
                 \"pricing\", \"shipping\" or \"storage\"). Use this for complex questions \
                 that touch several topics.",
                json!({
                    "type": "object",
                    "properties": {
                        "original_query": {
                            "type": "string",
                            "description": "The original user question. May be empty."
                        },
                        "focus_aspect": {
                            "type": "string",
                            "description": "The aspect to focus the search on."
                        }
                    },
                    "required": ["original_query", "focus_aspect"],
                    "additionalProperties": false
                }),
            ),
        };

        ToolDefinition {
            name: self.as_str().to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// The set of tools enabled for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRegistry {
    enabled: Vec<ToolName>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::all()
    }
}

impl ToolRegistry {
    /// All three tools.
    pub fn all() -> Self {
        Self {
            enabled: ToolName::ALL.to_vec(),
        }
    }

    /// Enables the named tools, in the given order, ignoring duplicates.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownTool`] for the first unrecognised name.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut enabled = Vec::with_capacity(names.len());
        for name in names {
            let tool: ToolName = name.as_ref().trim().parse()?;
            if !enabled.contains(&tool) {
                enabled.push(tool);
            }
        }
        Ok(Self { enabled })
    }

    /// Whether `tool` is enabled.
    pub fn contains(&self, tool: ToolName) -> bool {
        self.enabled.contains(&tool)
    }

    /// Resolves a wire name to an enabled tool.
    pub fn resolve(&self, name: &str) -> Option<ToolName> {
        name.parse().ok().filter(|t| self.contains(*t))
    }

    /// Enabled tools.
    pub fn names(&self) -> &[ToolName] {
        &self.enabled
    }

    /// Definitions of the enabled tools.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.enabled.iter().map(|t| t.definition()).collect()
    }

    /// Number of enabled tools.
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Whether no tool is enabled.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("search_faq", ToolName::SearchFaq)]
    #[test_case("search_detailed_faq", ToolName::SearchDetailedFaq)]
    #[test_case("reformulate_query", ToolName::ReformulateQuery)]
    fn test_name_round_trip(name: &str, expected: ToolName) {
        assert_eq!(name.parse::<ToolName>().ok(), Some(expected));
        assert_eq!(expected.to_string(), name);
    }

    #[test]
    fn test_unknown_name_fails_fast() {
        let result = ToolRegistry::from_names(&["search_faq", "delete_everything"]);
        assert!(matches!(
            result,
            Err(ConfigError::UnknownTool { ref name }) if name == "delete_everything"
        ));
    }

    #[test]
    fn test_subset_and_resolve() {
        let registry = ToolRegistry::from_names(&["search_faq", " search_faq "])
            .unwrap_or_else(|_| ToolRegistry::all());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("search_faq"), Some(ToolName::SearchFaq));
        assert_eq!(registry.resolve("reformulate_query"), None);
        assert_eq!(registry.resolve("nope"), None);
    }

    #[test]
    fn test_definitions_are_object_schemas() {
        let defs = ToolRegistry::all().definitions();
        assert_eq!(defs.len(), 3);
        for def in &defs {
            assert!(!def.description.is_empty());
            assert_eq!(def.parameters["type"], "object");
            assert!(def.parameters["required"].is_array());
        }
        assert_eq!(defs[1].parameters["properties"]["num_results"]["maximum"], 20);
    }

    #[test]
    fn test_result_constructors() {
        let call = ToolCall {
            id: "call_9".to_string(),
            name: "search_faq".to_string(),
            arguments: "{}".to_string(),
        };
        assert!(!ToolResult::ok(&call, "ok".to_string()).is_error);
        let err = ToolResult::error(&call, "bad");
        assert!(err.is_error);
        assert_eq!(err.tool_call_id, "call_9");
    }
}
