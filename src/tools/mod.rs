//! The FAQ tool bodies.
//!
//! [`FaqTools`] holds the read-only store handle and the injected logger and
//! implements `search_faq`, `search_detailed_faq` and `reformulate_query` as
//! plain synchronous functions. The agent executor, the MCP server and the
//! CLI all call through here.

mod reformulate;
mod search;

pub use reformulate::{
    DEFAULT_REFORMULATE_K, ENTRY_DELIMITER, Reformulator, format_context, search_query,
};
pub use search::{DEFAULT_SNIPPET_CHARS, FaqSnippet, NO_RESULTS, render_entries, render_snippets};

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ToolError;
use crate::logging::Logger;
use crate::store::{DocumentStore, FaqEntry};

/// Default result count for `search_faq`.
pub const DEFAULT_SEARCH_K: usize = 3;

/// Default result count for `search_detailed_faq`.
pub const DEFAULT_DETAILED_K: usize = 5;

/// Upper bound on `num_results` for `search_detailed_faq`.
pub const MAX_DETAILED_RESULTS: usize = 20;

/// Result counts and snippet length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// `search_faq` result count.
    pub search_k: usize,
    /// Default `search_detailed_faq` result count.
    pub detailed_k: usize,
    /// `reformulate_query` result count.
    pub reformulate_k: usize,
    /// Snippet length for `search_faq`.
    pub snippet_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            search_k: DEFAULT_SEARCH_K,
            detailed_k: DEFAULT_DETAILED_K,
            reformulate_k: DEFAULT_REFORMULATE_K,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

/// The three FAQ tools over one store.
#[derive(Clone)]
pub struct FaqTools {
    store: Arc<dyn DocumentStore>,
    settings: SearchSettings,
    logger: Logger,
    reformulator: Reformulator,
}

impl std::fmt::Debug for FaqTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaqTools")
            .field("settings", &self.settings)
            .field("entries", &self.store.len())
            .finish_non_exhaustive()
    }
}

fn require_query<'a>(tool: &str, query: &'a str) -> Result<&'a str, ToolError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ToolError::invalid(tool, "query must not be empty"));
    }
    Ok(trimmed)
}

impl FaqTools {
    /// Wires the tools to a store.
    pub fn new(store: Arc<dyn DocumentStore>, settings: SearchSettings, logger: Logger) -> Self {
        let reformulator = Reformulator::new(Arc::clone(&store), settings.reformulate_k, logger.clone());
        Self {
            store,
            settings,
            logger,
            reformulator,
        }
    }

    /// Active settings.
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Number of indexed entries.
    pub fn corpus_size(&self) -> usize {
        self.store.len()
    }

    /// Store lookup shared by both search tools. Failures degrade to no hits.
    fn lookup(&self, tool: &str, query: &str, k: usize) -> Vec<Arc<FaqEntry>> {
        let result = self.store.similarity_search(query, k);
        self.logger.in_scope(|| match result {
            Ok(entries) => {
                if entries.is_empty() {
                    warn!(tool, query, "no FAQ entries matched");
                } else {
                    info!(tool, query, count = entries.len(), "FAQ search");
                }
                entries
            }
            Err(e) => {
                warn!(tool, query, error = %e, "FAQ search failed");
                Vec::new()
            }
        })
    }

    /// Top `search_k` entries as short snippets.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArgument`] for a blank query.
    pub fn search_faq(&self, query: &str) -> Result<Vec<FaqSnippet>, ToolError> {
        let query = require_query("search_faq", query)?;
        Ok(self
            .lookup("search_faq", query, self.settings.search_k)
            .iter()
            .enumerate()
            .map(|(i, entry)| FaqSnippet::from_entry(i + 1, entry, self.settings.snippet_chars))
            .collect())
    }

    /// Full entries, `num_results` of them (default `detailed_k`, max 20).
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArgument`] for a blank query or `num_results`
    /// outside `1..=20`.
    pub fn search_detailed_faq(
        &self,
        query: &str,
        num_results: Option<usize>,
    ) -> Result<Vec<Arc<FaqEntry>>, ToolError> {
        let query = require_query("search_detailed_faq", query)?;
        let k = match num_results {
            Some(0) => {
                return Err(ToolError::invalid(
                    "search_detailed_faq",
                    "num_results must be at least 1",
                ));
            }
            Some(n) if n > MAX_DETAILED_RESULTS => {
                return Err(ToolError::invalid(
                    "search_detailed_faq",
                    format!("num_results must be at most {MAX_DETAILED_RESULTS}"),
                ));
            }
            Some(n) => n,
            None => self.settings.detailed_k,
        };
        Ok(self.lookup("search_detailed_faq", query, k))
    }

    /// Aspect-focused context block. See [`Reformulator::reformulate`].
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArgument`] when `focus_aspect` is blank.
    pub fn reformulate_query(&self, original_query: &str, focus_aspect: &str) -> Result<String, ToolError> {
        self.reformulator.reformulate(original_query, focus_aspect)
    }
}
