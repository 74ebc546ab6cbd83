//! Aspect-focused query reformulation.
//!
//! Runs a store search narrowed to one aspect of the user's question and
//! packs the matches into a single labelled, delimited context block.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ToolError;
use crate::logging::Logger;
use crate::store::{DocumentStore, FaqEntry};

/// Separator placed between entries in a reformulated context.
pub const ENTRY_DELIMITER: &str = "\n\n--\n\n";

/// Default number of entries retrieved per reformulation.
pub const DEFAULT_REFORMULATE_K: usize = 3;

const TOOL_NAME: &str = "reformulate_query";

/// Builds the store query for an aspect.
///
/// `"{aspect} related to {original}"`, or just the aspect when the original
/// query is blank.
pub fn search_query(original_query: &str, focus_aspect: &str) -> String {
    let original = original_query.trim();
    let aspect = focus_aspect.trim();
    if original.is_empty() {
        aspect.to_string()
    } else {
        format!("{aspect} related to {original}")
    }
}

/// Formats a result set as `Results for '<aspect>' aspect:\n` followed by
/// `Entry {i}:\n{content}` blocks joined with [`ENTRY_DELIMITER`].
pub fn format_context(focus_aspect: &str, entries: &[Arc<FaqEntry>]) -> String {
    let body = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("Entry {}:\n{}", i + 1, entry.page_content()))
        .collect::<Vec<_>>()
        .join(ENTRY_DELIMITER);
    format!("Results for '{focus_aspect}' aspect:\n{body}")
}

/// Retrieves and formats entries for one focus aspect.
#[derive(Clone)]
pub struct Reformulator {
    store: Arc<dyn DocumentStore>,
    top_k: usize,
    logger: Logger,
}

impl std::fmt::Debug for Reformulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reformulator")
            .field("top_k", &self.top_k)
            .field("entries", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl Reformulator {
    /// Creates a reformulator over `store` retrieving `top_k` entries.
    pub fn new(store: Arc<dyn DocumentStore>, top_k: usize, logger: Logger) -> Self {
        Self {
            store,
            top_k,
            logger,
        }
    }

    /// Number of entries retrieved per call.
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the formatted context for `focus_aspect`.
    ///
    /// A store failure or an empty result set yields the header with an empty
    /// body. Writes exactly one log record per call.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArgument`] when `focus_aspect` is blank.
    pub fn reformulate(&self, original_query: &str, focus_aspect: &str) -> Result<String, ToolError> {
        if focus_aspect.trim().is_empty() {
            return Err(ToolError::invalid(TOOL_NAME, "focus_aspect must not be empty"));
        }

        let query = search_query(original_query, focus_aspect);
        let entries = match self.store.similarity_search(&query, self.top_k) {
            Ok(entries) => {
                self.logger.in_scope(|| {
                    info!(
                        count = entries.len(),
                        aspect = focus_aspect,
                        "reformulated query"
                    );
                });
                entries
            }
            Err(e) => {
                self.logger.in_scope(|| {
                    warn!(
                        count = 0,
                        aspect = focus_aspect,
                        error = %e,
                        "reformulation search failed"
                    );
                });
                Vec::new()
            }
        };

        Ok(format_context(focus_aspect, &entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::logging::capture;

    struct FixedStore(Vec<Arc<FaqEntry>>);

    impl DocumentStore for FixedStore {
        fn similarity_search(&self, _query: &str, k: usize) -> Result<Vec<Arc<FaqEntry>>, StoreError> {
            Ok(self.0.iter().take(k).cloned().collect())
        }

        fn len(&self) -> usize {
            self.0.len()
        }
    }

    struct BrokenStore;

    impl DocumentStore for BrokenStore {
        fn similarity_search(&self, _query: &str, _k: usize) -> Result<Vec<Arc<FaqEntry>>, StoreError> {
            Err(StoreError::Unavailable {
                message: "index offline".to_string(),
            })
        }

        fn len(&self) -> usize {
            0
        }
    }

    fn entries(n: usize) -> Vec<Arc<FaqEntry>> {
        (1..=n)
            .map(|i| Arc::new(FaqEntry::new(format!("Q: question {i}\nA: answer {i}"))))
            .collect()
    }

    #[test]
    fn test_search_query() {
        assert_eq!(search_query("buy almonds", "shipping"), "shipping related to buy almonds");
        assert_eq!(search_query("  ", "shipping"), "shipping");
    }

    #[test]
    fn test_format_context() {
        let text = format_context("pricing", &entries(2));
        assert_eq!(
            text,
            "Results for 'pricing' aspect:\nEntry 1:\nQ: question 1\nA: answer 1\n\n--\n\nEntry 2:\nQ: question 2\nA: answer 2"
        );
    }

    #[test]
    fn test_format_context_empty() {
        assert_eq!(format_context("pricing", &[]), "Results for 'pricing' aspect:\n");
    }

    #[test]
    fn test_blank_aspect_rejected() {
        let r = Reformulator::new(Arc::new(FixedStore(entries(3))), 3, Logger::disabled());
        assert!(matches!(r.reformulate("", ""), Err(ToolError::InvalidArgument { .. })));
        assert!(matches!(r.reformulate("almonds", " \t"), Err(ToolError::InvalidArgument { .. })));
    }

    #[test]
    fn test_top_k_respected() {
        let r = Reformulator::new(Arc::new(FixedStore(entries(5))), 3, Logger::disabled());
        let text = r.reformulate("almonds", "pricing").unwrap_or_default();
        assert_eq!(text.matches(ENTRY_DELIMITER).count(), 2);
        assert!(!text.contains("Entry 4:"));
    }

    #[test]
    fn test_single_log_record_with_count_and_aspect() {
        let (logger, buffer) = capture::logger();
        let r = Reformulator::new(Arc::new(FixedStore(entries(2))), 3, logger);
        let _ = r.reformulate("almonds", "pricing");

        let logs = buffer.contents();
        assert_eq!(logs.lines().count(), 1);
        assert!(logs.contains("count=2"));
        assert!(logs.contains("aspect=\"pricing\""));
    }

    #[test]
    fn test_store_failure_degrades_to_empty_body() {
        let (logger, buffer) = capture::logger();
        let r = Reformulator::new(Arc::new(BrokenStore), 3, logger);
        let text = r.reformulate("almonds", "shipping").unwrap_or_default();

        assert_eq!(text, "Results for 'shipping' aspect:\n");
        let logs = buffer.contents();
        assert_eq!(logs.lines().count(), 1);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("index offline"));
    }
}
