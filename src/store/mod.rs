//! FAQ corpus and similarity search.
//!
//! Entries are loaded once from CSV, optionally split into chunks, embedded
//! and held in memory. Nothing mutates an entry after load; callers share
//! them as `Arc<FaqEntry>`.

mod loader;
mod memory;
mod splitter;

pub use loader::load_faq_csv;
pub use memory::InMemoryStore;
pub use splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextSplitter};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::embedding::Embedder;
use crate::error::StoreError;

/// One unit of retrievable knowledge-base content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    page_content: String,
    metadata: BTreeMap<String, String>,
}

impl FaqEntry {
    /// Creates an entry with no metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Entry text.
    pub fn page_content(&self) -> &str {
        &self.page_content
    }

    /// Entry metadata.
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

/// Read-only similarity search over FAQ entries.
pub trait DocumentStore: Send + Sync {
    /// Returns up to `k` entries ordered by descending relevance to `query`.
    fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Arc<FaqEntry>>, StoreError>;

    /// Number of indexed entries.
    fn len(&self) -> usize;

    /// Whether the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads a CSV corpus, splits it and builds an [`InMemoryStore`].
pub fn build_store(
    path: &Path,
    embedder: Box<dyn Embedder>,
    splitter: &TextSplitter,
) -> Result<InMemoryStore, StoreError> {
    let entries = load_faq_csv(path)?;
    let rows = entries.len();
    let chunks = splitter.split_entries(entries);

    tracing::info!(
        path = %path.display(),
        rows,
        chunks = chunks.len(),
        embedder = embedder.model_name(),
        "loaded FAQ corpus"
    );

    InMemoryStore::build(chunks, embedder)
}
