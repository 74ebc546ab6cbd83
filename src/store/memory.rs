//! Brute-force in-memory vector store.

use std::sync::Arc;

use super::{DocumentStore, FaqEntry};
use crate::embedding::{Embedder, cosine_similarity};
use crate::error::StoreError;

/// Entries and their embeddings, scanned linearly per query.
pub struct InMemoryStore {
    entries: Vec<Arc<FaqEntry>>,
    vectors: Vec<Vec<f32>>,
    embedder: Box<dyn Embedder>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entries", &self.entries.len())
            .field("embedder", &self.embedder.model_name())
            .finish()
    }
}

impl InMemoryStore {
    /// Embeds every entry up front.
    pub fn build(entries: Vec<FaqEntry>, embedder: Box<dyn Embedder>) -> Result<Self, StoreError> {
        let texts: Vec<String> = entries.iter().map(|e| e.page_content().to_string()).collect();
        let vectors = embedder.embed_batch(&texts)?;

        if vectors.len() != entries.len() {
            return Err(StoreError::Embedding {
                message: format!(
                    "expected {} embeddings, got {}",
                    entries.len(),
                    vectors.len()
                ),
            });
        }

        Ok(Self {
            entries: entries.into_iter().map(Arc::new).collect(),
            vectors,
            embedder,
        })
    }
}

impl DocumentStore for InMemoryStore {
    fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Arc<FaqEntry>>, StoreError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query)?;
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(&query_vector, v)))
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, _)| Arc::clone(&self.entries[i]))
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn store() -> InMemoryStore {
        let entries = vec![
            FaqEntry::new("Q: Do you ship internationally?\nA: Yes, to the EU and UK."),
            FaqEntry::new("Q: What is the price of almonds?\nA: Almonds cost $12 per kg."),
            FaqEntry::new("Q: Are your cashews roasted?\nA: Cashews come raw or roasted."),
        ];
        InMemoryStore::build(entries, Box::new(HashEmbedder::new(256)))
            .unwrap_or_else(|_| InMemoryStore {
                entries: Vec::new(),
                vectors: Vec::new(),
                embedder: Box::new(HashEmbedder::new(1)),
            })
    }

    #[test]
    fn test_most_relevant_first() {
        let results = store().similarity_search("almond price", 2).unwrap_or_default();
        assert_eq!(results.len(), 2);
        assert!(results[0].page_content().contains("almonds"));
    }

    #[test]
    fn test_k_larger_than_corpus() {
        let results = store().similarity_search("nuts", 10).unwrap_or_default();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        // A query with no tokens scores zero against everything.
        let results = store().similarity_search("?!", 3).unwrap_or_default();
        assert!(results[0].page_content().contains("ship"));
        assert!(results[2].page_content().contains("cashews"));
    }

    #[test]
    fn test_zero_k_and_empty_store() {
        assert!(store().similarity_search("almonds", 0).unwrap_or_default().is_empty());
        let empty = InMemoryStore::build(Vec::new(), Box::new(HashEmbedder::new(8)));
        assert!(empty.map(|s| s.is_empty()).unwrap_or(false));
    }
}
