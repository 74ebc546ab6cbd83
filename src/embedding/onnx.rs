//! ONNX sentence embeddings via `fastembed`.

use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::Embedder;
use crate::error::StoreError;

const BATCH_SIZE: usize = 32;

/// Sentence-transformer embedder backed by `fastembed`.
///
/// `TextEmbedding::embed` takes `&mut self`, so the model sits behind a mutex.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
    name: &'static str,
    dimensions: usize,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

fn resolve_model(name: &str) -> Result<(EmbeddingModel, &'static str, usize), StoreError> {
    match name {
        "all-minilm-l6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, "all-minilm-l6-v2", 384)),
        "all-minilm-l12-v2" => Ok((EmbeddingModel::AllMiniLML12V2, "all-minilm-l12-v2", 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, "bge-small-en-v1.5", 384)),
        "bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, "bge-base-en-v1.5", 768)),
        other => Err(StoreError::Embedding {
            message: format!(
                "unknown embedding model '{other}' (supported: all-minilm-l6-v2, \
                 all-minilm-l12-v2, bge-small-en-v1.5, bge-base-en-v1.5)"
            ),
        }),
    }
}

impl FastEmbedder {
    /// Loads (downloading on first use) the named model.
    pub fn new(model: &str) -> Result<Self, StoreError> {
        let (variant, name, dimensions) = resolve_model(model)?;
        tracing::debug!(model = name, "loading embedding model");

        let embedding = TextEmbedding::try_new(InitOptions::new(variant)).map_err(|e| {
            StoreError::Embedding {
                message: format!("failed to initialize {name}: {e}"),
            }
        })?;

        Ok(Self {
            model: Mutex::new(embedding),
            name,
            dimensions,
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, TextEmbedding>, StoreError> {
        self.model.lock().map_err(|_| StoreError::Embedding {
            message: "embedding model lock poisoned".to_string(),
        })
    }
}

impl Embedder for FastEmbedder {
    fn model_name(&self) -> &str {
        self.name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| StoreError::Embedding {
                message: "model returned no embedding".to_string(),
            })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.lock()?;
        model
            .embed(texts.to_vec(), Some(BATCH_SIZE))
            .map_err(|e| StoreError::Embedding {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_rejected() {
        assert!(matches!(
            resolve_model("word2vec"),
            Err(StoreError::Embedding { .. })
        ));
    }

    #[test]
    fn test_default_model_dimensions() {
        let resolved = resolve_model(crate::embedding::DEFAULT_MODEL);
        assert!(matches!(resolved, Ok((_, "all-minilm-l6-v2", 384))));
    }
}
