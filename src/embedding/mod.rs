//! Text embedding backends.
//!
//! The document store only needs "text in, vector out". Two backends:
//!
//! - [`HashEmbedder`]: deterministic feature hashing, no model download.
//!   Used in tests and as the fallback when `fastembed` is not compiled in.
//! - `FastEmbedder` (feature `fastembed-embeddings`): ONNX sentence
//!   embeddings, `all-MiniLM-L6-v2` by default.

mod hash;

#[cfg(feature = "fastembed-embeddings")]
mod onnx;

pub use hash::HashEmbedder;

#[cfg(feature = "fastembed-embeddings")]
pub use onnx::FastEmbedder;

use crate::error::{ConfigError, StoreError};

/// Default embedding dimensionality (matches `all-MiniLM-L6-v2`).
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Default sentence-embedding model name.
pub const DEFAULT_MODEL: &str = "all-minilm-l6-v2";

/// Name of the embedder used when none is configured.
#[must_use]
pub const fn default_embedder_name() -> &'static str {
    if cfg!(feature = "fastembed-embeddings") {
        "fastembed"
    } else {
        "hash"
    }
}

/// Turns text into fixed-size vectors.
pub trait Embedder: Send + Sync {
    /// Model identifier.
    fn model_name(&self) -> &str;

    /// Vector length.
    fn dimensions(&self) -> usize;

    /// Embeds one text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError>;

    /// Embeds many texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Creates an embedder by name (`hash` or `fastembed`).
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedEmbedder`] for unknown names or when
/// `fastembed` was requested but not compiled in.
pub fn create_embedder(name: &str, model: &str) -> Result<Box<dyn Embedder>, ConfigError> {
    match name {
        "hash" => Ok(Box::new(HashEmbedder::new(DEFAULT_DIMENSIONS))),
        #[cfg(feature = "fastembed-embeddings")]
        "fastembed" => Ok(Box::new(FastEmbedder::new(model).map_err(|e| {
            ConfigError::InvalidValue {
                key: "embedding model".to_string(),
                message: e.to_string(),
            }
        })?)),
        other => {
            let _ = model;
            Err(ConfigError::UnsupportedEmbedder {
                name: other.to_string(),
            })
        }
    }
}

/// Cosine similarity in `[-1.0, 1.0]`.
///
/// Returns `0.0` for empty vectors, mismatched lengths, or zero vectors.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
