//! Feature-hashing embedder.
//!
//! Lowercased word tokens are hashed into a fixed number of buckets with a
//! signed count, then L2-normalised. Cosine similarity between two vectors
//! then approximates normalised word overlap. Deterministic within a build.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::Embedder;
use crate::error::StoreError;

/// Bag-of-words embedder using the hashing trick.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Creates an embedder producing vectors of length `dimensions` (min 1).
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Splits text into normalised tokens.
    ///
    /// Plural `s` is dropped from words longer than three characters so that
    /// "almonds" and "almond" share a bucket.
    fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| {
                let lower = t.to_lowercase();
                match lower.strip_suffix('s') {
                    Some(stem) if lower.chars().count() > 3 && !stem.ends_with('s') => {
                        stem.to_string()
                    }
                    _ => lower,
                }
            })
    }
}

impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "feature-hash"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[allow(clippy::cast_possible_truncation)]
    fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        let mut vector = vec![0.0f32; self.dimensions];

        for token in Self::tokens(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let h = hasher.finish();
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut vector {
                *x /= norm;
            }
        }

        Ok(vector)
    }
}
