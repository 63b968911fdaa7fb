//! Embedding provider trait and vector distance helpers.
//!
//! Defines the [`EmbeddingProvider`] trait that all embedding backends
//! implement. Concrete providers (fastembed, tract, Ollama, OpenAI) live in
//! the `steam-mcp` app crate; tests substitute their own.

use async_trait::async_trait;

use crate::error::{Result, RetrievalError};

/// Trait for embedding providers.
///
/// Implementations must be deterministic for a fixed model (the same text
/// always maps to the same vector) and must return vectors of
/// [`dims`](EmbeddingProvider::dims) length for the lifetime of the process.
///
/// A provider that cannot load its model reports
/// [`RetrievalError::ModelUnavailable`], either from its constructor or
/// from the first call to [`embed`](EmbeddingProvider::embed).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"all-minilm-l6-v2"`).
    fn model_name(&self) -> &str;

    /// Returns the embedding vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;

    /// Embed a batch of texts, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::ModelUnavailable("empty embedding response".into()))
    }
}

/// Squared Euclidean distance between two vectors of equal length.
///
/// Ranks identically to [`l2_distance`] without the square root.
///
/// ```rust
/// use steam_mcp_core::embedding::squared_l2;
///
/// assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
/// ```
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// True Euclidean (L2) distance.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_l2(a, b).sqrt()
}

/// Scale a vector to unit length. Zero vectors are returned unchanged.
pub fn normalize_l2(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-9 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
