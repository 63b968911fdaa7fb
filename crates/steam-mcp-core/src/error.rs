//! Error taxonomy for section retrieval.

use thiserror::Error;

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Failures the retrieval pipeline can detect.
///
/// Each variant is a distinct condition with a distinct remedy; none of
/// them is ever turned into a degraded success (for example, a missing
/// index backend never falls back to returning the full text).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    /// The document has no sections to return or search.
    #[error("no sections found in document")]
    EmptyDocument,

    /// The vector index backend is not available.
    #[error("search backend unavailable: {0}")]
    DependencyUnavailable(String),

    /// The embedding model could not be loaded or failed to run.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// A query was issued against an index with no vectors.
    #[error("cannot query an empty index")]
    EmptyIndex,

    /// Vectors of different dimensions were mixed in one index or query.
    #[error("embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A vector holds NaN or an infinite value and cannot be ranked.
    #[error("embedding contains a non-finite value ({0})")]
    NonFiniteEmbedding(String),

    /// The provider returned a different number of vectors than inputs.
    #[error("embedding count mismatch: {sections} sections but {embeddings} embeddings")]
    EmbeddingCountMismatch { sections: usize, embeddings: usize },

    /// A retrieval parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RetrievalError {
    /// Human-readable message for tool callers.
    ///
    /// These strings are what a tool invocation returns in place of a
    /// result, so each one names the condition and what is missing.
    pub fn user_message(&self) -> String {
        match self {
            RetrievalError::EmptyDocument => "Info: No sections found in guide.".to_string(),
            RetrievalError::DependencyUnavailable(detail) => format!(
                "Error: A vector search backend is required for large-guide search but is not available ({}).",
                detail
            ),
            RetrievalError::ModelUnavailable(detail) => {
                format!("Error: Embedding model unavailable: {}", detail)
            }
            other => format!("Error: Guide search failed: {}", other),
        }
    }
}
