//! Section retrieval for long guides.
//!
//! The [`Retriever`] decides, per document, whether to hand back the whole
//! text or to run a nearest-neighbor search over its sections:
//!
//! 1. Reject a document with no sections ([`RetrievalError::EmptyDocument`]).
//! 2. Join all section texts with blank lines. If the joined text has at most
//!    `size_threshold` characters, return it as [`Retrieval::Full`]. No
//!    embedding or indexing happens on this path.
//! 3. Otherwise embed every section in one provider call, build an
//!    ephemeral index through the registered [`IndexBackend`], embed the
//!    query, and fetch the `min(top_k, sections)` nearest sections.
//! 4. Return them as [`Retrieval::Ranked`], nearest first.
//!
//! The index is local to one call and dropped before returning, so
//! concurrent calls share nothing but the embedding provider.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, RetrievalError};
use crate::index::IndexBackend;
use crate::models::{Document, RankedSection, Retrieval};

/// Default character budget before switching to indexed search.
pub const DEFAULT_SIZE_THRESHOLD: usize = 20_000;

/// Default number of sections returned by indexed search.
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieval tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalParams {
    /// Characters of full text allowed before switching to search.
    pub size_threshold: usize,
    /// Maximum number of ranked sections to return.
    pub top_k: usize,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RetrievalParams {
    pub fn validate(&self) -> Result<()> {
        if self.size_threshold == 0 {
            return Err(RetrievalError::InvalidParameter(
                "size_threshold must be > 0".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidParameter("top_k must be > 0".into()));
        }
        Ok(())
    }

    /// Apply per-request overrides on top of these defaults.
    pub fn with_overrides(self, size_threshold: Option<usize>, top_k: Option<usize>) -> Self {
        Self {
            size_threshold: size_threshold.unwrap_or(self.size_threshold),
            top_k: top_k.unwrap_or(self.top_k),
        }
    }
}

/// The retrieval orchestrator.
///
/// Holds an explicit handle to the embedding provider and, optionally, an
/// index backend. Both are shared, read-only collaborators; all per-call
/// state lives inside [`retrieve`](Retriever::retrieve).
///
/// # Example
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use steam_mcp_core::embedding::EmbeddingProvider;
/// use steam_mcp_core::index::FlatL2Backend;
/// use steam_mcp_core::{Document, RetrievalParams, Retriever};
///
/// # async fn example(provider: Arc<dyn EmbeddingProvider>, doc: Document) {
/// let retriever = Retriever::new(provider, RetrievalParams::default())
///     .with_index_backend(Arc::new(FlatL2Backend));
/// let text = match retriever.retrieve(&doc, "boss strategy").await {
///     Ok(result) => result.render(),
///     Err(e) => e.user_message(),
/// };
/// # }
/// ```
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index_backend: Option<Arc<dyn IndexBackend>>,
    params: RetrievalParams,
}

impl Retriever {
    /// Create a retriever with no index backend registered.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, params: RetrievalParams) -> Self {
        Self {
            embedder,
            index_backend: None,
            params,
        }
    }

    /// Register the index backend used for indexed search.
    pub fn with_index_backend(mut self, backend: Arc<dyn IndexBackend>) -> Self {
        self.index_backend = Some(backend);
        self
    }

    pub fn params(&self) -> RetrievalParams {
        self.params
    }

    /// Retrieve with the retriever's configured parameters.
    pub async fn retrieve(&self, document: &Document, query: &str) -> Result<Retrieval> {
        self.retrieve_with(document, query, self.params).await
    }

    /// Retrieve with explicit parameters for this call.
    pub async fn retrieve_with(
        &self,
        document: &Document,
        query: &str,
        params: RetrievalParams,
    ) -> Result<Retrieval> {
        params.validate()?;
        if document.is_empty() {
            return Err(RetrievalError::EmptyDocument);
        }

        let full_text = document.full_text();
        if full_text.chars().count() <= params.size_threshold {
            return Ok(Retrieval::Full(full_text));
        }

        let backend = self.index_backend.as_ref().ok_or_else(|| {
            RetrievalError::DependencyUnavailable("no vector index backend registered".into())
        })?;

        let texts = document.section_texts();
        let embeddings = self.embedder.embed(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(RetrievalError::EmbeddingCountMismatch {
                sections: texts.len(),
                embeddings: embeddings.len(),
            });
        }

        let index = backend.build(embeddings)?;
        let query_vec = self.embedder.embed_one(query).await?;
        let k = params.top_k.min(document.len());
        let neighbors = index.query(&query_vec, k)?;

        let hits = neighbors
            .into_iter()
            .map(|n| {
                document
                    .sections
                    .get(n.index)
                    .cloned()
                    .map(|section| RankedSection {
                        index: n.index,
                        section,
                        distance: n.distance,
                    })
                    .ok_or(RetrievalError::EmbeddingCountMismatch {
                        sections: document.len(),
                        embeddings: n.index + 1,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Retrieval::Ranked(hits))
    }
}
