//! Vector index abstraction.
//!
//! The retrieval pipeline depends only on the build/query contract below,
//! never on a particular algorithm. [`flat::FlatL2Backend`] performs an
//! exhaustive scan, which is the right tool at the scale of one guide's
//! sections; an approximate backend can be slotted in behind the same
//! traits.
//!
//! Indexes are ephemeral: one is built per retrieval call from a single
//! document's embeddings and dropped when the call returns.
//!
//! # Contract
//!
//! | Method | Guarantee |
//! |--------|-----------|
//! | [`IndexBackend::build`] | vector `i` is addressable as index `i`; all vectors share one dimension |
//! | [`VectorIndex::query`] | at most `min(k, len)` hits, ascending distance, ties in insertion order |

pub mod flat;

use serde::Serialize;

use crate::error::Result;

pub use flat::{FlatL2Backend, FlatL2Index};

/// A single nearest-neighbor hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Insertion position of the matched vector.
    pub index: usize,
    /// Distance to the query vector under the backend's L2-consistent metric.
    pub distance: f32,
}

/// A built, queryable set of vectors.
pub trait VectorIndex: Send + Sync {
    /// Number of stored vectors.
    fn len(&self) -> usize;

    /// Dimension shared by all stored vectors.
    fn dims(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the `k` nearest stored vectors to `query`.
    ///
    /// `k` is clamped to [`len`](VectorIndex::len). Querying an empty index
    /// fails with [`RetrievalError::EmptyIndex`](crate::error::RetrievalError::EmptyIndex).
    fn query(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}

/// Factory for [`VectorIndex`] instances.
///
/// Registered with the [`Retriever`](crate::retrieval::Retriever) as an
/// optional capability; when none is registered, indexed search reports
/// [`RetrievalError::DependencyUnavailable`](crate::error::RetrievalError::DependencyUnavailable).
pub trait IndexBackend: Send + Sync {
    /// Backend identifier (e.g. `"flat-l2"`).
    fn name(&self) -> &str;

    /// Bulk-insert `vectors` into a fresh index.
    fn build(&self, vectors: Vec<Vec<f32>>) -> Result<Box<dyn VectorIndex>>;
}
