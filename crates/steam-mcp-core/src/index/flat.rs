//! Exhaustive (flat) L2 index.
//!
//! Stores vectors contiguously and scores every one of them on each query
//! with squared Euclidean distance. The sort is stable, so equal distances
//! come back in insertion order and results are deterministic. Vectors
//! holding NaN or infinities are rejected on insert and on query.

use crate::embedding::squared_l2;
use crate::error::{Result, RetrievalError};

use super::{IndexBackend, Neighbor, VectorIndex};

/// Flat index over row-major `f32` storage.
pub struct FlatL2Index {
    dims: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of `dims` length.
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            data: Vec::new(),
        }
    }

    /// Append vectors. Every vector must have the index's dimension.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dims) {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dims,
                found: bad.len(),
            });
        }
        if let Some(row) = vectors.iter().position(|v| !all_finite(v)) {
            return Err(RetrievalError::NonFiniteEmbedding(format!(
                "row {}",
                self.len() + row
            )));
        }
        self.data.reserve(vectors.len() * self.dims);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dims..(i + 1) * self.dims]
    }
}

impl VectorIndex for FlatL2Index {
    fn len(&self) -> usize {
        if self.dims == 0 {
            0
        } else {
            self.data.len() / self.dims
        }
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn query(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        if query.len() != self.dims {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dims,
                found: query.len(),
            });
        }
        if !all_finite(query) {
            return Err(RetrievalError::NonFiniteEmbedding("query".into()));
        }

        let mut hits: Vec<Neighbor> = (0..self.len())
            .map(|index| Neighbor {
                index,
                distance: squared_l2(self.row(index), query),
            })
            .collect();

        // `sort_by` is stable: ties stay in insertion order.
        // Squared distances of finite inputs can still overflow to +inf.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k.min(self.len()));
        Ok(hits)
    }
}

fn all_finite(v: &[f32]) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Backend producing [`FlatL2Index`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatL2Backend;

impl IndexBackend for FlatL2Backend {
    fn name(&self) -> &str {
        "flat-l2"
    }

    fn build(&self, vectors: Vec<Vec<f32>>) -> Result<Box<dyn VectorIndex>> {
        let dims = vectors.first().map(|v| v.len()).unwrap_or(0);
        let mut index = FlatL2Index::new(dims);
        index.add(&vectors)?;
        Ok(Box::new(index))
    }
}
