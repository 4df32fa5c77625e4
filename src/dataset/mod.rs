//! Validated, immutable vector datasets
//!
//! A [`Dataset`] always holds at least one vector, every vector has the same
//! non-zero dimension, and every component is finite and within
//! [`magnitude_limit`]. Loading from JSON lines lives in [`jsonl`], synthetic
//! data in [`generate`].

pub mod generate;
pub mod jsonl;

use crate::error::ClusterError;

pub use generate::{generate_clusters, GeneratorConfig, SyntheticClusters};

/// Numeric component type accepted by the engine
///
/// Every component is widened to f64 before any arithmetic.
pub trait Component: Copy + Send + Sync + Into<f64> + 'static {}

impl Component for f32 {}
impl Component for f64 {}

/// Ordered collection of N vectors sharing dimension D
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T = f64> {
    vectors: Vec<Vec<T>>,
    dimension: usize,
}

/// Largest component magnitude accepted for a dataset of `len` vectors of
/// `dimension` components
///
/// Within this bound a squared distance between two points of the hull stays
/// below `f64::MAX / (4 * len)`, so distances, inertia and per-cluster sums remain
/// finite in f64.
pub fn magnitude_limit(len: usize, dimension: usize) -> f64 {
    let terms = (len.max(1) as f64) * (dimension.max(1) as f64);
    (f64::MAX / terms).sqrt() / 4.0
}

impl<T: Component> Dataset<T> {
    /// Validate and wrap a set of vectors
    pub fn new(vectors: Vec<Vec<T>>) -> Result<Self, ClusterError> {
        let first = vectors
            .first()
            .ok_or_else(|| ClusterError::invalid("dataset is empty"))?;

        let dimension = first.len();
        if dimension == 0 {
            return Err(ClusterError::invalid("vectors must have at least one component"));
        }

        let limit = magnitude_limit(vectors.len(), dimension);
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(ClusterError::invalid(format!(
                    "vector {} has dimension {} but expected {}",
                    i,
                    vector.len(),
                    dimension
                )));
            }
            if let Some(j) = vector.iter().position(|&x| !x.into().is_finite()) {
                return Err(ClusterError::invalid(format!(
                    "vector {} component {} is not finite",
                    i, j
                )));
            }
            if let Some(j) = vector.iter().position(|&x| x.into().abs() > limit) {
                return Err(ClusterError::invalid(format!(
                    "vector {} component {} exceeds magnitude limit {:e}",
                    i, j, limit
                )));
            }
        }

        Ok(Self { vectors, dimension })
    }

    /// Number of vectors (N)
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Components per vector (D)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn vectors(&self) -> &[Vec<T>] {
        &self.vectors
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&[T]> {
        self.vectors.get(idx).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.vectors.iter().map(Vec::as_slice)
    }

    pub fn into_vectors(self) -> Vec<Vec<T>> {
        self.vectors
    }
}
