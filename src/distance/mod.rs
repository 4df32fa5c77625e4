//! Distance calculation
//!
//! Squared Euclidean distance is the only metric k-means needs. All kernels
//! accumulate in f64 regardless of the input component type.

pub mod scalar;

use crate::dataset::Component;

pub use scalar::{l2_scalar, l2_squared_scalar};

/// Squared Euclidean distance between two vectors
#[inline]
pub fn squared_euclidean<A: Component, B: Component>(a: &[A], b: &[B]) -> f64 {
    l2_squared_scalar(a, b)
}

/// Euclidean distance between two vectors
#[inline]
pub fn euclidean<A: Component, B: Component>(a: &[A], b: &[B]) -> f64 {
    l2_scalar(a, b)
}

/// Find the nearest centroid for a vector
///
/// Returns `(centroid_index, squared_distance)`. Ties go to the lowest
/// centroid index. `centroids` must be non-empty.
#[inline]
pub fn nearest<A: Component, B: Component>(vector: &[A], centroids: &[Vec<B>]) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;

    for (i, c) in centroids.iter().enumerate() {
        let d = squared_euclidean(vector, c);
        if d < best_dist {
            best_idx = i;
            best_dist = d;
        }
    }

    (best_idx, best_dist)
}
