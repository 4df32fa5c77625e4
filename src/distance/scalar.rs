//! Scalar distance kernels with double-precision accumulation

use crate::dataset::Component;

/// Euclidean (L2) distance squared between two vectors
///
/// Components are widened to f64 before subtracting, so `f32` input and
/// `f64` centroids can be mixed freely. Squared distance avoids the sqrt,
/// which is unnecessary for comparisons (sqrt is monotonic).
#[inline]
pub fn l2_squared_scalar<A: Component, B: Component>(a: &[A], b: &[B]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = x.into() - y.into();
            diff * diff
        })
        .sum()
}

/// Euclidean (L2) distance between two vectors
#[inline]
pub fn l2_scalar<A: Component, B: Component>(a: &[A], b: &[B]) -> f64 {
    l2_squared_scalar(a, b).sqrt()
}
