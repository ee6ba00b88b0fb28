//! Scalar (reference) implementation of the int8 dot product.
//!
//! This is the correctness baseline every other variant is compared
//! against, and the fallback on CPUs without a usable vector extension.

/// Compute `Σ vec1[i] * vec2[i]` over the first `limit` elements.
///
/// Products are widened to `i32` before accumulation and the running sum
/// wraps on overflow, matching every vector kernel bit for bit. The loop is
/// written so the compiler may auto-vectorize it, but correctness does not
/// depend on that.
///
/// # Panics
/// Panics if either slice is shorter than `limit`.
///
/// # Example
/// ```
/// use vdot8::math::dot_product_i8::dot8s;
///
/// let a = [2i8; 128];
/// let b = [3i8; 128];
/// assert_eq!(dot8s(&a, &b, 128), 768);
/// ```
pub fn dot8s(vec1: &[i8], vec2: &[i8], limit: usize) -> i32 {
    let (vec1, vec2) = (&vec1[..limit], &vec2[..limit]);

    vec1.iter()
        .zip(vec2)
        .fold(0i32, |acc, (&x, &y)| {
            acc.wrapping_add(i32::from(x) * i32::from(y))
        })
}
