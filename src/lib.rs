//! # vdot8
//!
//! Signed 8-bit dot-product kernels, one per CPU capability tier, that all
//! return the same 32-bit wrapping result:
//!
//! - a scalar loop (reference and fallback),
//! - a fixed 128-bit NEON kernel built on `SDOT`,
//! - a scalable-width SVE kernel whose block size follows the CPU,
//!
//! plus a runtime selector, checked wrappers, and the harness that verifies
//! and benchmarks the kernels against each other.

pub mod error;
pub mod math;
pub mod registry;
pub mod utils;

pub use error::DotProductError;
pub use utils::tui;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::error::DotProductError;
    pub use crate::math::dot_product_i8::{
        self, dot_product, score_batch, try_dot_product, Kernel,
    };
    pub use crate::registry::{build_registry, AlgorithmRegistry, AlgorithmRunner};
}

#[cfg(test)]
mod tests {
    use crate::registry::build_registry;

    #[test]
    fn test_all_algorithms_registry_verify() {
        let registry = build_registry();
        let algorithms = registry.all();
        assert!(!algorithms.is_empty());

        for algo in algorithms {
            if let Err(e) = algo.verify() {
                panic!("Algorithm '{}' failed verification: {}", algo.name(), e);
            }
            assert!(algo.available_variants().contains(&"original"));
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = build_registry();
        assert_eq!(registry.list_names(), ["dot_product_i8", "score_batch_i8"]);
        assert!(registry.find("score_batch_i8").is_some());
        assert!(registry.find("dot_product").is_none());
    }
}
