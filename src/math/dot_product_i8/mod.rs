//! # Int8 Dot Product
//!
//! Sum of products of two signed 8-bit vectors, accumulated in 32 bits:
//!
//! `dot(a, b) = Σ(a[i] * b[i])`, wrapping on overflow
//!
//! This is the inner loop of similarity scoring over quantized embeddings,
//! run millions of times per query over vectors of tens to thousands of
//! elements.
//!
//! ## Variants
//!
//! - **original**: scalar loop, the reference and the fallback
//! - **aarch64-neon**: 128-bit `SDOT`, four accumulators, 64-element blocks
//! - **aarch64-sve**: scalable `SDOT`, block width read from the CPU per call
//! - **lanes-N**: the vector algorithm on plain arrays with an N-bit vector,
//!   available everywhere
//!
//! Every variant returns the same `i32` for the same input, overflow
//! included. Which one runs in production is decided by [`dispatch`].

pub mod code;
pub mod dispatch;
pub mod test;

pub use code::*;
pub use dispatch::{dot_product, score_batch, try_dot_product, Kernel};

use crate::error::Result;
use crate::registry::AlgorithmRunner;
use crate::utils::bench::{per_call, random_i8_vec, seeded_rng};
use crate::utils::timer::Variant;
use std::hint::black_box;
use std::sync::Arc;

/// Kernel calls per timed sample: about 16 KiB of input per sample, so
/// short vectors still give a readable interval.
pub(crate) fn calls_per_sample(size: usize) -> usize {
    (16 * 1024 / size.max(1)).clamp(1, 1024)
}

/// Runner for the pairwise int8 dot product
pub struct DotProductI8Runner;

impl AlgorithmRunner for DotProductI8Runner {
    fn name(&self) -> &'static str {
        "dot_product_i8"
    }

    fn description(&self) -> &'static str {
        "Sum of int8 x int8 products with 32-bit wrapping accumulation"
    }

    fn category(&self) -> &'static str {
        "math"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::available_variants().iter().map(|v| v.name).collect()
    }

    fn get_variant_closures<'a>(&'a self, size: usize, seed: u64) -> Vec<Variant<'a>> {
        let mut rng = seeded_rng(seed);
        let a: Arc<Vec<i8>> = Arc::new(random_i8_vec(&mut rng, size));
        let b: Arc<Vec<i8>> = Arc::new(random_i8_vec(&mut rng, size));
        let calls = calls_per_sample(size);

        code::available_variants()
            .into_iter()
            .map(|v| {
                let a = Arc::clone(&a);
                let b = Arc::clone(&b);
                let func = v.function;

                Variant {
                    name: v.name,
                    description: v.description,
                    run: Box::new(move || {
                        let (elapsed, result) = crate::measure!({
                            let mut last = 0;
                            for _ in 0..calls {
                                last = func(black_box(a.as_slice()), black_box(b.as_slice()), size);
                            }
                            last
                        });
                        (per_call(elapsed, calls), Some(i64::from(result)))
                    }),
                }
            })
            .collect()
    }

    fn verify(&self) -> Result<()> {
        test::verify_all()
    }
}
