//! Int8 dot product implementations.
//!
//! This module contains all implementation variants of the int8 dot product.
//! Every variant has the same signature and returns the same value for the
//! same input, including on 32-bit overflow.

pub mod lanes;
mod original;

#[cfg(target_arch = "aarch64")]
pub mod aarch64_neon;
#[cfg(target_arch = "aarch64")]
pub mod aarch64_sve;

pub use lanes::{dot_product_lanes, vdot8s_lanes};
pub use original::dot8s;

#[cfg(target_arch = "aarch64")]
pub use aarch64_neon::vdot8s_neon;
#[cfg(target_arch = "aarch64")]
pub use aarch64_sve::{sve_vector_length, vdot8s_sve};

use crate::utils::VariantInfo;

/// Kernel signature: `(vec1, vec2, limit) -> Σ vec1[i] * vec2[i]` for `i < limit`.
pub type DotProductI8Fn = fn(&[i8], &[i8], usize) -> i32;

/// Get all variants that can run on the current CPU.
///
/// The hardware kernels are only listed after a runtime feature probe, so
/// every returned function is safe to call.
pub fn available_variants() -> Vec<VariantInfo<DotProductI8Fn>> {
    #[allow(unused_mut)]
    let mut variants: Vec<VariantInfo<DotProductI8Fn>> = vec![
        VariantInfo {
            name: "original",
            description: "Scalar reference loop with wrapping i32 accumulator",
            function: dot8s,
        },
        VariantInfo {
            name: "lanes-128",
            description: "Portable model of the 128-bit kernel (4 accumulators, emulated SDOT)",
            function: vdot8s_lanes::<16>,
        },
        VariantInfo {
            name: "lanes-256",
            description: "Portable model of a 256-bit scalable kernel",
            function: vdot8s_lanes::<32>,
        },
        VariantInfo {
            name: "lanes-512",
            description: "Portable model of a 512-bit scalable kernel",
            function: vdot8s_lanes::<64>,
        },
    ];

    #[cfg(target_arch = "aarch64")]
    {
        if aarch64_neon::is_available() {
            variants.push(VariantInfo {
                name: "aarch64-neon",
                description: "aarch64 NEON with SDOT, 4x16 lanes per block",
                function: vdot8s_neon,
            });
        }
        if aarch64_sve::is_available() {
            variants.push(VariantInfo {
                name: "aarch64-sve",
                description: "aarch64 SVE with SDOT, block width read from CNTB",
                function: vdot8s_sve,
            });
        }
    }

    variants
}
