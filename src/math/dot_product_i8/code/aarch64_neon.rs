//! aarch64 NEON implementation using the `SDOT` instruction.
//!
//! Works on 128-bit registers: 16 int8 lanes in, 4 int32 lanes out per
//! `SDOT`. Four accumulators are kept live so consecutive `SDOT`s do not
//! wait on each other.

use std::arch::aarch64::*;
use std::arch::asm;

const LANES: usize = 16;
const BLOCK: usize = 4 * LANES;

/// Returns true if this CPU implements the dot-product extension.
pub fn is_available() -> bool {
    std::arch::is_aarch64_feature_detected!("dotprod")
}

/// Compute the dot product of the first `limit` elements with NEON `SDOT`.
///
/// Blocks of 64 elements go through four accumulators; the last
/// `limit % 64` elements are handled by a scalar loop.
///
/// # Panics
/// Panics if either slice is shorter than `limit`, or if the CPU does not
/// implement the dot-product extension.
pub fn vdot8s_neon(vec1: &[i8], vec2: &[i8], limit: usize) -> i32 {
    let (vec1, vec2) = (&vec1[..limit], &vec2[..limit]);
    assert!(is_available(), "CPU does not support the dotprod extension");

    // SAFETY: dotprod (and therefore NEON) was detected above and both
    // slices hold exactly `limit` elements.
    unsafe { vdot8s_neon_unchecked(vec1, vec2) }
}

/// `acc += SDOT(a, b)`. The intrinsic is not on stable Rust yet.
#[inline]
#[target_feature(enable = "neon,dotprod")]
unsafe fn sdot(acc: int32x4_t, a: int8x16_t, b: int8x16_t) -> int32x4_t {
    let mut acc = acc;
    asm!(
        "sdot {acc:v}.4s, {a:v}.16b, {b:v}.16b",
        acc = inout(vreg) acc,
        a = in(vreg) a,
        b = in(vreg) b,
        options(pure, nomem, nostack, preserves_flags),
    );
    acc
}

#[target_feature(enable = "neon,dotprod")]
unsafe fn vdot8s_neon_unchecked(vec1: &[i8], vec2: &[i8]) -> i32 {
    let limit = vec1.len();
    let pa = vec1.as_ptr();
    let pb = vec2.as_ptr();

    let mut acc1 = vdupq_n_s32(0);
    let mut acc2 = vdupq_n_s32(0);
    let mut acc3 = vdupq_n_s32(0);
    let mut acc4 = vdupq_n_s32(0);

    let mut i = 0;
    while i + BLOCK <= limit {
        let va1 = vld1q_s8(pa.add(i));
        let vb1 = vld1q_s8(pb.add(i));

        let va2 = vld1q_s8(pa.add(i + LANES));
        let vb2 = vld1q_s8(pb.add(i + LANES));

        let va3 = vld1q_s8(pa.add(i + 2 * LANES));
        let vb3 = vld1q_s8(pb.add(i + 2 * LANES));

        let va4 = vld1q_s8(pa.add(i + 3 * LANES));
        let vb4 = vld1q_s8(pb.add(i + 3 * LANES));

        acc1 = sdot(acc1, va1, vb1);
        acc2 = sdot(acc2, va2, vb2);
        acc3 = sdot(acc3, va3, vb3);
        acc4 = sdot(acc4, va4, vb4);

        i += BLOCK;
    }

    // Pairwise combine, then ADDV across the 4 lanes (both wrap)
    acc1 = vaddq_s32(acc1, acc2);
    acc3 = vaddq_s32(acc3, acc4);
    acc1 = vaddq_s32(acc1, acc3);
    let mut result = vaddvq_s32(acc1);

    for (&x, &y) in vec1[i..].iter().zip(&vec2[i..]) {
        result = result.wrapping_add(i32::from(x) * i32::from(y));
    }

    result
}
