//! aarch64 SVE implementation using the `SDOT` instruction on Z registers.
//!
//! The vector length is a property of the CPU (128 to 2048 bits), so it is
//! read with `CNTB` on every call and all block bounds are derived from it.
//!
//! # Misdetection risk
//!
//! Some toolchains happily emit SVE code for CPUs that do not implement it
//! (Apple M3 with `-march=native+sve` compiles, then dies with an illegal
//! instruction). Nothing here can catch that trap: callers must confirm SVE
//! with a runtime probe first. [`vdot8s_sve`] asserts the probe result and
//! the dispatcher only hands it out after the same check.

use std::arch::asm;

/// Returns true if the running CPU implements SVE.
pub fn is_available() -> bool {
    std::arch::is_aarch64_feature_detected!("sve")
}

/// SVE vector length in bytes, or `None` when SVE is unavailable.
pub fn sve_vector_length() -> Option<usize> {
    if is_available() {
        // SAFETY: SVE detected
        Some(unsafe { vector_length_bytes() })
    } else {
        None
    }
}

#[target_feature(enable = "sve")]
unsafe fn vector_length_bytes() -> usize {
    let bytes: usize;
    asm!(
        "cntb {bytes}",
        bytes = out(reg) bytes,
        options(pure, nomem, nostack, preserves_flags),
    );
    bytes
}

/// Compute the dot product of the first `limit` elements with SVE `SDOT`.
///
/// Each main-loop iteration consumes `4 * vec_length` elements under an
/// all-true predicate; the remainder goes through a scalar loop.
///
/// # Panics
/// Panics if either slice is shorter than `limit`, or if the CPU does not
/// implement SVE.
pub fn vdot8s_sve(vec1: &[i8], vec2: &[i8], limit: usize) -> i32 {
    let (vec1, vec2) = (&vec1[..limit], &vec2[..limit]);
    assert!(is_available(), "CPU does not support SVE");

    // SAFETY: SVE detected above and both slices hold exactly `limit` elements.
    unsafe { vdot8s_sve_unchecked(vec1, vec2) }
}

#[target_feature(enable = "sve")]
unsafe fn vdot8s_sve_unchecked(vec1: &[i8], vec2: &[i8]) -> i32 {
    let limit = vec1.len();
    let vec_length = vector_length_bytes();
    let step = 4 * vec_length;
    let blocks = limit / step;
    let main_len = blocks * step;

    // z0-z3 accumulate, z4-z7 / z16-z19 hold the loads. Z registers alias
    // the V registers named as clobbers below. SADDV sums the
    // 32-bit lanes into 64 bits; the truncation below gives the same value
    // as wrapping 32-bit adds.
    let sum: i64;
    asm!(
        "ptrue p0.b",
        "mov z0.s, #0",
        "mov z1.s, #0",
        "mov z2.s, #0",
        "mov z3.s, #0",
        "cbz {blocks}, 3f",
        "2:",
        "ld1b {{ z4.b }}, p0/z, [{pa}]",
        "ld1b {{ z16.b }}, p0/z, [{pb}]",
        "ld1b {{ z5.b }}, p0/z, [{pa}, #1, mul vl]",
        "ld1b {{ z17.b }}, p0/z, [{pb}, #1, mul vl]",
        "ld1b {{ z6.b }}, p0/z, [{pa}, #2, mul vl]",
        "ld1b {{ z18.b }}, p0/z, [{pb}, #2, mul vl]",
        "ld1b {{ z7.b }}, p0/z, [{pa}, #3, mul vl]",
        "ld1b {{ z19.b }}, p0/z, [{pb}, #3, mul vl]",
        "sdot z0.s, z4.b, z16.b",
        "sdot z1.s, z5.b, z17.b",
        "sdot z2.s, z6.b, z18.b",
        "sdot z3.s, z7.b, z19.b",
        "addvl {pa}, {pa}, #4",
        "addvl {pb}, {pb}, #4",
        "subs {blocks}, {blocks}, #1",
        "b.ne 2b",
        "3:",
        "add z0.s, z0.s, z1.s",
        "add z2.s, z2.s, z3.s",
        "add z0.s, z0.s, z2.s",
        "saddv d0, p0, z0.s",
        "fmov {sum}, d0",
        pa = inout(reg) vec1.as_ptr() => _,
        pb = inout(reg) vec2.as_ptr() => _,
        blocks = inout(reg) blocks => _,
        sum = lateout(reg) sum,
        out("v0") _, out("v1") _, out("v2") _, out("v3") _,
        out("v4") _, out("v5") _, out("v6") _, out("v7") _,
        out("v16") _, out("v17") _, out("v18") _, out("v19") _,
        out("p0") _,
        options(readonly, nostack),
    );

    let mut result = sum as i32;
    for (&x, &y) in vec1[main_len..].iter().zip(&vec2[main_len..]) {
        result = result.wrapping_add(i32::from(x) * i32::from(y));
    }

    result
}
