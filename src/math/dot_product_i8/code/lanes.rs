//! Portable lane model of the vector kernels.
//!
//! Runs the exact block structure of the SIMD kernels (four independent
//! accumulators, one `SDOT` per sub-block, pairwise combine, horizontal
//! reduction, scalar tail) on plain arrays. The vector length is a runtime
//! value, so the same code reproduces the fixed 128-bit kernel and any
//! scalable width between 128 and 2048 bits on hosts that have neither.

/// Vector length in bytes of the fixed-width (128-bit) kernel.
pub const FIXED_VECTOR_BYTES: usize = 16;

/// Largest scalable vector length in bytes (2048 bits).
pub const MAX_VECTOR_BYTES: usize = 256;

/// Independent accumulators per unrolled block.
pub const ACCUMULATORS: usize = 4;

const MAX_LANES: usize = MAX_VECTOR_BYTES / 4;

/// Returns true if `vec_length` is a vector byte length the model can run:
/// a multiple of 16 between 16 and 256.
pub fn is_valid_vector_length(vec_length: usize) -> bool {
    (FIXED_VECTOR_BYTES..=MAX_VECTOR_BYTES).contains(&vec_length)
        && vec_length % FIXED_VECTOR_BYTES == 0
}

/// Emulates one `SDOT`: every group of four int8 products is summed and
/// added to the 32-bit lane at the same position.
#[inline(always)]
fn sdot(acc: &mut [i32], a: &[i8], b: &[i8]) {
    for (lane, (qa, qb)) in acc
        .iter_mut()
        .zip(a.chunks_exact(4).zip(b.chunks_exact(4)))
    {
        // At most 4 * 128 * 128, cannot overflow before the lane add.
        let group: i32 = qa
            .iter()
            .zip(qb)
            .map(|(&x, &y)| i32::from(x) * i32::from(y))
            .sum();
        *lane = lane.wrapping_add(group);
    }
}

#[inline(always)]
fn add_lanes(dst: &mut [i32], src: &[i32]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = d.wrapping_add(*s);
    }
}

/// Dot product using the unrolled vector algorithm with a vector of
/// `vec_length` bytes.
///
/// The main loop consumes blocks of `4 * vec_length` elements while a whole
/// block fits; the remaining `limit % (4 * vec_length)` elements are added
/// by a scalar tail.
///
/// # Panics
/// Panics if either slice is shorter than `limit` or if `vec_length` is not
/// a valid vector length (see [`is_valid_vector_length`]).
pub fn dot_product_lanes(vec1: &[i8], vec2: &[i8], limit: usize, vec_length: usize) -> i32 {
    assert!(
        is_valid_vector_length(vec_length),
        "vector length must be a multiple of 16 in 16..=256, got {}",
        vec_length
    );
    let (vec1, vec2) = (&vec1[..limit], &vec2[..limit]);

    let lanes = vec_length / 4;
    let block = ACCUMULATORS * vec_length;
    let mut acc = [[0i32; MAX_LANES]; ACCUMULATORS];

    let mut i = 0;
    while i + block <= limit {
        for (k, lane_acc) in acc.iter_mut().enumerate() {
            let start = i + k * vec_length;
            let end = start + vec_length;
            sdot(&mut lane_acc[..lanes], &vec1[start..end], &vec2[start..end]);
        }
        i += block;
    }

    // Pairwise combine: (acc0 + acc1) + (acc2 + acc3)
    let [mut acc0, acc1, mut acc2, acc3] = acc;
    add_lanes(&mut acc0[..lanes], &acc1[..lanes]);
    add_lanes(&mut acc2[..lanes], &acc3[..lanes]);
    add_lanes(&mut acc0[..lanes], &acc2[..lanes]);

    let mut result = acc0[..lanes]
        .iter()
        .fold(0i32, |sum, &lane| sum.wrapping_add(lane));

    // Scalar tail
    for (&x, &y) in vec1[i..].iter().zip(&vec2[i..]) {
        result = result.wrapping_add(i32::from(x) * i32::from(y));
    }

    result
}

/// Lane model with a vector length fixed at compile time, usable wherever a
/// plain kernel function pointer is expected.
pub fn vdot8s_lanes<const VEC_LENGTH: usize>(vec1: &[i8], vec2: &[i8], limit: usize) -> i32 {
    dot_product_lanes(vec1, vec2, limit, VEC_LENGTH)
}
