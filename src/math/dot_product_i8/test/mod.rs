//! Verification and tests for the int8 dot product variants.

use super::code::available_variants;
use crate::error::{DotProductError, Result};
use crate::utils::bench::{random_i8_vec, seeded_rng};

/// Lengths around every block boundary of the 128-bit kernel.
pub const EDGE_LENGTHS: [usize; 11] = [0, 1, 15, 16, 17, 63, 64, 65, 127, 128, 1000];

/// Long enough that saturated inputs overflow i32, and not a multiple of 64.
pub const OVERFLOW_LENGTH: usize = 140_001;

const VERIFY_SEED: u64 = 0x1d07_8e5c;

/// Independent reference: exact i64 accumulation, truncated to 32 bits.
pub fn reference(a: &[i8], b: &[i8], limit: usize) -> i32 {
    let exact: i64 = a[..limit]
        .iter()
        .zip(&b[..limit])
        .map(|(&x, &y)| i64::from(x) * i64::from(y))
        .sum();
    exact as i32
}

/// Verify all variants produce the reference result on edge lengths and on
/// overflowing inputs.
pub fn verify_all() -> Result<()> {
    let mut rng = seeded_rng(VERIFY_SEED);
    let mut cases: Vec<(Vec<i8>, Vec<i8>)> = EDGE_LENGTHS
        .iter()
        .map(|&len| (random_i8_vec(&mut rng, len), random_i8_vec(&mut rng, len)))
        .collect();
    cases.push((vec![127; OVERFLOW_LENGTH], vec![127; OVERFLOW_LENGTH]));
    cases.push((vec![-128; OVERFLOW_LENGTH], vec![-128; OVERFLOW_LENGTH]));

    let variants = available_variants();
    for (a, b) in &cases {
        let expected = reference(a, b, a.len());
        for variant in &variants {
            let actual = (variant.function)(a, b, a.len());
            if actual != expected {
                return Err(DotProductError::VariantMismatch {
                    variant: variant.name,
                    len: a.len(),
                    expected,
                    actual,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::dot_product_i8::code::{dot8s, dot_product_lanes, lanes};
    use proptest::prelude::*;

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should produce correct results");
    }

    #[test]
    fn test_zero_length() {
        let a = [5i8; 32];
        let b = [-7i8; 32];
        for variant in available_variants() {
            assert_eq!((variant.function)(&a, &b, 0), 0, "{}", variant.name);
            assert_eq!((variant.function)(&[], &[], 0), 0, "{}", variant.name);
        }
    }

    #[test]
    fn test_literal_example() {
        let a = [2i8; 128];
        let b = [3i8; 128];
        for variant in available_variants() {
            assert_eq!((variant.function)(&a, &b, 128), 768, "{}", variant.name);
        }
    }

    #[test]
    fn test_basic_mixed_signs() {
        // 1*5 - 2*6 + 3*(-7) + (-4)*(-8) = 5 - 12 - 21 + 32
        let a = [1i8, -2, 3, -4];
        let b = [5i8, 6, -7, -8];
        for variant in available_variants() {
            assert_eq!((variant.function)(&a, &b, 4), 4, "{}", variant.name);
        }
    }

    #[test]
    fn test_extremes_without_overflow() {
        let a = [-128i8; 100];
        let b = [-128i8; 100];
        let c = [127i8; 100];
        for variant in available_variants() {
            assert_eq!((variant.function)(&a, &b, 100), 1_638_400, "{}", variant.name);
            assert_eq!((variant.function)(&a, &c, 100), -1_625_600, "{}", variant.name);
        }
    }

    #[test]
    fn test_reference_agreement_exact() {
        let mut rng = seeded_rng(11);
        for &len in &EDGE_LENGTHS {
            let a = random_i8_vec(&mut rng, len);
            let b = random_i8_vec(&mut rng, len);
            // 1000 * 128 * 128 stays far below i32::MAX
            let exact: i64 = a.iter().zip(&b).map(|(&x, &y)| i64::from(x) * i64::from(y)).sum();
            for variant in available_variants() {
                let got = (variant.function)(&a, &b, len);
                assert_eq!(i64::from(got), exact, "{} at length {}", variant.name, len);
            }
        }
    }

    #[test]
    fn test_overflow_wraps() {
        let a = vec![127i8; OVERFLOW_LENGTH];
        let expected = (OVERFLOW_LENGTH as i32).wrapping_mul(127 * 127);
        assert!(expected < 0, "input must overflow i32");
        assert_eq!(i64::from(expected), (OVERFLOW_LENGTH as i64 * 16_129) - (1i64 << 32));

        for variant in available_variants() {
            assert_eq!(
                (variant.function)(&a, &a, OVERFLOW_LENGTH),
                expected,
                "{}",
                variant.name
            );
        }
    }

    #[test]
    fn test_tail_straddles_fixed_block() {
        let mut rng = seeded_rng(23);
        let a = random_i8_vec(&mut rng, 260);
        let b = random_i8_vec(&mut rng, 260);
        for variant in available_variants() {
            for n in [15, 16, 63, 64, 127, 128, 191, 192, 255] {
                let head = (variant.function)(&a, &b, n);
                let next = (variant.function)(&a, &b, n + 1);
                let last = i32::from(a[n]) * i32::from(b[n]);
                assert_eq!(next, head.wrapping_add(last), "{} at {}", variant.name, n + 1);
            }
        }
    }

    #[test]
    fn test_lane_model_every_width() {
        let mut rng = seeded_rng(31);
        let a = random_i8_vec(&mut rng, 8 * lanes::MAX_VECTOR_BYTES + 7);
        let b = random_i8_vec(&mut rng, 8 * lanes::MAX_VECTOR_BYTES + 7);

        for vec_length in (16..=lanes::MAX_VECTOR_BYTES).step_by(16) {
            let block = lanes::ACCUMULATORS * vec_length;
            for n in [block - 1, block, block + 1, 2 * block + 3] {
                assert_eq!(
                    dot_product_lanes(&a, &b, n, vec_length),
                    dot8s(&a, &b, n),
                    "vec_length {} limit {}",
                    vec_length,
                    n
                );
            }
            let at_block = dot_product_lanes(&a, &b, block, vec_length);
            let past_block = dot_product_lanes(&a, &b, block + 1, vec_length);
            let last = i32::from(a[block]) * i32::from(b[block]);
            assert_eq!(past_block, at_block.wrapping_add(last));
        }
    }

    #[test]
    fn test_limit_uses_prefix_only() {
        let mut a = vec![1i8; 200];
        let mut b = vec![1i8; 200];
        a[150..].fill(100);
        b[150..].fill(100);
        for variant in available_variants() {
            assert_eq!((variant.function)(&a, &b, 150), 150, "{}", variant.name);
        }
    }

    #[test]
    fn test_alignment_independent() {
        let mut rng = seeded_rng(47);
        let len = 1000;
        let a = random_i8_vec(&mut rng, len);
        let b = random_i8_vec(&mut rng, len);
        let expected = reference(&a, &b, len);

        for offset in 0..16 {
            let mut shifted_a = vec![0i8; len + 16];
            let mut shifted_b = vec![0i8; len + 16];
            shifted_a[offset..offset + len].copy_from_slice(&a);
            shifted_b[16 - offset..16 - offset + len].copy_from_slice(&b);
            let sa = &shifted_a[offset..offset + len];
            let sb = &shifted_b[16 - offset..16 - offset + len];

            for variant in available_variants() {
                assert_eq!((variant.function)(sa, sb, len), expected, "{} offset {}", variant.name, offset);
            }
        }
    }

    #[test]
    fn test_concurrent_calls_share_buffers() {
        let mut rng = seeded_rng(59);
        let a = random_i8_vec(&mut rng, 4099);
        let b = random_i8_vec(&mut rng, 4099);
        let expected = reference(&a, &b, a.len());

        std::thread::scope(|s| {
            for variant in available_variants() {
                let (a, b) = (&a, &b);
                s.spawn(move || {
                    for _ in 0..50 {
                        assert_eq!((variant.function)(a, b, a.len()), expected, "{}", variant.name);
                    }
                });
            }
        });
    }

    #[test]
    #[should_panic]
    fn test_short_buffer_panics() {
        dot8s(&[1; 8], &[1; 4], 8);
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn test_sve_tail_straddles_hardware_block() {
        use crate::math::dot_product_i8::code::{sve_vector_length, vdot8s_sve};

        let Some(vec_length) = sve_vector_length() else {
            return;
        };
        let block = lanes::ACCUMULATORS * vec_length;
        let mut rng = seeded_rng(67);
        let a = random_i8_vec(&mut rng, 2 * block + 3);
        let b = random_i8_vec(&mut rng, 2 * block + 3);

        for n in [block - 1, block, block + 1, 2 * block + 3] {
            assert_eq!(vdot8s_sve(&a, &b, n), dot8s(&a, &b, n), "vl {} limit {}", vec_length, n);
        }
        let last = i32::from(a[block]) * i32::from(b[block]);
        assert_eq!(
            vdot8s_sve(&a, &b, block + 1),
            vdot8s_sve(&a, &b, block).wrapping_add(last)
        );
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn test_vector_entry_points_check_extension() {
        use crate::math::dot_product_i8::code::{aarch64_neon, aarch64_sve};
        use crate::math::dot_product_i8::code::{vdot8s_neon, vdot8s_sve};

        let a = [3i8; 70];
        let sve = std::panic::catch_unwind(|| vdot8s_sve(&a, &a, a.len()));
        assert_eq!(sve.is_ok(), aarch64_sve::is_available());
        let neon = std::panic::catch_unwind(|| vdot8s_neon(&a, &a, a.len()));
        assert_eq!(neon.is_ok(), aarch64_neon::is_available());
        if let Ok(value) = sve {
            assert_eq!(value, 630);
        }
    }

    proptest! {
        #[test]
        fn prop_all_variants_agree(pairs in prop::collection::vec(any::<(i8, i8)>(), 0..1100)) {
            let (a, b): (Vec<i8>, Vec<i8>) = pairs.into_iter().unzip();
            let expected = reference(&a, &b, a.len());
            for variant in available_variants() {
                prop_assert_eq!((variant.function)(&a, &b, a.len()), expected, "{}", variant.name);
            }
        }

        #[test]
        fn prop_lane_model_any_width(
            pairs in prop::collection::vec(any::<(i8, i8)>(), 0..2100),
            width_steps in 1usize..=16,
        ) {
            let (a, b): (Vec<i8>, Vec<i8>) = pairs.into_iter().unzip();
            let vec_length = width_steps * 16;
            prop_assert_eq!(dot_product_lanes(&a, &b, a.len(), vec_length), dot8s(&a, &b, a.len()));
        }
    }
}
