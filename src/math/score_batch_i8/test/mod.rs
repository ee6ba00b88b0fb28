//! Verification and tests for batch scoring.

use crate::error::{DotProductError, Result};
use crate::math::dot_product_i8::code::{available_variants, dot8s};
use crate::math::dot_product_i8::dispatch::score_batch_with;
use crate::utils::bench::{random_i8_vec, seeded_rng};

/// Order-sensitive fold of a score vector into one comparable value.
pub fn checksum(scores: &[i32]) -> i64 {
    scores
        .iter()
        .enumerate()
        .fold(0i64, |acc, (i, &s)| acc.wrapping_add((i as i64 + 1).wrapping_mul(i64::from(s))))
}

/// Verify every kernel scores each corpus row like the scalar kernel does.
pub fn verify_all() -> Result<()> {
    let mut rng = seeded_rng(0xba7c_4);
    for dim in [1, 17, 64, 65, 768] {
        let rows = 9;
        let query = random_i8_vec(&mut rng, dim);
        let corpus = random_i8_vec(&mut rng, dim * rows);
        let expected: Vec<i32> = corpus.chunks_exact(dim).map(|row| dot8s(&query, row, dim)).collect();

        for variant in available_variants() {
            let mut scores = vec![0; rows];
            score_batch_with(variant.function, &query, &corpus, dim, &mut scores)?;
            if let Some(row) = (0..rows).find(|&r| scores[r] != expected[r]) {
                return Err(DotProductError::VariantMismatch {
                    variant: variant.name,
                    len: dim,
                    expected: expected[row],
                    actual: scores[row],
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::dot_product_i8::dispatch::score_batch;

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should score like the scalar kernel");
    }

    #[test]
    fn test_score_batch_rows() {
        let query = [1i8, 2, 3];
        let corpus = [1i8, 0, 0, 0, 1, 0, 0, 0, 1, -1, -1, -1];
        let mut scores = [0; 4];
        score_batch(&query, &corpus, 3, &mut scores).unwrap();
        assert_eq!(scores, [1, 2, 3, -6]);
    }

    #[test]
    fn test_empty_corpus() {
        let mut scores: [i32; 0] = [];
        score_batch(&[1, 2], &[], 2, &mut scores).unwrap();
    }

    #[test]
    fn test_shape_errors() {
        let mut two = [0; 2];
        assert_eq!(
            score_batch(&[], &[], 0, &mut two),
            Err(DotProductError::ZeroDimension)
        );
        assert_eq!(
            score_batch(&[1, 2], &[1, 2, 3, 4], 3, &mut two),
            Err(DotProductError::LengthMismatch { left: 2, right: 3 })
        );
        assert_eq!(
            score_batch(&[1, 2], &[1, 2, 3], 2, &mut two),
            Err(DotProductError::RaggedCorpus { len: 3, dim: 2 })
        );
        assert_eq!(
            score_batch(&[1, 2], &[1, 2, 3, 4, 5, 6], 2, &mut two),
            Err(DotProductError::ScoreBufferLength { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn test_checksum_is_order_sensitive() {
        assert_ne!(checksum(&[1, 2]), checksum(&[2, 1]));
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_runner_closures_agree() {
        use crate::math::score_batch_i8::ScoreBatchI8Runner;
        use crate::registry::AlgorithmRunner;

        let runner = ScoreBatchI8Runner;
        let mut closures = runner.get_variant_closures(100, 5);
        let samples: Vec<_> = closures.iter_mut().map(|v| (v.run)().1).collect();
        assert!(samples[0].is_some());
        assert!(samples.iter().all(|s| *s == samples[0]));
    }
}
