//! # Batch Scoring
//!
//! One int8 query scored against every row of a flattened corpus, the shape
//! of a brute-force similarity scan. Each variant is one dot-product kernel
//! driven through [`score_batch_with`].

pub mod test;

use crate::error::Result;
use crate::math::dot_product_i8::code;
use crate::math::dot_product_i8::dispatch::score_batch_with;
use crate::registry::AlgorithmRunner;
use crate::utils::bench::{random_i8_vec, seeded_rng};
use crate::utils::timer::Variant;
use std::hint::black_box;
use std::sync::Arc;

/// Corpus rows scored per sample
pub const CORPUS_ROWS: usize = 64;

pub struct ScoreBatchI8Runner;

impl AlgorithmRunner for ScoreBatchI8Runner {
    fn name(&self) -> &'static str {
        "score_batch_i8"
    }

    fn description(&self) -> &'static str {
        "Scores one int8 query against a 64-row corpus"
    }

    fn category(&self) -> &'static str {
        "search"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::available_variants().iter().map(|v| v.name).collect()
    }

    fn get_variant_closures<'a>(&'a self, size: usize, seed: u64) -> Vec<Variant<'a>> {
        let dim = size.max(1);
        let mut rng = seeded_rng(seed);
        let query: Arc<Vec<i8>> = Arc::new(random_i8_vec(&mut rng, dim));
        let corpus: Arc<Vec<i8>> = Arc::new(random_i8_vec(&mut rng, dim * CORPUS_ROWS));

        code::available_variants()
            .into_iter()
            .map(|v| {
                let query = Arc::clone(&query);
                let corpus = Arc::clone(&corpus);
                let func = v.function;
                let mut scores = vec![0i32; CORPUS_ROWS];

                Variant {
                    name: v.name,
                    description: v.description,
                    run: Box::new(move || {
                        let (elapsed, checksum) = crate::measure!({
                            // Shapes are fixed above, so this cannot fail.
                            let scored = score_batch_with(
                                func,
                                black_box(query.as_slice()),
                                black_box(corpus.as_slice()),
                                dim,
                                &mut scores,
                            );
                            scored.map(|()| test::checksum(&scores))
                        });
                        (elapsed, checksum.ok())
                    }),
                }
            })
            .collect()
    }

    fn verify(&self) -> Result<()> {
        test::verify_all()
    }
}
