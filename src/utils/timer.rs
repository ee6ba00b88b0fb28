//! Timing of interchangeable variants.
//!
//! Every variant is warmed up, then all samples of all variants are run in
//! one shuffled schedule so that frequency scaling or a noisy neighbour hits
//! every variant alike. Each sample is taken with the thread pinned.

use std::hint::black_box;
use std::time::Duration;

use rand::seq::SliceRandom;

use super::bench::{seeded_rng, to_nanos, Measurement};
use super::cpu_affinity::CpuPinGuard;

/// CPU pinning strategy during measurements
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Pin once before all measurements
    Global,
    /// Pin/unpin around every sample
    #[default]
    PerExecution,
}

/// Configuration for timing measurements
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Samples collected per variant (default: 30)
    pub runs_per_variant: usize,
    /// Unmeasured runs per variant before sampling (default: 10)
    pub warmup_iterations: usize,
    pub pin_strategy: PinStrategy,
    /// Seed of the sample schedule shuffle; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            runs_per_variant: 30,
            warmup_iterations: 10,
            pin_strategy: PinStrategy::default(),
            seed: None,
        }
    }
}

/// A variant to be measured.
///
/// `run` performs one sample and times it itself, returning the measurement
/// and the value the variant computed (compared across variants).
pub struct Variant<'a> {
    pub name: &'static str,
    pub description: &'static str,
    pub run: Box<dyn FnMut() -> (Measurement, Option<i64>) + 'a>,
}

/// Statistics of one variant. Times hold raw cycles when counting cycles.
#[derive(Clone, Debug)]
pub struct VariantResult {
    pub name: String,
    pub description: String,
    pub avg_time: Duration,
    pub median_time: Duration,
    pub min_time: Duration,
    pub max_time: Duration,
    pub std_dev: Duration,
    /// Number of samples behind these statistics
    pub runs: usize,
    /// Last value returned by the variant
    pub result_sample: Option<i64>,
}

/// Measure variants in a randomised interleaved order.
pub fn measure_variants(mut variants: Vec<Variant>, config: &TimingConfig) -> Vec<VariantResult> {
    if variants.is_empty() {
        return Vec::new();
    }

    for variant in &mut variants {
        for _ in 0..config.warmup_iterations {
            black_box((variant.run)());
        }
    }

    let samples = config.runs_per_variant;
    let mut schedule: Vec<usize> = (0..variants.len())
        .flat_map(|v| std::iter::repeat(v).take(samples))
        .collect();
    match config.seed {
        Some(seed) => schedule.shuffle(&mut seeded_rng(seed)),
        None => schedule.shuffle(&mut rand::rng()),
    }

    let mut measurements: Vec<Vec<u64>> = (0..variants.len())
        .map(|_| Vec::with_capacity(samples))
        .collect();
    let mut result_samples: Vec<Option<i64>> = vec![None; variants.len()];

    let _global_pin = (config.pin_strategy == PinStrategy::Global).then(CpuPinGuard::new);

    for idx in schedule {
        let _sample_pin =
            (config.pin_strategy == PinStrategy::PerExecution).then(CpuPinGuard::new);
        let (elapsed, result) = (variants[idx].run)();
        measurements[idx].push(to_nanos(elapsed));
        result_samples[idx] = result;
    }

    variants
        .iter()
        .zip(measurements)
        .zip(result_samples)
        .map(|((variant, nanos), result)| summarize(variant, nanos, result))
        .collect()
}

fn summarize(variant: &Variant, mut nanos: Vec<u64>, result_sample: Option<i64>) -> VariantResult {
    let runs = nanos.len();
    let mut result = VariantResult {
        name: variant.name.to_string(),
        description: variant.description.to_string(),
        avg_time: Duration::ZERO,
        median_time: Duration::ZERO,
        min_time: Duration::ZERO,
        max_time: Duration::ZERO,
        std_dev: Duration::ZERO,
        runs,
        result_sample,
    };
    if runs == 0 {
        return result;
    }

    nanos.sort_unstable();
    let mean = nanos.iter().map(|&n| n as f64).sum::<f64>() / runs as f64;
    let variance = nanos
        .iter()
        .map(|&n| {
            let diff = n as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / (runs - 1).max(1) as f64;

    result.avg_time = Duration::from_nanos(mean as u64);
    result.median_time = Duration::from_nanos(nanos[runs / 2]);
    result.min_time = Duration::from_nanos(nanos[0]);
    result.max_time = Duration::from_nanos(nanos[runs - 1]);
    result.std_dev = Duration::from_nanos(variance.sqrt() as u64);
    result
}
