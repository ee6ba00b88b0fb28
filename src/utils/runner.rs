//! Runs registered algorithms through the timer and exports raw numbers.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use super::bench::{time_seed, unit_name};
use super::timer::{measure_variants, TimingConfig, VariantResult};
use crate::error::Result;
use crate::registry::AlgorithmRunner;

/// What to run and how to time it.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Vector lengths to benchmark
    pub sizes: Vec<usize>,
    pub timing: TimingConfig,
    /// Substrings selecting variants; empty keeps all. The `original`
    /// baseline is always kept.
    pub variant_filter: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sizes: vec![16, 64, 256, 768, 1024, 4096],
            timing: TimingConfig::default(),
            variant_filter: Vec::new(),
        }
    }
}

/// Results of one algorithm at one input size
#[derive(Clone, Debug)]
pub struct SizeReport {
    pub size: usize,
    pub results: Vec<VariantResult>,
}

/// Results of one algorithm across all sizes
#[derive(Clone, Debug)]
pub struct AlgorithmReport {
    pub algorithm: &'static str,
    pub sizes: Vec<SizeReport>,
}

fn keep_variant(name: &str, filter: &[String]) -> bool {
    filter.is_empty() || name == "original" || filter.iter().any(|f| name.contains(f.as_str()))
}

/// Verify an algorithm, then measure its variants at every configured size.
pub fn run_algorithm(algo: &dyn AlgorithmRunner, config: &RunConfig) -> Result<AlgorithmReport> {
    algo.verify()?;
    info!(algorithm = algo.name(), "all variants agree with the reference");

    // One seed for every size so reruns with --seed reproduce inputs and schedule.
    let seed = config.timing.seed.unwrap_or_else(time_seed);
    let timing = TimingConfig {
        seed: Some(seed),
        ..config.timing.clone()
    };

    let mut sizes = Vec::with_capacity(config.sizes.len());
    for &size in &config.sizes {
        let mut variants = algo.get_variant_closures(size, seed);
        variants.retain(|v| keep_variant(v.name, &config.variant_filter));
        debug!(algorithm = algo.name(), size, variants = variants.len(), "measuring");

        sizes.push(SizeReport {
            size,
            results: measure_variants(variants, &timing),
        });
    }

    Ok(AlgorithmReport {
        algorithm: algo.name(),
        sizes,
    })
}

/// Export per-variant statistics to a CSV file.
pub fn export_csv(path: &Path, reports: &[AlgorithmReport]) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);

    writeln!(
        file,
        "algorithm,variant,input_size,unit,avg,median,min,max,std_dev,runs,result"
    )?;
    for report in reports {
        for size in &report.sizes {
            for r in &size.results {
                writeln!(
                    file,
                    "{},{},{},{},{},{},{},{},{},{},{}",
                    report.algorithm,
                    r.name,
                    size.size,
                    unit_name(),
                    r.avg_time.as_nanos(),
                    r.median_time.as_nanos(),
                    r.min_time.as_nanos(),
                    r.max_time.as_nanos(),
                    r.std_dev.as_nanos(),
                    r.runs,
                    r.result_sample.map(|v| v.to_string()).unwrap_or_default()
                )?;
            }
        }
    }
    file.flush()
}
