//! Benchmark CLI for the int8 dot-product kernels.
//!
//! Usage:
//!   vdot8-bench                   # Run all algorithms
//!   vdot8-bench --list            # List available algorithms
//!   vdot8-bench dot_product_i8    # Run specific algorithm
//!   vdot8-bench --help            # Show help

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::EnvFilter;
use vdot8::registry::build_registry;
use vdot8::tui;
use vdot8::utils::runner::{export_csv, run_algorithm, RunConfig};

struct Args {
    show_list: bool,
    show_help: bool,
    algorithm: Option<String>,
    csv_path: Option<PathBuf>,
    config: RunConfig,
}

fn next_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a String> {
    iter.next().ok_or_else(|| anyhow!("{} expects a value", flag))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut args = Args {
        show_list: false,
        show_help: false,
        algorithm: None,
        csv_path: None,
        config: RunConfig::default(),
    };

    let mut iter = raw.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--list" | "-l" => args.show_list = true,
            "--help" | "-h" => args.show_help = true,
            "--sizes" => {
                let value = next_value(&mut iter, arg)?;
                args.config.sizes = parse_list(value)
                    .iter()
                    .map(|s| s.parse::<usize>().with_context(|| format!("invalid size '{}'", s)))
                    .collect::<Result<_>>()?;
                if args.config.sizes.is_empty() {
                    bail!("--sizes needs at least one size");
                }
            }
            "--runs" | "-r" => {
                let value = next_value(&mut iter, arg)?;
                args.config.timing.runs_per_variant = value
                    .parse()
                    .with_context(|| format!("invalid run count '{}'", value))?;
            }
            "--seed" => {
                let value = next_value(&mut iter, arg)?;
                let seed = value
                    .parse()
                    .with_context(|| format!("invalid seed '{}'", value))?;
                args.config.timing.seed = Some(seed);
            }
            "--kernels" => {
                args.config.variant_filter = parse_list(next_value(&mut iter, arg)?);
            }
            "--csv" => {
                args.csv_path = Some(PathBuf::from(next_value(&mut iter, arg)?));
            }
            other if !other.starts_with('-') => args.algorithm = Some(other.to_string()),
            other => bail!("unknown option: {} (see --help)", other),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().collect();
    let args = parse_args(&raw)?;
    let registry = build_registry();

    if args.show_help {
        tui::print_help();
        return Ok(());
    }

    if args.show_list {
        tui::print_available_algorithms(&registry);
        return Ok(());
    }

    let algorithms: Vec<_> = match &args.algorithm {
        Some(name) => vec![registry.find(name).ok_or_else(|| {
            anyhow!(
                "algorithm '{}' not found; available: {}",
                name,
                registry.list_names().join(", ")
            )
        })?],
        None => registry.all().iter().map(|a| a.as_ref()).collect(),
    };

    tui::print_header();
    tui::print_kernel_report();

    let mut reports = Vec::with_capacity(algorithms.len());
    for algo in algorithms {
        let report = run_algorithm(algo, &args.config)
            .with_context(|| format!("benchmarking {}", algo.name()))?;
        tui::print_report(algo, &report);
        reports.push(report);
    }

    if let Some(path) = &args.csv_path {
        export_csv(path, &reports)
            .with_context(|| format!("writing CSV to {}", path.display()))?;
        println!("  Raw data exported to: {}", path.display());
    }

    println!("Note: Speedup is relative to the first variant ('original').");
    Ok(())
}
