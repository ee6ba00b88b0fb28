//! Text User Interface (TUI) utilities.
//!
//! Handles formatted output for the CLI.

use terminal_size::{terminal_size, Width};

use super::bench::format_measurement;
use super::runner::AlgorithmReport;
use super::timer::VariantResult;
use crate::math::dot_product_i8::dispatch::{self, Kernel};
use crate::registry::{AlgorithmRegistry, AlgorithmRunner};

/// Terminal width clamped to a range the tables can use
fn get_term_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize).clamp(40, 200),
        None => 80,
    }
}

/// Truncate string with ellipsis if it exceeds width (character-wise)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(width.saturating_sub(3)).collect();
        result.push_str("...");
        result
    }
}

fn print_box(lines: &[String], split_after: usize) {
    let max_content_width = get_term_width().saturating_sub(4).max(40);
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(60)
        .min(max_content_width);
    let border = "─".repeat(width + 2);

    println!("┌{}┐", border);
    for (i, line) in lines.iter().enumerate() {
        if i == split_after {
            println!("├{}┤", border);
        }
        println!("│ {:<width$} │", truncate(line, width), width = width);
    }
    println!("└{}┘", border);
    println!();
}

/// Print algorithm info box
pub fn print_algo_info_box(algo: &dyn AlgorithmRunner) {
    print_box(
        &[
            format!("Algorithm: {}", algo.name()),
            format!("Category:  {}", algo.category()),
            algo.description().to_string(),
            format!("Variants: {}", algo.available_variants().join(", ")),
        ],
        3,
    );
}

/// Print which kernel tiers this CPU can run and which one is selected
pub fn print_kernel_report() {
    let mut lines: Vec<String> = Kernel::ALL
        .iter()
        .map(|k| {
            let status = if k.is_supported() { "supported" } else { "unavailable" };
            format!("{:<16} {}", k.name(), status)
        })
        .collect();
    if let Some(bytes) = dispatch::scalable_vector_length() {
        lines.push(format!("SVE vector length: {} bits", bytes * 8));
    }
    lines.push(format!("Selected kernel:   {}", dispatch::selected()));
    print_box(&lines, Kernel::ALL.len());
}

/// Print results table for a single size.
///
/// The first row is the baseline for the speedup column; `Check` compares
/// every variant's result with it.
pub fn print_results_table(results: &[VariantResult], size: usize) {
    let Some(baseline) = results.first() else {
        return;
    };

    let fixed_width = 72;
    let variant_col_width = get_term_width().saturating_sub(fixed_width).max(15);
    let table_width = variant_col_width + 64 + 6;
    let baseline_time = baseline.avg_time.as_nanos() as f64;

    println!("  Size: {} ({} runs)", size, baseline.runs);
    println!("  {}", "─".repeat(table_width));
    println!(
        "  {:<v_width$} {:>12} {:>12} {:>12} {:>9} {:>9} {:>10}",
        "Variant",
        "Average",
        "Min",
        "Max",
        "Speedup",
        "CV",
        "Check",
        v_width = variant_col_width
    );
    println!("  {}", "─".repeat(table_width));

    for result in results {
        let avg = result.avg_time.as_nanos() as f64;
        let speedup = if avg > 0.0 { baseline_time / avg } else { 0.0 };
        let cv = if avg > 0.0 {
            result.std_dev.as_nanos() as f64 / avg
        } else {
            0.0
        };
        let check = match (result.result_sample, baseline.result_sample) {
            (Some(r), Some(b)) if r == b => "ok",
            (Some(_), Some(_)) => "MISMATCH",
            _ => "-",
        };

        println!(
            "  {:<v_width$} {:>12} {:>12} {:>12} {:>8.2}x {:>8.2}% {:>10}",
            truncate(&result.name, variant_col_width),
            format_measurement(result.avg_time),
            format_measurement(result.min_time),
            format_measurement(result.max_time),
            speedup,
            cv * 100.0,
            check,
            v_width = variant_col_width
        );
    }
    println!();
}

/// Print every size of an algorithm report
pub fn print_report(algo: &dyn AlgorithmRunner, report: &AlgorithmReport) {
    print_algo_info_box(algo);
    for size in &report.sizes {
        print_results_table(&size.results, size.size);
    }
}

/// Print the application header
pub fn print_header() {
    let term_width = get_term_width().min(80);
    let title = " vdot8 int8 dot-product kernels ";
    let padding = term_width.saturating_sub(title.len() + 2) / 2;
    let right_padding = term_width.saturating_sub(padding + title.len());

    let border = "═".repeat(term_width);
    println!("╔{}╗", border);
    println!("║{}{}{}║", " ".repeat(padding), title, " ".repeat(right_padding));
    println!("╚{}╝", border);
    println!();
}

/// Print the help message
pub fn print_help() {
    println!("Usage: vdot8-bench [OPTIONS] [ALGORITHM]");
    println!();
    println!("Options:");
    println!("  --list, -l         List all available algorithms");
    println!("  --help, -h         Show this help message");
    println!("  --sizes SIZES      Comma-separated vector lengths (default: 16,64,256,768,1024,4096)");
    println!("  --runs N, -r N     Samples per variant (default: 30)");
    println!("  --seed N           Seed for inputs and schedule (default: time-based)");
    println!("  --kernels NAMES    Comma-separated variant name filters (baseline always kept)");
    println!("  --csv PATH         Export per-variant statistics to CSV");
    println!();
    println!("Arguments:");
    println!("  ALGORITHM          Name of specific algorithm to run (omit for all)");
    println!();
    println!("Environment:");
    println!("  {}       Force the dispatched kernel (scalar, fixed-width, scalable-width)", dispatch::KERNEL_ENV_VAR);
    println!("  RUST_LOG           Log filter, e.g. RUST_LOG=vdot8=debug");
    println!();
    println!("Examples:");
    println!("  vdot8-bench                       # Run all algorithms");
    println!("  vdot8-bench dot_product_i8        # Run only the pairwise kernel");
    println!("  vdot8-bench --sizes 64,65,1000    # Custom lengths");
    println!("  vdot8-bench --kernels neon,sve    # Hardware kernels against the baseline");
    println!("  vdot8-bench --csv data.csv        # Export statistics to CSV");
}

/// Print the list of available algorithms
pub fn print_available_algorithms(registry: &AlgorithmRegistry) {
    println!("Available algorithms:");
    println!();
    for algo in registry.all() {
        println!(
            "  {:<20} [{}] - {}",
            algo.name(),
            algo.category(),
            algo.description()
        );
    }
}
