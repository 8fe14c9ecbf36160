//! Test report generator.
//!
//! Reads a runner's results document (default `test-results.json`, or the
//! first argument) and writes `test-report.html` and `test-report.json` into
//! the configured output directory. Exits 1 when any test failed or the
//! input is missing or malformed.
//!
//! Usage: cargo run --bin test-report [-- path/to/results.json]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use hrm_core::test_report::{HTML_REPORT, JSON_REPORT, ReportGenerator};
use hrm_shared::AppConfig;

fn main() -> anyhow::Result<ExitCode> {
    let config = AppConfig::load_with_dotenv().context("Failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrm=info".into()),
        )
        .init();

    let input = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(&config.reports.input), PathBuf::from);
    let out_dir = PathBuf::from(&config.reports.output_dir);

    let summary = ReportGenerator::generate(&input, &out_dir, Utc::now())
        .with_context(|| format!("Could not build a report from {}", input.display()))?;

    println!("Tests:     {}", summary.total);
    println!("Passed:    {}", summary.passed);
    println!("Failed:    {}", summary.failed);
    println!("Pending:   {}", summary.pending);
    println!("Pass rate: {}%", summary.pass_rate);
    for failure in &summary.failures {
        println!("  FAIL {} ({})", failure.name, failure.suite);
    }
    println!(
        "Reports:   {}, {}",
        out_dir.join(HTML_REPORT).display(),
        out_dir.join(JSON_REPORT).display()
    );

    Ok(if summary.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
