//! Test-run input document and report summary types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A Jest-style test-run document, as written by `jest --json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    /// Tests in the run.
    pub num_total_tests: u64,
    /// Tests that passed.
    pub num_passed_tests: u64,
    /// Tests that failed.
    pub num_failed_tests: u64,
    /// Tests skipped or marked todo.
    #[serde(default)]
    pub num_pending_tests: u64,
    /// Overall flag reported by the runner.
    #[serde(default)]
    pub success: Option<bool>,
    /// Run start, milliseconds since the Unix epoch.
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Per-file results.
    #[serde(default)]
    pub test_results: Vec<SuiteResult>,
}

/// Results for one test file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    /// Test file path.
    pub name: String,
    /// "passed" or "failed".
    #[serde(default)]
    pub status: String,
    /// Suite start, epoch milliseconds.
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Suite end, epoch milliseconds.
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Individual test outcomes.
    #[serde(default)]
    pub assertion_results: Vec<AssertionResult>,
}

/// Outcome of one test case.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    /// Test title.
    pub title: String,
    /// Title including enclosing `describe` blocks.
    #[serde(default)]
    pub full_name: String,
    /// Outcome.
    pub status: AssertionStatus,
    /// Run time in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
    /// Failure output, one entry per failed expectation.
    #[serde(default)]
    pub failure_messages: Vec<String>,
}

/// Status of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionStatus {
    /// Passed.
    Passed,
    /// Failed.
    Failed,
    /// Skipped.
    Pending,
    /// Marked `todo`.
    Todo,
    /// Disabled.
    Disabled,
    /// Anything else the runner reports.
    #[serde(other)]
    Unknown,
}

/// Summary written to `test-report.json` and rendered as HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// When this report was produced.
    pub generated_at: DateTime<Utc>,
    /// When the test run started, if known.
    pub started_at: Option<DateTime<Utc>>,
    /// Tests in the run.
    pub total: u64,
    /// Passed tests.
    pub passed: u64,
    /// Failed tests.
    pub failed: u64,
    /// Skipped tests.
    pub pending: u64,
    /// `passed / total` as a percentage, two decimal places.
    pub pass_rate: Decimal,
    /// Overall verdict.
    pub success: bool,
    /// Per-file breakdown.
    pub suites: Vec<SuiteSummary>,
    /// Every failed test case.
    pub failures: Vec<FailedTest>,
}

/// Per-file figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    /// Test file path.
    pub name: String,
    /// Runner-reported status.
    pub status: String,
    /// Cases in the file.
    pub total: usize,
    /// Passed cases.
    pub passed: usize,
    /// Failed cases.
    pub failed: usize,
    /// Skipped cases.
    pub pending: usize,
    /// Wall time in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A failed test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTest {
    /// File the case lives in.
    pub suite: String,
    /// Full test name.
    pub name: String,
    /// Failure output.
    pub messages: Vec<String>,
}
