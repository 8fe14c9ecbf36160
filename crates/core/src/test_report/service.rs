//! Test-report generation.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AssertionStatus, FailedTest, ReportSummary, SuiteResult, SuiteSummary, TestRun,
};

/// File name of the JSON summary.
pub const JSON_REPORT: &str = "test-report.json";
/// File name of the HTML dashboard.
pub const HTML_REPORT: &str = "test-report.html";

/// Stateless test-report generator.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Parses a results document.
    ///
    /// # Errors
    ///
    /// Returns `ParseFailure` if the text is not a valid document.
    pub fn parse_results(json: &str) -> Result<TestRun, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the summary for a run.
    #[must_use]
    pub fn summarize(run: &TestRun, generated_at: DateTime<Utc>) -> ReportSummary {
        let success = run
            .success
            .unwrap_or(run.num_failed_tests == 0 && !run.test_results.is_empty());

        let suites = run.test_results.iter().map(summarize_suite).collect();
        let failures = run
            .test_results
            .iter()
            .flat_map(|suite| {
                suite
                    .assertion_results
                    .iter()
                    .filter(|a| a.status == AssertionStatus::Failed)
                    .map(|a| FailedTest {
                        suite: suite.name.clone(),
                        name: if a.full_name.is_empty() {
                            a.title.clone()
                        } else {
                            a.full_name.clone()
                        },
                        messages: a.failure_messages.clone(),
                    })
            })
            .collect();

        ReportSummary {
            generated_at,
            started_at: run.start_time.and_then(DateTime::from_timestamp_millis),
            total: run.num_total_tests,
            passed: run.num_passed_tests,
            failed: run.num_failed_tests,
            pending: run.num_pending_tests,
            pass_rate: pass_rate(run.num_passed_tests, run.num_total_tests),
            success,
            suites,
            failures,
        }
    }

    /// Process exit code for a summary: 0 on success, else 1.
    #[must_use]
    pub const fn exit_code(summary: &ReportSummary) -> i32 {
        if summary.success { 0 } else { 1 }
    }

    /// Renders the summary as a standalone HTML page.
    #[must_use]
    pub fn render_html(summary: &ReportSummary) -> String {
        let mut html = String::with_capacity(4096);
        let verdict = if summary.success { "PASSED" } else { "FAILED" };
        let verdict_class = if summary.success { "pass" } else { "fail" };

        html.push_str(concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n<title>Test Report</title>\n<style>\n",
            "body{font-family:system-ui,sans-serif;margin:2rem;color:#1f2933}\n",
            ".cards{display:flex;gap:1rem;margin:1rem 0}\n",
            ".card{border:1px solid #d9e2ec;border-radius:8px;padding:1rem 1.5rem}\n",
            ".card .value{font-size:1.75rem;font-weight:600}\n",
            ".pass{color:#2f855a}.fail{color:#c53030}\n",
            "table{border-collapse:collapse;width:100%}\n",
            "th,td{border-bottom:1px solid #e4e7eb;padding:.5rem;text-align:left}\n",
            "pre{background:#fff5f5;padding:.75rem;overflow-x:auto}\n",
            "</style>\n</head>\n<body>\n",
        ));

        let _ = writeln!(html, "<h1>Test Report <span class=\"{verdict_class}\">{verdict}</span></h1>");
        let _ = writeln!(
            html,
            "<p>Generated {}</p>",
            escape_html(&summary.generated_at.to_rfc3339())
        );

        html.push_str("<div class=\"cards\">\n");
        for (label, value) in [
            ("Total", summary.total.to_string()),
            ("Passed", summary.passed.to_string()),
            ("Failed", summary.failed.to_string()),
            ("Pending", summary.pending.to_string()),
            ("Pass rate", format!("{}%", summary.pass_rate)),
        ] {
            let _ = writeln!(
                html,
                "<div class=\"card\"><div>{label}</div><div class=\"value\">{}</div></div>",
                escape_html(&value)
            );
        }
        html.push_str("</div>\n");

        html.push_str("<h2>Suites</h2>\n<table>\n<tr><th>Suite</th><th>Status</th><th>Total</th><th>Passed</th><th>Failed</th><th>Pending</th><th>Duration</th></tr>\n");
        for suite in &summary.suites {
            let duration = suite
                .duration_ms
                .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms"));
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&suite.name),
                escape_html(&suite.status),
                suite.total,
                suite.passed,
                suite.failed,
                suite.pending,
                duration,
            );
        }
        html.push_str("</table>\n");

        if !summary.failures.is_empty() {
            html.push_str("<h2>Failures</h2>\n");
            for failure in &summary.failures {
                let _ = writeln!(
                    html,
                    "<h3 class=\"fail\">{}</h3>\n<p>{}</p>",
                    escape_html(&failure.name),
                    escape_html(&failure.suite)
                );
                for message in &failure.messages {
                    let _ = writeln!(html, "<pre>{}</pre>", escape_html(message));
                }
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Reads `input`, writes both reports into `out_dir`, and returns the
    /// summary.
    ///
    /// # Errors
    ///
    /// - `MissingInput` if `input` does not exist
    /// - `ParseFailure` if it is not a valid document
    /// - `Io` if reading or writing fails otherwise
    pub fn generate(
        input: &Path,
        out_dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<ReportSummary, ReportError> {
        let raw = fs::read_to_string(input).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ReportError::MissingInput(input.to_path_buf())
            } else {
                ReportError::Io {
                    path: input.to_path_buf(),
                    source,
                }
            }
        })?;

        let run = Self::parse_results(&raw)?;
        let summary = Self::summarize(&run, now);

        fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let json = serde_json::to_string_pretty(&summary)?;
        write_file(&out_dir.join(JSON_REPORT), &json)?;
        write_file(&out_dir.join(HTML_REPORT), &Self::render_html(&summary))?;

        tracing::info!(
            total = summary.total,
            failed = summary.failed,
            success = summary.success,
            out_dir = %out_dir.display(),
            "test report written"
        );
        Ok(summary)
    }
}

fn summarize_suite(suite: &SuiteResult) -> SuiteSummary {
    let count = |status: AssertionStatus| {
        suite
            .assertion_results
            .iter()
            .filter(|a| a.status == status)
            .count()
    };
    let pending = suite
        .assertion_results
        .iter()
        .filter(|a| {
            matches!(
                a.status,
                AssertionStatus::Pending | AssertionStatus::Todo | AssertionStatus::Disabled
            )
        })
        .count();

    SuiteSummary {
        name: suite.name.clone(),
        status: suite.status.clone(),
        total: suite.assertion_results.len(),
        passed: count(AssertionStatus::Passed),
        failed: count(AssertionStatus::Failed),
        pending,
        duration_ms: match (suite.start_time, suite.end_time) {
            (Some(start), Some(end)) => u64::try_from(end.saturating_sub(start)).ok(),
            _ => None,
        },
    }
}

/// `passed / total * 100` at scale 2; zero for an empty run.
fn pass_rate(passed: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    let mut rate = (Decimal::from(passed) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2);
    rate.rescale(2);
    rate
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Escapes text for safe interpolation into HTML element or attribute content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
