//! Test-run report generation.
//!
//! Turns a Jest-style results document into a JSON summary and a static HTML
//! dashboard. [`ReportGenerator::generate`] does the file I/O; everything else
//! is a pure transform.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::{HTML_REPORT, JSON_REPORT, ReportGenerator, escape_html};
pub use types::*;
