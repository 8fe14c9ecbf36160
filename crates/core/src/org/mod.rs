//! Reporting hierarchy for a single tenant.
//!
//! Employees point at their manager through an optional
//! `reporting_manager_id`. Within one tenant those edges form a forest: every
//! node has at most one parent and no chain loops back on itself. [`OrgChart`]
//! enforces that on every insert and reassignment and exposes the lazy
//! traversals used by the API and the seeder.

pub mod chart;
pub mod error;

#[cfg(test)]
mod chart_props;

pub use chart::{Chain, OrgChart, OrgNode, Subtree};
pub use error::OrgError;
