//! Status enums for the workflow records.
//!
//! Each enum is closed; the legal moves between variants live in
//! [`super::lifecycle`].

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored string form.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                }
            }

            /// Parses the stored string form, ignoring ASCII case.
            pub fn parse(s: &str) -> Option<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($s => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum!(
    /// Status of a single expense line.
    ExpenseItemStatus {
        /// Awaiting a decision.
        Pending => "pending",
        /// Accepted for reimbursement.
        Approved => "approved",
        /// Refused.
        Rejected => "rejected",
    }
);

status_enum!(
    /// Status of an expense report as a whole.
    ExpenseReportStatus {
        /// Filed by the employee.
        Submitted => "submitted",
        /// Under review by finance.
        Processing => "processing",
        /// Reimbursement approved.
        Approved => "approved",
        /// Reimbursement refused.
        Rejected => "rejected",
    }
);

status_enum!(
    /// Status shared by onboarding and offboarding cases.
    CaseStatus {
        /// Not started.
        Pending => "pending",
        /// Tasks under way.
        InProgress => "in_progress",
        /// All tasks done.
        Completed => "completed",
    }
);

status_enum!(
    /// Status of a weekly timesheet.
    TimesheetStatus {
        /// Still being filled in.
        Draft => "draft",
        /// Sent to the manager.
        Submitted => "submitted",
        /// Signed off.
        Approved => "approved",
    }
);

status_enum!(
    /// Status of a benefit enrollment.
    EnrollmentStatus {
        /// Requested, not yet in force.
        Pending => "pending",
        /// Coverage in force.
        Active => "active",
    }
);
