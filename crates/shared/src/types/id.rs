//! Typed IDs for type-safe entity references.
//!
//! Every tenant-scoped record kind gets its own wrapper, so a manager reference
//! is an `EmployeeId` and cannot be confused with the `TenantId` it is scoped by.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant organization.");
typed_id!(DepartmentId, "Unique identifier for a department.");
typed_id!(EmployeeId, "Unique identifier for an employee record.");
typed_id!(UserId, "Unique identifier for a login account.");
typed_id!(BenefitPlanId, "Unique identifier for a benefit plan.");
typed_id!(EnrollmentId, "Unique identifier for a benefit enrollment.");
typed_id!(ExpenseReportId, "Unique identifier for an expense report.");
typed_id!(ExpenseItemId, "Unique identifier for a single expense line.");
typed_id!(OnboardingCaseId, "Unique identifier for an onboarding case.");
typed_id!(OffboardingCaseId, "Unique identifier for an offboarding case.");
typed_id!(TimesheetId, "Unique identifier for a weekly timesheet entry.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
