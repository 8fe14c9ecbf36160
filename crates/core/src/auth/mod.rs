//! Authentication primitives.
//!
//! This module provides:
//! - Password hashing with Argon2id and a configurable work factor
//! - Password verification
//! - User roles and the permissions each role is granted

mod password;

pub use password::{PasswordError, hash_password_with_cost, verify_password};

use serde::{Deserialize, Serialize};

/// Login roles, from system-wide down to self-service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Operates the whole installation; lives in the system tenant.
    SuperAdmin,
    /// Full access within one tenant.
    Admin,
    /// Runs HR processes: records, onboarding, benefits.
    HrManager,
    /// Approves expenses and timesheets for their reports.
    Manager,
    /// Self-service only.
    Employee,
}

/// Fine-grained permissions stored alongside the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create and configure tenants.
    ManageTenants,
    /// Create and deactivate logins.
    ManageUsers,
    /// Create and edit employee records.
    ManageEmployees,
    /// Read employee records.
    ViewEmployees,
    /// Submit own expense reports.
    SubmitExpenses,
    /// Approve or reject expense reports.
    ApproveExpenses,
    /// Maintain benefit plans and enrollments.
    ManageBenefits,
    /// Run onboarding and offboarding cases.
    ManageOnboarding,
    /// Submit own timesheets.
    SubmitTimesheets,
    /// Approve timesheets.
    ApproveTimesheets,
    /// Read dashboards and reports.
    ViewReports,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::ManageTenants,
        Self::ManageUsers,
        Self::ManageEmployees,
        Self::ViewEmployees,
        Self::SubmitExpenses,
        Self::ApproveExpenses,
        Self::ManageBenefits,
        Self::ManageOnboarding,
        Self::SubmitTimesheets,
        Self::ApproveTimesheets,
        Self::ViewReports,
    ];
}

impl UserRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::HrManager => "hr_manager",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Parses a role from its stored form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "hr_manager" => Some(Self::HrManager),
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Permissions granted to a freshly created login with this role.
    #[must_use]
    pub fn default_permissions(&self) -> Vec<Permission> {
        use Permission as P;
        match self {
            Self::SuperAdmin => P::ALL.to_vec(),
            Self::Admin => P::ALL
                .into_iter()
                .filter(|p| *p != P::ManageTenants)
                .collect(),
            Self::HrManager => vec![
                P::ManageEmployees,
                P::ViewEmployees,
                P::ManageBenefits,
                P::ManageOnboarding,
                P::ApproveExpenses,
                P::ViewReports,
            ],
            Self::Manager => vec![
                P::ViewEmployees,
                P::SubmitExpenses,
                P::ApproveExpenses,
                P::SubmitTimesheets,
                P::ApproveTimesheets,
            ],
            Self::Employee => vec![P::SubmitExpenses, P::SubmitTimesheets],
        }
    }

    /// Returns true if this role can approve expense reports and timesheets.
    #[must_use]
    pub const fn can_approve(&self) -> bool {
        matches!(
            self,
            Self::SuperAdmin | Self::Admin | Self::HrManager | Self::Manager
        )
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_storage_form() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::HrManager,
            UserRole::Manager,
            UserRole::Employee,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[test]
    fn test_super_admin_gets_everything() {
        assert_eq!(
            UserRole::SuperAdmin.default_permissions().len(),
            Permission::ALL.len()
        );
        assert!(
            !UserRole::Admin
                .default_permissions()
                .contains(&Permission::ManageTenants)
        );
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Manager.can_approve());
        assert!(!UserRole::Employee.can_approve());
        assert!(
            UserRole::Employee
                .default_permissions()
                .contains(&Permission::SubmitTimesheets)
        );
    }
}
