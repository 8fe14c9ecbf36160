//! Directory validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use super::tenant::Feature;

/// Errors raised while validating tenants, departments and employees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Slug is not lowercase alphanumerics and dashes, or has a bad length.
    #[error("Invalid tenant slug '{0}'")]
    InvalidSlug(String),

    /// Timezone is not a known IANA zone.
    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    /// Working hours per day must be between 1 and 24.
    #[error("Working hours per day must be 1-24, got {0}")]
    InvalidWorkingHours(u8),

    /// Tenant settings list no working days.
    #[error("At least one working day is required")]
    NoWorkingDays,

    /// Subscription expires before the tenant was created.
    #[error("Subscription expiry precedes tenant creation")]
    SubscriptionExpiresBeforeCreation,

    /// Subscription has lapsed.
    #[error("Subscription has expired")]
    SubscriptionExpired,

    /// Feature is not part of the tenant's plan.
    #[error("Feature '{0}' is not included in the subscription")]
    FeatureNotIncluded(Feature),

    /// Tenant is at its employee cap.
    #[error("Employee limit of {cap} reached")]
    EmployeeCapReached {
        /// The plan's employee cap.
        cap: u32,
    },

    /// A required text field is blank.
    #[error("Field '{0}' must not be blank")]
    BlankField(&'static str),

    /// Email address is not plausibly valid.
    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    /// A salary component is negative.
    #[error("Salary component '{0}' must not be negative")]
    NegativeSalaryComponent(&'static str),

    /// A salary component exceeds the supported ceiling, or the totals overflow.
    #[error("Salary component '{0}' is out of range")]
    SalaryOverflow(&'static str),

    /// Stored net salary disagrees with its components.
    #[error("Net salary {actual} does not match computed {expected}")]
    InconsistentSalary {
        /// basic + hra + allowances - deductions.
        expected: Decimal,
        /// The net value supplied.
        actual: Decimal,
    },

    /// Joining date precedes date of birth.
    #[error("Joining date precedes date of birth")]
    JoiningBeforeBirth,
}

impl DirectoryError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::SubscriptionExpired
            | Self::FeatureNotIncluded(_)
            | Self::EmployeeCapReached { .. } => 422,
            _ => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSlug(_) => "INVALID_SLUG",
            Self::InvalidTimezone(_) => "INVALID_TIMEZONE",
            Self::InvalidWorkingHours(_) | Self::NoWorkingDays => "INVALID_SETTINGS",
            Self::SubscriptionExpiresBeforeCreation => "INVALID_SUBSCRIPTION",
            Self::SubscriptionExpired => "SUBSCRIPTION_EXPIRED",
            Self::FeatureNotIncluded(_) => "FEATURE_NOT_INCLUDED",
            Self::EmployeeCapReached { .. } => "EMPLOYEE_CAP_REACHED",
            Self::BlankField(_) => "BLANK_FIELD",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::NegativeSalaryComponent(_) | Self::InconsistentSalary { .. } => "INVALID_SALARY",
            Self::SalaryOverflow(_) => "SALARY_OVERFLOW",
            Self::JoiningBeforeBirth => "INVALID_DATES",
        }
    }
}

/// Rejects blank strings, returning the trimmed value.
pub(crate) fn require(field: &'static str, value: &str) -> Result<String, DirectoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DirectoryError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain.
///
/// # Errors
///
/// Returns `DirectoryError::InvalidEmail` for a malformed address.
pub fn validate_email(email: &str) -> Result<String, DirectoryError> {
    let normalized = email.trim().to_lowercase();
    let valid = match normalized.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(normalized)
    } else {
        Err(DirectoryError::InvalidEmail(email.to_string()))
    }
}
