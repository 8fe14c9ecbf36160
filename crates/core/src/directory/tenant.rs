//! Tenants: isolated customer organizations and their subscription.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc, Weekday};
use hrm_shared::types::{Currency, TenantId};
use serde::{Deserialize, Serialize};

use super::error::{DirectoryError, require};

const SLUG_MIN_LEN: usize = 2;
const SLUG_MAX_LEN: usize = 63;

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    /// Evaluation plan.
    Trial,
    /// Small teams.
    Basic,
    /// Growing companies.
    Professional,
    /// Unlimited features.
    Enterprise,
}

impl SubscriptionPlan {
    /// Features bundled with the plan when none are given explicitly.
    #[must_use]
    pub fn default_features(self) -> BTreeSet<Feature> {
        use Feature as F;
        let features: &[Feature] = match self {
            Self::Trial | Self::Basic => &[F::Employees, F::Onboarding],
            Self::Professional => &[
                F::Employees,
                F::Onboarding,
                F::Offboarding,
                F::Expenses,
                F::Timesheets,
            ],
            Self::Enterprise => &F::ALL,
        };
        features.iter().copied().collect()
    }
}

/// Product area a subscription can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Employee directory.
    Employees,
    /// Benefits enrollment.
    Benefits,
    /// Expense reimbursement.
    Expenses,
    /// Onboarding cases.
    Onboarding,
    /// Offboarding cases.
    Offboarding,
    /// Timesheets.
    Timesheets,
    /// Dashboards and exports.
    Reports,
}

impl Feature {
    /// Every feature.
    pub const ALL: [Self; 7] = [
        Self::Employees,
        Self::Benefits,
        Self::Expenses,
        Self::Onboarding,
        Self::Offboarding,
        Self::Timesheets,
        Self::Reports,
    ];

    /// Stored/serialized name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Benefits => "benefits",
            Self::Expenses => "expenses",
            Self::Onboarding => "onboarding",
            Self::Offboarding => "offboarding",
            Self::Timesheets => "timesheets",
            Self::Reports => "reports",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant subscription: plan, employee cap, feature set and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Plan tier.
    pub plan: SubscriptionPlan,
    /// Maximum number of employee records.
    pub max_employees: u32,
    /// Unlocked features.
    pub features: BTreeSet<Feature>,
    /// When the subscription lapses.
    pub expires_at: DateTime<Utc>,
}

impl Subscription {
    /// Returns true once `now` is past the expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the feature is part of the subscription.
    #[must_use]
    pub fn includes(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Checks the subscription allows adding one more employee.
    ///
    /// # Errors
    ///
    /// Fails when expired, when the directory feature is missing, or at the cap.
    pub fn check_employee_capacity(
        &self,
        current_count: u64,
        now: DateTime<Utc>,
    ) -> Result<(), DirectoryError> {
        if self.is_expired(now) {
            return Err(DirectoryError::SubscriptionExpired);
        }
        if !self.includes(Feature::Employees) {
            return Err(DirectoryError::FeatureNotIncluded(Feature::Employees));
        }
        if current_count >= u64::from(self.max_employees) {
            return Err(DirectoryError::EmployeeCapReached {
                cap: self.max_employees,
            });
        }
        Ok(())
    }
}

/// Tenant-wide working calendar and locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSettings {
    /// IANA timezone name, e.g. `Asia/Kolkata`.
    pub timezone: String,
    /// Currency salaries and expenses are recorded in.
    pub currency: Currency,
    /// Days of the week that count as working days.
    pub working_days: Vec<Weekday>,
    /// Standard working hours per day.
    pub working_hours_per_day: u8,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            currency: Currency::default(),
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            working_hours_per_day: 8,
        }
    }
}

impl TenantSettings {
    /// Validates the timezone and working calendar.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(DirectoryError::InvalidTimezone(self.timezone.clone()));
        }
        if self.working_days.is_empty() {
            return Err(DirectoryError::NoWorkingDays);
        }
        if !(1..=24).contains(&self.working_hours_per_day) {
            return Err(DirectoryError::InvalidWorkingHours(
                self.working_hours_per_day,
            ));
        }
        Ok(())
    }
}

/// A tenant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant ID.
    pub id: TenantId,
    /// Display name.
    pub name: String,
    /// Globally unique URL-safe key.
    pub slug: String,
    /// Primary email/web domain, if any.
    pub domain: Option<String>,
    /// Working calendar and locale.
    pub settings: TenantSettings,
    /// Plan and limits.
    pub subscription: Subscription,
    /// Whether the tenant may be used.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenant {
    /// Display name.
    pub name: String,
    /// Requested slug; normalized to lowercase.
    pub slug: String,
    /// Primary domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Settings; defaults apply when omitted.
    #[serde(default)]
    pub settings: TenantSettings,
    /// Subscription.
    pub subscription: Subscription,
}

impl Tenant {
    /// Validates the input and builds a new active tenant.
    ///
    /// # Errors
    ///
    /// Returns a `DirectoryError` for an invalid slug, bad settings, or a
    /// subscription that expires before `now`.
    pub fn create(input: NewTenant, now: DateTime<Utc>) -> Result<Self, DirectoryError> {
        let name = require("name", &input.name)?;
        let slug = normalize_slug(&input.slug)?;
        input.settings.validate()?;
        if input.subscription.expires_at < now {
            return Err(DirectoryError::SubscriptionExpiresBeforeCreation);
        }

        Ok(Self {
            id: TenantId::new(),
            name,
            slug,
            domain: input
                .domain
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty()),
            settings: input.settings,
            subscription: input.subscription,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Lowercases and validates a tenant slug.
///
/// # Errors
///
/// Returns `DirectoryError::InvalidSlug` unless the slug is 2-63 characters of
/// `[a-z0-9-]` without a leading or trailing dash.
pub fn normalize_slug(raw: &str) -> Result<String, DirectoryError> {
    let slug = raw.trim().to_lowercase();
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let valid = valid_chars
        && (SLUG_MIN_LEN..=SLUG_MAX_LEN).contains(&slug.len())
        && !slug.starts_with('-')
        && !slug.ends_with('-');
    if valid {
        Ok(slug)
    } else {
        Err(DirectoryError::InvalidSlug(raw.to_string()))
    }
}
