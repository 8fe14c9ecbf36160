//! Employee records and their salary breakdown.

use chrono::{DateTime, NaiveDate, Utc};
use hrm_shared::types::{DepartmentId, EmployeeId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{DirectoryError, require, validate_email};

/// Gender as recorded by HR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
    /// Not disclosed.
    Undisclosed,
}

/// Marital status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    /// Single.
    Single,
    /// Married.
    Married,
    /// Divorced.
    Divorced,
    /// Widowed.
    Widowed,
}

/// Contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Permanent full-time.
    FullTime,
    /// Permanent part-time.
    PartTime,
    /// Fixed-term contractor.
    Contract,
    /// Intern.
    Intern,
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Working normally.
    #[default]
    Active,
    /// Within the probation window.
    Probation,
    /// On extended leave.
    OnLeave,
    /// Left the company.
    Inactive,
}

macro_rules! str_enum {
    ($ty:ty { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $ty {
            /// Returns the stored string form.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                }
            }

            /// Parses the stored string form.
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($s => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

str_enum!(Gender { Male => "male", Female => "female", Other => "other", Undisclosed => "undisclosed" });
str_enum!(MaritalStatus { Single => "single", Married => "married", Divorced => "divorced", Widowed => "widowed" });
str_enum!(EmploymentType { FullTime => "full_time", PartTime => "part_time", Contract => "contract", Intern => "intern" });
str_enum!(EmployeeStatus { Active => "active", Probation => "probation", OnLeave => "on_leave", Inactive => "inactive" });

/// Monthly salary components.
///
/// `net` is always `basic + hra + allowances - deductions`; use
/// [`SalaryBreakdown::new`] to build one and [`SalaryBreakdown::validate`] to
/// check a value read back from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Basic pay.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Other allowances.
    pub allowances: Decimal,
    /// Deductions (tax, provident fund, ...).
    pub deductions: Decimal,
    /// Take-home pay.
    pub net: Decimal,
}

/// Largest accepted value for any single salary component.
pub const MAX_SALARY_COMPONENT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

fn checked_gross(
    basic: Decimal,
    hra: Decimal,
    allowances: Decimal,
) -> Result<Decimal, DirectoryError> {
    basic
        .checked_add(hra)
        .ok_or(DirectoryError::SalaryOverflow("hra"))?
        .checked_add(allowances)
        .ok_or(DirectoryError::SalaryOverflow("allowances"))
}

/// Salary components as entered, before `net` is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponents {
    /// Basic pay.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Other allowances.
    #[serde(default)]
    pub allowances: Decimal,
    /// Deductions.
    #[serde(default)]
    pub deductions: Decimal,
}

impl SalaryBreakdown {
    /// Builds a breakdown, deriving `net`.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NegativeSalaryComponent` for a negative input
    /// and `DirectoryError::SalaryOverflow` for a component above
    /// [`MAX_SALARY_COMPONENT`].
    pub fn new(components: SalaryComponents) -> Result<Self, DirectoryError> {
        let SalaryComponents {
            basic,
            hra,
            allowances,
            deductions,
        } = components;
        for (name, value) in [
            ("basic", basic),
            ("hra", hra),
            ("allowances", allowances),
            ("deductions", deductions),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(DirectoryError::NegativeSalaryComponent(name));
            }
            if value > MAX_SALARY_COMPONENT {
                return Err(DirectoryError::SalaryOverflow(name));
            }
        }
        let gross = checked_gross(basic, hra, allowances)?;
        let net = gross
            .checked_sub(deductions)
            .ok_or(DirectoryError::SalaryOverflow("deductions"))?;
        Ok(Self {
            basic,
            hra,
            allowances,
            deductions,
            net,
        })
    }

    /// Gross pay before deductions.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::SalaryOverflow` if the sum does not fit a `Decimal`.
    pub fn gross(&self) -> Result<Decimal, DirectoryError> {
        checked_gross(self.basic, self.hra, self.allowances)
    }

    /// Checks components are non-negative and `net` matches them.
    ///
    /// # Errors
    ///
    /// Returns `NegativeSalaryComponent` or `InconsistentSalary`.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        let expected = Self::new(SalaryComponents {
            basic: self.basic,
            hra: self.hra,
            allowances: self.allowances,
            deductions: self.deductions,
        })?
        .net;
        if expected != self.net {
            return Err(DirectoryError::InconsistentSalary {
                expected,
                actual: self.net,
            });
        }
        Ok(())
    }
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street and house number.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country.
    pub country: String,
    /// Postal code.
    pub postal_code: String,
}

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee ID.
    pub id: EmployeeId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// HR code, unique within the tenant (e.g. `EMP006`).
    pub employee_code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Work email.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Marital status.
    pub marital_status: Option<MaritalStatus>,
    /// Department the employee belongs to.
    pub department_id: DepartmentId,
    /// Job title.
    pub designation: String,
    /// Contract type.
    pub employment_type: EmploymentType,
    /// First working day.
    pub joining_date: NaiveDate,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Direct manager, `None` for the top of the hierarchy.
    pub reporting_manager_id: Option<EmployeeId>,
    /// Monthly salary.
    pub salary: SalaryBreakdown,
    /// Home address.
    pub address: Address,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    /// HR code.
    pub employee_code: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Work email.
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Marital status.
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    /// Department.
    pub department_id: DepartmentId,
    /// Job title.
    pub designation: String,
    /// Contract type.
    pub employment_type: EmploymentType,
    /// First working day.
    pub joining_date: NaiveDate,
    /// Direct manager.
    #[serde(default)]
    pub reporting_manager_id: Option<EmployeeId>,
    /// Salary components; net is derived.
    pub salary: SalaryComponents,
    /// Home address.
    #[serde(default)]
    pub address: Address,
}

impl Employee {
    /// Validates the input and builds an active employee.
    ///
    /// The manager reference is not resolved here; the org chart owns that check.
    ///
    /// # Errors
    ///
    /// Returns a `DirectoryError` for blank names, a malformed email, negative
    /// salary components or a joining date before the date of birth.
    pub fn create(
        tenant_id: TenantId,
        input: NewEmployee,
        now: DateTime<Utc>,
    ) -> Result<Self, DirectoryError> {
        if let Some(dob) = input.date_of_birth
            && input.joining_date < dob
        {
            return Err(DirectoryError::JoiningBeforeBirth);
        }

        Ok(Self {
            id: EmployeeId::new(),
            tenant_id,
            employee_code: require("employee_code", &input.employee_code)?.to_uppercase(),
            first_name: require("first_name", &input.first_name)?,
            last_name: require("last_name", &input.last_name)?,
            email: validate_email(&input.email)?,
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            marital_status: input.marital_status,
            department_id: input.department_id,
            designation: require("designation", &input.designation)?,
            employment_type: input.employment_type,
            joining_date: input.joining_date,
            status: EmployeeStatus::Active,
            reporting_manager_id: input.reporting_manager_id,
            salary: SalaryBreakdown::new(input.salary)?,
            address: input.address,
            created_at: now,
            updated_at: now,
        })
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn components() -> SalaryComponents {
        SalaryComponents {
            basic: dec!(80000),
            hra: dec!(32000),
            allowances: dec!(15000),
            deductions: dec!(12000),
        }
    }

    fn new_employee() -> NewEmployee {
        NewEmployee {
            employee_code: "emp006".into(),
            first_name: "Arjun".into(),
            last_name: "Menon".into(),
            email: "Arjun.Menon@techcorp.in".into(),
            phone: Some("+91-9876543215".into()),
            date_of_birth: NaiveDate::from_ymd_opt(1992, 3, 14),
            gender: Some(Gender::Male),
            marital_status: Some(MaritalStatus::Single),
            department_id: DepartmentId::new(),
            designation: "Senior Software Engineer".into(),
            employment_type: EmploymentType::FullTime,
            joining_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            reporting_manager_id: None,
            salary: components(),
            address: Address::default(),
        }
    }

    #[test]
    fn test_net_salary_is_derived() {
        let salary = SalaryBreakdown::new(components()).unwrap();
        assert_eq!(salary.net, dec!(115000));
        assert_eq!(salary.gross(), Ok(dec!(127000)));
        assert!(salary.validate().is_ok());
    }

    #[test]
    fn test_inconsistent_net_detected() {
        let mut salary = SalaryBreakdown::new(components()).unwrap();
        salary.net = dec!(120000);
        assert_eq!(
            salary.validate(),
            Err(DirectoryError::InconsistentSalary {
                expected: dec!(115000),
                actual: dec!(120000),
            })
        );
    }

    #[test]
    fn test_negative_component_rejected() {
        let mut c = components();
        c.hra = dec!(-1);
        assert_eq!(
            SalaryBreakdown::new(c),
            Err(DirectoryError::NegativeSalaryComponent("hra"))
        );
    }

    #[test]
    fn test_salary_ceiling_is_one_trillion() {
        assert_eq!(MAX_SALARY_COMPONENT, dec!(1000000000000));
    }

    #[test]
    fn test_oversized_component_rejected_without_panic() {
        let c = SalaryComponents {
            basic: Decimal::MAX,
            hra: Decimal::ONE,
            allowances: Decimal::ZERO,
            deductions: Decimal::ZERO,
        };
        assert_eq!(
            SalaryBreakdown::new(c),
            Err(DirectoryError::SalaryOverflow("basic"))
        );
    }

    #[test]
    fn test_gross_of_hand_built_breakdown_overflows_cleanly() {
        let salary = SalaryBreakdown {
            basic: Decimal::MAX,
            hra: Decimal::MAX,
            allowances: Decimal::ZERO,
            deductions: Decimal::ZERO,
            net: Decimal::ZERO,
        };
        assert_eq!(salary.gross(), Err(DirectoryError::SalaryOverflow("hra")));
        assert_eq!(
            salary.validate(),
            Err(DirectoryError::SalaryOverflow("basic"))
        );
    }

    #[test]
    fn test_components_at_ceiling_accepted() {
        let c = SalaryComponents {
            basic: MAX_SALARY_COMPONENT,
            hra: MAX_SALARY_COMPONENT,
            allowances: MAX_SALARY_COMPONENT,
            deductions: Decimal::ZERO,
        };
        let salary = SalaryBreakdown::new(c).unwrap();
        assert_eq!(salary.net, dec!(3000000000000));
    }

    #[test]
    fn test_create_normalizes() {
        let employee = Employee::create(TenantId::new(), new_employee(), Utc::now()).unwrap();
        assert_eq!(employee.employee_code, "EMP006");
        assert_eq!(employee.email, "arjun.menon@techcorp.in");
        assert_eq!(employee.full_name(), "Arjun Menon");
        assert_eq!(employee.status, EmployeeStatus::Active);
    }

    #[test]
    fn test_joining_before_birth_rejected() {
        let mut input = new_employee();
        input.joining_date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(
            Employee::create(TenantId::new(), input, Utc::now()),
            Err(DirectoryError::JoiningBeforeBirth)
        );
    }

    #[test]
    fn test_enum_string_forms() {
        assert_eq!(EmploymentType::FullTime.as_str(), "full_time");
        assert_eq!(EmployeeStatus::parse("on_leave"), Some(EmployeeStatus::OnLeave));
        assert_eq!(Gender::parse("unknown"), None);
    }
}
