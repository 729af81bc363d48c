//! Domain types for the VersaPay ledger.
//!
//! Field names serialize in camelCase so stored records keep the shape
//! `{ employees, settings, payrollHistory }` used by existing data.
//! Monetary amounts and percentage rates are [`Decimal`] and serialize as
//! JSON numbers.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a registered organization (`org_<ms>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(pub String);

impl OrganizationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for OrganizationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrganizationId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of an employee, unique within one organization (`emp_<ms>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EmployeeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a payroll run (`pay_<ms>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayrollRunId(pub String);

impl PayrollRunId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayrollRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PayrollRunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PayrollRunId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Pay period
// ---------------------------------------------------------------------------

/// A calendar month selected for a payroll run, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayPeriod {
    year: i32,
    month: u32,
}

impl PayPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(LedgerError::InvalidPeriod(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing today's date (UTC).
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the period; this is the date stamped on a run.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for PayPeriod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidPeriod(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A registered organization. The password is stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub password: String,
}

impl Organization {
    /// Case-insensitive name comparison used for login and uniqueness.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The organization directory stored under `versaPayDB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Directory {
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

impl Directory {
    pub fn find_by_name(&self, name: &str) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.name_matches(name))
    }

    pub fn find_by_id(&self, id: &OrganizationId) -> Option<&Organization> {
        self.organizations.iter().find(|o| &o.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    pub basic_salary: Decimal,
}

/// A named flat amount (allowance or deduction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayItem {
    pub name: String,
    pub amount: Decimal,
}

impl PayItem {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Organization-wide pay policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub currency: String,
    /// Percent of gross withheld as tax.
    pub tax_rate: Decimal,
    /// Percent of gross withheld as pension.
    pub pension_rate: Decimal,
    #[serde(default)]
    pub allowances: Vec<PayItem>,
    #[serde(default)]
    pub deductions: Vec<PayItem>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            tax_rate: dec!(15),
            pension_rate: dec!(5),
            allowances: vec![
                PayItem::new("Housing", dec!(200)),
                PayItem::new("Transport", dec!(100)),
            ],
            deductions: vec![PayItem::new("Union Dues", dec!(20))],
        }
    }
}

impl Settings {
    /// Sum of all allowances; applied identically to every employee.
    /// `None` if the sum overflows.
    pub fn allowance_total(&self) -> Option<Decimal> {
        checked_total(&self.allowances)
    }

    /// Sum of all flat deductions; applied identically to every employee.
    /// `None` if the sum overflows.
    pub fn deduction_total(&self) -> Option<Decimal> {
        checked_total(&self.deductions)
    }
}

fn checked_total(items: &[PayItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.amount))
}

/// Frozen snapshot of one employee's pay computation inside a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub employee_role: String,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub gross_salary: Decimal,
    pub tax: Decimal,
    pub pension: Decimal,
    pub other_deductions: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

/// One executed payroll. Immutable once appended to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRun {
    pub id: PayrollRunId,
    #[serde(with = "run_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub records: Vec<PayrollRecord>,
    pub total_cost: Decimal,
}

impl PayrollRun {
    pub fn record_for(&self, employee: &EmployeeId) -> Option<&PayrollRecord> {
        self.records.iter().find(|r| &r.employee_id == employee)
    }
}

/// Everything stored for one organization under `org_<organizationId>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDataset {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub payroll_history: Vec<PayrollRun>,
}

impl OrganizationDataset {
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Fields for a new employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub name: String,
    pub role: String,
    pub basic_salary: Decimal,
}

/// Partial edit of an existing employee; `None` keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub basic_salary: Option<Decimal>,
}

/// Partial edit of the settings form: currency, tax rate and pension rate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsUpdate {
    pub currency: Option<String>,
    pub tax_rate: Option<Decimal>,
    pub pension_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPayrollRequest {
    pub period: PayPeriod,
}

// ---------------------------------------------------------------------------
// Run date encoding
// ---------------------------------------------------------------------------

/// Stores a run date as a UTC midnight timestamp (`2024-05-01T00:00:00.000Z`).
/// Reads accept that form, any RFC 3339 timestamp, or a bare `YYYY-MM-DD`.
mod run_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.with_timezone(&Utc).date_naive());
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| de::Error::custom(format!("invalid payroll date '{raw}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
