//! Employee roster and settings edits on an in-memory dataset.
//!
//! These functions validate and mutate; they never persist. The ledger runs
//! them on a copy of the session dataset and commits only after the copy has
//! been stored.

use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::types::{
    Employee, EmployeeDraft, EmployeeId, EmployeeUpdate, OrganizationDataset, Settings,
    SettingsUpdate,
};

fn required(field: &str, value: &str) -> Result<String, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Largest accepted basic salary. Keeps every payroll figure, and any run
/// total over a realistic roster, far inside the decimal range.
pub const MAX_SALARY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest accepted tax or pension rate, in percent.
pub const MAX_RATE: Decimal = Decimal::ONE_HUNDRED;

fn bounded(field: &str, value: Decimal, max: Decimal) -> Result<Decimal, LedgerError> {
    if value < Decimal::ZERO {
        return Err(LedgerError::Validation(format!("{field} cannot be negative")));
    }
    if value > max {
        return Err(LedgerError::Validation(format!("{field} cannot exceed {max}")));
    }
    Ok(value)
}

/// Append a new employee under `id`.
pub fn add_employee(
    dataset: &mut OrganizationDataset,
    id: EmployeeId,
    draft: &EmployeeDraft,
) -> Result<Employee, LedgerError> {
    if dataset.employee(&id).is_some() {
        return Err(LedgerError::Validation(format!("employee id '{id}' is already in use")));
    }
    let employee = Employee {
        id,
        name: required("name", &draft.name)?,
        role: required("role", &draft.role)?,
        basic_salary: bounded("basic salary", draft.basic_salary, MAX_SALARY)?,
    };
    dataset.employees.push(employee.clone());
    Ok(employee)
}

/// Overwrite the given fields of an existing employee in place.
pub fn update_employee(
    dataset: &mut OrganizationDataset,
    id: &EmployeeId,
    update: &EmployeeUpdate,
) -> Result<Employee, LedgerError> {
    let name = update.name.as_deref().map(|n| required("name", n)).transpose()?;
    let role = update.role.as_deref().map(|r| required("role", r)).transpose()?;
    let salary = update
        .basic_salary
        .map(|s| bounded("basic salary", s, MAX_SALARY))
        .transpose()?;

    let employee = dataset
        .employees
        .iter_mut()
        .find(|e| &e.id == id)
        .ok_or_else(|| LedgerError::EmployeeNotFound(id.clone()))?;
    if let Some(name) = name {
        employee.name = name;
    }
    if let Some(role) = role {
        employee.role = role;
    }
    if let Some(salary) = salary {
        employee.basic_salary = salary;
    }
    Ok(employee.clone())
}

/// Remove an employee. Past payroll records keep their snapshot.
pub fn delete_employee(
    dataset: &mut OrganizationDataset,
    id: &EmployeeId,
) -> Result<Employee, LedgerError> {
    let index = dataset
        .employees
        .iter()
        .position(|e| &e.id == id)
        .ok_or_else(|| LedgerError::EmployeeNotFound(id.clone()))?;
    Ok(dataset.employees.remove(index))
}

/// Apply the settings form. Allowance and deduction lists are left alone.
pub fn apply_settings(settings: &mut Settings, update: &SettingsUpdate) -> Result<(), LedgerError> {
    let currency = update
        .currency
        .as_deref()
        .map(|c| required("currency", c))
        .transpose()?;
    let tax_rate = update
        .tax_rate
        .map(|r| bounded("tax rate", r, MAX_RATE))
        .transpose()?;
    let pension_rate = update
        .pension_rate
        .map(|r| bounded("pension rate", r, MAX_RATE))
        .transpose()?;

    if let Some(currency) = currency {
        settings.currency = currency;
    }
    if let Some(rate) = tax_rate {
        settings.tax_rate = rate;
    }
    if let Some(rate) = pension_rate {
        settings.pension_rate = rate;
    }
    Ok(())
}
