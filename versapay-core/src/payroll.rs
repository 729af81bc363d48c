//! Payroll engine and history queries.
//!
//! [`compute_run`] is pure: it reads a roster and a policy and returns a new
//! [`PayrollRun`] without touching the dataset. Appending and persisting the
//! run is done by [`crate::session::Ledger::run_payroll`].
//!
//! Per employee, with `A` the allowance total and `D` the flat deduction total
//! from settings:
//!
//! ```text
//! gross   = basic + A
//! tax     = gross * taxRate / 100
//! pension = gross * pensionRate / 100
//! total   = tax + pension + D
//! net     = gross - total
//! ```
//!
//! No rounding is applied here; amounts are rounded only when displayed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerError;
use crate::types::{
    Employee, EmployeeId, OrganizationDataset, PayPeriod, PayrollRecord, PayrollRun,
    PayrollRunId, Settings,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

fn in_range(value: Option<Decimal>, what: &'static str) -> Result<Decimal, LedgerError> {
    value.ok_or(LedgerError::AmountOutOfRange(what))
}

fn percent_of(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount.checked_mul(rate)?.checked_div(HUNDRED)
}

/// Compute one employee's pay snapshot under `settings`.
///
/// Fails with [`LedgerError::AmountOutOfRange`] instead of overflowing.
pub fn compute_record(employee: &Employee, settings: &Settings) -> Result<PayrollRecord, LedgerError> {
    let allowances = in_range(settings.allowance_total(), "allowance total")?;
    let other_deductions = in_range(settings.deduction_total(), "deduction total")?;

    let gross_salary = in_range(employee.basic_salary.checked_add(allowances), "gross salary")?;
    let tax = in_range(percent_of(gross_salary, settings.tax_rate), "tax")?;
    let pension = in_range(percent_of(gross_salary, settings.pension_rate), "pension")?;
    let total_deductions = in_range(
        tax.checked_add(pension)
            .and_then(|sum| sum.checked_add(other_deductions)),
        "total deductions",
    )?;
    let net_salary = in_range(gross_salary.checked_sub(total_deductions), "net salary")?;

    Ok(PayrollRecord {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        employee_role: employee.role.clone(),
        basic_salary: employee.basic_salary,
        allowances,
        gross_salary,
        tax,
        pension,
        other_deductions,
        total_deductions,
        net_salary,
    })
}

/// Build the run for `period` over the whole roster, in roster order.
///
/// Fails with [`LedgerError::EmptyRoster`] when there are no employees.
pub fn compute_run(
    dataset: &OrganizationDataset,
    period: PayPeriod,
    id: PayrollRunId,
) -> Result<PayrollRun, LedgerError> {
    if dataset.employees.is_empty() {
        return Err(LedgerError::EmptyRoster);
    }

    let records = dataset
        .employees
        .iter()
        .map(|employee| compute_record(employee, &dataset.settings))
        .collect::<Result<Vec<_>, _>>()?;
    let total_cost = in_range(
        records
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.gross_salary)),
        "total cost",
    )?;

    Ok(PayrollRun {
        id,
        date: period.first_day(),
        records,
        total_cost,
    })
}

// ---------------------------------------------------------------------------
// History queries
// ---------------------------------------------------------------------------

/// The most recently appended run.
pub fn latest_run(dataset: &OrganizationDataset) -> Option<&PayrollRun> {
    dataset.payroll_history.last()
}

/// Payroll history for reports, newest run first.
pub fn history_newest_first(dataset: &OrganizationDataset) -> Vec<&PayrollRun> {
    dataset.payroll_history.iter().rev().collect()
}

pub fn find_run<'a>(
    dataset: &'a OrganizationDataset,
    run_id: &PayrollRunId,
) -> Result<&'a PayrollRun, LedgerError> {
    dataset
        .payroll_history
        .iter()
        .find(|run| &run.id == run_id)
        .ok_or_else(|| LedgerError::RunNotFound(run_id.clone()))
}

/// Locate the payslip data for one employee in one run.
pub fn find_record<'a>(
    dataset: &'a OrganizationDataset,
    run_id: &PayrollRunId,
    employee_id: &EmployeeId,
) -> Result<(&'a PayrollRun, &'a PayrollRecord), LedgerError> {
    let run = find_run(dataset, run_id)?;
    let record = run
        .record_for(employee_id)
        .ok_or_else(|| LedgerError::RecordNotFound {
            run: run_id.clone(),
            employee: employee_id.clone(),
        })?;
    Ok((run, record))
}

/// Headline figures for the dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub employee_count: usize,
    /// Total cost (sum of gross salaries) of the latest run; zero before the
    /// first run.
    pub last_run_cost: Decimal,
    pub last_run_date: Option<NaiveDate>,
}

pub fn dashboard(dataset: &OrganizationDataset) -> DashboardSummary {
    let last = latest_run(dataset);
    DashboardSummary {
        employee_count: dataset.employees.len(),
        last_run_cost: last.map(|run| run.total_cost).unwrap_or(Decimal::ZERO),
        last_run_date: last.map(|run| run.date),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PayItem;
    use rust_decimal_macros::dec;

    fn employee(id: &str, salary: Decimal) -> Employee {
        Employee {
            id: EmployeeId::from(id),
            name: format!("Employee {id}"),
            role: "Clerk".to_string(),
            basic_salary: salary,
        }
    }

    fn period() -> PayPeriod {
        "2024-05".parse().unwrap()
    }

    #[test]
    fn reference_example() {
        let record = compute_record(&employee("emp_1", dec!(1000)), &Settings::default()).unwrap();
        assert_eq!(record.allowances, dec!(300));
        assert_eq!(record.gross_salary, dec!(1300));
        assert_eq!(record.tax, dec!(195));
        assert_eq!(record.pension, dec!(65));
        assert_eq!(record.other_deductions, dec!(20));
        assert_eq!(record.total_deductions, dec!(280));
        assert_eq!(record.net_salary, dec!(1020));
    }

    #[test]
    fn no_rounding_mid_calculation() {
        let settings = Settings {
            tax_rate: dec!(12.5),
            pension_rate: dec!(3.3),
            allowances: vec![],
            deductions: vec![],
            ..Settings::default()
        };
        let record = compute_record(&employee("emp_1", dec!(999.99)), &settings).unwrap();
        assert_eq!(record.tax, dec!(124.99875));
        assert_eq!(record.pension, dec!(32.99967));
        assert_eq!(record.net_salary, dec!(841.99158));
    }

    #[test]
    fn overflow_is_a_typed_error() {
        let err = compute_record(&employee("emp_1", Decimal::MAX), &Settings::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountOutOfRange("gross salary")));

        let settings = Settings {
            tax_rate: dec!(100000000000000000000000000),
            ..Settings::default()
        };
        let err = compute_record(&employee("emp_1", dec!(1000000)), &settings).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOutOfRange("tax")));
    }

    #[test]
    fn total_cost_overflow_is_a_typed_error() {
        let half = Decimal::MAX / dec!(2);
        let dataset = OrganizationDataset {
            employees: vec![employee("emp_1", half), employee("emp_2", half)],
            settings: Settings {
                tax_rate: Decimal::ZERO,
                pension_rate: Decimal::ZERO,
                allowances: vec![PayItem::new("Bonus", dec!(10))],
                deductions: vec![],
                ..Settings::default()
            },
            payroll_history: vec![],
        };
        let err = compute_run(&dataset, period(), PayrollRunId::from("pay_1")).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOutOfRange("total cost")));
    }

    #[test]
    fn empty_roster_is_rejected() {
        let dataset = OrganizationDataset::default();
        let err = compute_run(&dataset, period(), PayrollRunId::from("pay_1")).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyRoster));
    }

    #[test]
    fn run_is_stamped_with_first_of_month() {
        let dataset = OrganizationDataset {
            employees: vec![employee("emp_1", dec!(100))],
            ..OrganizationDataset::default()
        };
        let run = compute_run(&dataset, period(), PayrollRunId::from("pay_9")).unwrap();
        assert_eq!(run.id, PayrollRunId::from("pay_9"));
        assert_eq!(run.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn records_follow_roster_order() {
        let dataset = OrganizationDataset {
            employees: vec![
                employee("emp_3", dec!(300)),
                employee("emp_1", dec!(100)),
                employee("emp_2", dec!(200)),
            ],
            ..OrganizationDataset::default()
        };
        let run = compute_run(&dataset, period(), PayrollRunId::from("pay_1")).unwrap();
        let ids: Vec<&str> = run.records.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, ["emp_3", "emp_1", "emp_2"]);
        assert_eq!(run.total_cost, dec!(1500));
    }

    #[test]
    fn find_record_reports_missing_pieces() {
        let mut dataset = OrganizationDataset {
            employees: vec![employee("emp_1", dec!(100))],
            ..OrganizationDataset::default()
        };
        let run = compute_run(&dataset, period(), PayrollRunId::from("pay_1")).unwrap();
        dataset.payroll_history.push(run);

        let (run, record) =
            find_record(&dataset, &PayrollRunId::from("pay_1"), &EmployeeId::from("emp_1"))
                .unwrap();
        assert_eq!(run.id.as_str(), "pay_1");
        assert_eq!(record.basic_salary, dec!(100));

        assert!(matches!(
            find_record(&dataset, &PayrollRunId::from("pay_2"), &EmployeeId::from("emp_1")),
            Err(LedgerError::RunNotFound(_))
        ));
        assert!(matches!(
            find_record(&dataset, &PayrollRunId::from("pay_1"), &EmployeeId::from("emp_9")),
            Err(LedgerError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn dashboard_uses_latest_run() {
        let mut dataset = OrganizationDataset {
            employees: vec![employee("emp_1", dec!(1000))],
            ..OrganizationDataset::default()
        };
        assert_eq!(
            dashboard(&dataset),
            DashboardSummary {
                employee_count: 1,
                last_run_cost: Decimal::ZERO,
                last_run_date: None,
            }
        );

        let first = compute_run(&dataset, "2024-04".parse().unwrap(), "pay_1".into()).unwrap();
        dataset.payroll_history.push(first);
        dataset.settings.allowances.push(PayItem::new("Meal", dec!(50)));
        let second = compute_run(&dataset, period(), "pay_2".into()).unwrap();
        dataset.payroll_history.push(second);

        let summary = dashboard(&dataset);
        assert_eq!(summary.last_run_cost, dec!(1350));
        assert_eq!(summary.last_run_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(history_newest_first(&dataset)[0].id.as_str(), "pay_2");
    }
}
