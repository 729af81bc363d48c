//! Payroll engine properties over a spread of rosters and policies.
//!
//! Each `#[case]` is isolated; no shared state.

use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use versapay_core::{
    payroll::{compute_record, compute_run},
    roster::{MAX_RATE, MAX_SALARY},
    Employee, EmployeeId, LedgerError, OrganizationDataset, PayItem, PayPeriod, PayrollRunId,
    Settings,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn roster(salaries: &[Decimal]) -> Vec<Employee> {
    salaries
        .iter()
        .enumerate()
        .map(|(i, salary)| Employee {
            id: EmployeeId::from(format!("emp_{}", 1000 + i)),
            name: format!("Worker {i}"),
            role: "Operator".to_string(),
            basic_salary: *salary,
        })
        .collect()
}

fn policy(tax: Decimal, pension: Decimal, allowances: &[Decimal], deductions: &[Decimal]) -> Settings {
    Settings {
        currency: "USD".to_string(),
        tax_rate: tax,
        pension_rate: pension,
        allowances: allowances
            .iter()
            .enumerate()
            .map(|(i, a)| PayItem::new(format!("Allowance {i}"), *a))
            .collect(),
        deductions: deductions
            .iter()
            .enumerate()
            .map(|(i, d)| PayItem::new(format!("Deduction {i}"), *d))
            .collect(),
    }
}

fn may_2024() -> PayPeriod {
    "2024-05".parse().expect("period")
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[rstest]
#[case("defaults", roster(&[dec!(1000)]), Settings::default())]
#[case("several_employees", roster(&[dec!(1000), dec!(2500.50), dec!(0)]), Settings::default())]
#[case("no_allowances", roster(&[dec!(3000), dec!(4000)]), policy(dec!(10), dec!(2), &[], &[]))]
#[case("fractional_rates", roster(&[dec!(1234.56)]), policy(dec!(17.5), dec!(3.25), &[dec!(99.99)], &[dec!(12.34), dec!(0.01)]))]
#[case("deductions_exceed_gross", roster(&[dec!(10)]), policy(dec!(50), dec!(50), &[], &[dec!(500)]))]
#[case("many_significant_digits", roster(&[dec!(123456789.123456789012345678)]), policy(dec!(12.345), dec!(7.5), &[dec!(0.000000001)], &[]))]
#[case("salary_ceiling_full_rates", roster(&[MAX_SALARY, MAX_SALARY, MAX_SALARY]), policy(MAX_RATE, MAX_RATE, &[dec!(1)], &[dec!(1)]))]
fn run_invariants_hold(
    #[case] label: &str,
    #[case] employees: Vec<Employee>,
    #[case] settings: Settings,
) {
    let allowance_total = settings.allowance_total().expect("allowance total");
    let dataset = OrganizationDataset {
        employees,
        settings,
        payroll_history: vec![],
    };
    let run = compute_run(&dataset, may_2024(), PayrollRunId::from("pay_1"))
        .unwrap_or_else(|e| panic!("[{label}] run failed: {e}"));

    assert_eq!(run.records.len(), dataset.employees.len(), "[{label}] record count");
    for (employee, record) in dataset.employees.iter().zip(&run.records) {
        assert_eq!(record.employee_id, employee.id, "[{label}] roster order");
        assert_eq!(
            record.gross_salary,
            employee.basic_salary + allowance_total,
            "[{label}] gross"
        );
        assert_eq!(
            record.total_deductions,
            record.tax + record.pension + record.other_deductions,
            "[{label}] total deductions"
        );
        assert_eq!(
            record.net_salary,
            record.gross_salary - record.total_deductions,
            "[{label}] net"
        );
    }
    let gross_sum: Decimal = run.records.iter().map(|r| r.gross_salary).sum();
    assert_eq!(run.total_cost, gross_sum, "[{label}] total cost");
}

#[rstest]
#[case(dec!(1000), dec!(1300), dec!(195), dec!(65), dec!(280), dec!(1020))]
#[case(dec!(0), dec!(300), dec!(45), dec!(15), dec!(80), dec!(220))]
#[case(dec!(2000), dec!(2300), dec!(345), dec!(115), dec!(480), dec!(1820))]
fn default_policy_figures(
    #[case] basic: Decimal,
    #[case] gross: Decimal,
    #[case] tax: Decimal,
    #[case] pension: Decimal,
    #[case] total: Decimal,
    #[case] net: Decimal,
) {
    let employee = &roster(&[basic])[0];
    let record = compute_record(employee, &Settings::default()).expect("record");
    assert_eq!(record.gross_salary, gross);
    assert_eq!(record.tax, tax);
    assert_eq!(record.pension, pension);
    assert_eq!(record.total_deductions, total);
    assert_eq!(record.net_salary, net);
}

#[test]
fn allowances_are_flat_per_employee() {
    let dataset = OrganizationDataset {
        employees: roster(&[dec!(100), dec!(90000)]),
        ..OrganizationDataset::default()
    };
    let run = compute_run(&dataset, may_2024(), PayrollRunId::from("pay_1")).unwrap();
    assert!(run.records.iter().all(|r| r.allowances == dec!(300)));
    assert!(run.records.iter().all(|r| r.other_deductions == dec!(20)));
}

#[test]
fn empty_roster_fails() {
    let dataset = OrganizationDataset::default();
    let err = compute_run(&dataset, may_2024(), PayrollRunId::from("pay_1")).unwrap_err();
    assert!(matches!(err, LedgerError::EmptyRoster));
}

// ---------------------------------------------------------------------------
// Out-of-range arithmetic
// ---------------------------------------------------------------------------

#[rstest]
#[case::salary_at_decimal_max(roster(&[Decimal::MAX]), Settings::default(), "gross salary")]
#[case::huge_tax_rate(roster(&[dec!(1000000)]), policy(dec!(100000000000000000000000000), dec!(5), &[], &[]), "tax")]
#[case::huge_pension_rate(roster(&[dec!(1000000)]), policy(dec!(5), dec!(100000000000000000000000000), &[], &[]), "pension")]
#[case::allowances_overflow(roster(&[dec!(1)]), policy(dec!(0), dec!(0), &[Decimal::MAX, Decimal::MAX], &[]), "allowance total")]
#[case::deductions_overflow(roster(&[dec!(1)]), policy(dec!(0), dec!(0), &[], &[Decimal::MAX, dec!(1)]), "deduction total")]
#[case::net_underflow(roster(&[dec!(-1)]), policy(dec!(0), dec!(0), &[], &[Decimal::MAX]), "net salary")]
#[case::total_cost_overflow(roster(&[Decimal::MAX - dec!(10), dec!(20)]), policy(dec!(0), dec!(0), &[], &[]), "total cost")]
fn overflow_is_reported_not_panicked(
    #[case] employees: Vec<Employee>,
    #[case] settings: Settings,
    #[case] what: &str,
) {
    let dataset = OrganizationDataset {
        employees,
        settings,
        payroll_history: vec![],
    };
    match compute_run(&dataset, may_2024(), PayrollRunId::from("pay_1")) {
        Err(LedgerError::AmountOutOfRange(field)) => assert_eq!(field, what),
        other => panic!("expected AmountOutOfRange({what}), got {other:?}"),
    }
}
