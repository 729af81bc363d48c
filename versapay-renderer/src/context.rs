//! Template contexts: serializable rendering payloads built from ledger data.
//!
//! Every amount is pre-formatted to two decimals here, so templates never do
//! arithmetic and stored values are never rounded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use versapay_core::money::{format_amount, format_percent, rate_of};
use versapay_core::{PayrollRecord, PayrollRun};

use crate::error::RenderError;

/// `"May 2024"`
pub fn period_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// `"05/01/2024"`
pub fn payment_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// One employee's payslip for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipContext {
    pub org_name: String,
    pub currency: String,
    pub run_id: String,
    pub period_label: String,
    pub payment_date: String,

    pub employee_id: String,
    pub employee_name: String,
    pub employee_role: String,

    pub basic_salary: String,
    pub allowances: String,
    pub gross_salary: String,

    /// Percentages are recovered from the frozen record, not from current
    /// settings, so a reprint always matches the original run.
    pub tax_rate: String,
    pub tax: String,
    pub pension_rate: String,
    pub pension: String,
    pub other_deductions: String,
    pub total_deductions: String,

    pub net_salary: String,
}

impl PayslipContext {
    pub fn new(org_name: &str, currency: &str, run: &PayrollRun, record: &PayrollRecord) -> Self {
        Self {
            org_name: org_name.to_string(),
            currency: currency.to_string(),
            run_id: run.id.to_string(),
            period_label: period_label(run.date),
            payment_date: payment_date(run.date),
            employee_id: record.employee_id.to_string(),
            employee_name: record.employee_name.clone(),
            employee_role: record.employee_role.clone(),
            basic_salary: format_amount(record.basic_salary),
            allowances: format_amount(record.allowances),
            gross_salary: format_amount(record.gross_salary),
            tax_rate: format_percent(rate_of(record.tax, record.gross_salary)),
            tax: format_amount(record.tax),
            pension_rate: format_percent(rate_of(record.pension, record.gross_salary)),
            pension: format_amount(record.pension),
            other_deductions: format_amount(record.other_deductions),
            total_deductions: format_amount(record.total_deductions),
            net_salary: format_amount(record.net_salary),
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

/// One row of a run table in the history report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRowCtx {
    pub employee_id: String,
    pub employee_name: String,
    pub gross_salary: String,
    pub total_deductions: String,
    pub net_salary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunCtx {
    pub id: String,
    pub period_label: String,
    pub total_cost: String,
    pub employee_count: usize,
    pub rows: Vec<ReportRowCtx>,
}

/// Payroll history report, newest run first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContext {
    pub org_name: String,
    pub currency: String,
    pub runs: Vec<ReportRunCtx>,
}

impl ReportContext {
    /// `history` is in stored (oldest-first) order; the report reverses it.
    pub fn new(org_name: &str, currency: &str, history: &[PayrollRun]) -> Self {
        let runs = history
            .iter()
            .rev()
            .map(|run| ReportRunCtx {
                id: run.id.to_string(),
                period_label: period_label(run.date),
                total_cost: format_amount(run.total_cost),
                employee_count: run.records.len(),
                rows: run
                    .records
                    .iter()
                    .map(|r| ReportRowCtx {
                        employee_id: r.employee_id.to_string(),
                        employee_name: r.employee_name.clone(),
                        gross_salary: format_amount(r.gross_salary),
                        total_deductions: format_amount(r.total_deductions),
                        net_salary: format_amount(r.net_salary),
                    })
                    .collect(),
            })
            .collect();
        Self {
            org_name: org_name.to_string(),
            currency: currency.to_string(),
            runs,
        }
    }

    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use versapay_core::{Employee, EmployeeId, OrganizationDataset, PayPeriod, Settings};
    use versapay_core::payroll::compute_run;

    fn sample_run(id: &str, period: &str) -> PayrollRun {
        let dataset = OrganizationDataset {
            employees: vec![Employee {
                id: EmployeeId::from("emp_1"),
                name: "Ada".to_string(),
                role: "Engineer".to_string(),
                basic_salary: dec!(1000),
            }],
            settings: Settings::default(),
            payroll_history: vec![],
        };
        let period: PayPeriod = period.parse().unwrap();
        compute_run(&dataset, period, id.into()).unwrap()
    }

    #[test]
    fn labels_follow_run_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(period_label(date), "May 2024");
        assert_eq!(payment_date(date), "05/01/2024");
    }

    #[test]
    fn payslip_amounts_are_two_decimal_strings() {
        let run = sample_run("pay_1", "2024-05");
        let ctx = PayslipContext::new("Acme", "USD", &run, &run.records[0]);
        assert_eq!(ctx.gross_salary, "1300.00");
        assert_eq!(ctx.tax, "195.00");
        assert_eq!(ctx.net_salary, "1020.00");
        assert_eq!(ctx.tax_rate, "15");
        assert_eq!(ctx.pension_rate, "5");
    }

    #[test]
    fn report_lists_newest_first() {
        let history = vec![sample_run("pay_1", "2024-04"), sample_run("pay_2", "2024-05")];
        let ctx = ReportContext::new("Acme", "USD", &history);
        assert_eq!(ctx.runs[0].id, "pay_2");
        assert_eq!(ctx.runs[0].period_label, "May 2024");
        assert_eq!(ctx.runs[1].total_cost, "1300.00");
    }

    #[test]
    fn to_tera_context_succeeds() {
        let run = sample_run("pay_1", "2024-05");
        let ctx = PayslipContext::new("Acme", "USD", &run, &run.records[0]);
        ctx.to_tera_context().expect("context conversion");
    }
}
