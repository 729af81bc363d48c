//! `versapay payroll run|history`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use versapay_core::money::{format_amount, format_money};
use versapay_core::payroll::history_newest_first;
use versapay_core::store::templates_dir_at;
use versapay_core::{LedgerError, PayPeriod, PayrollRun, RunPayrollRequest};
use versapay_renderer::Renderer;

use super::{confirm, home, open_ledger, require_session};

#[derive(Subcommand, Debug)]
pub enum PayrollCommand {
    /// Compute pay for every employee and record the run.
    Run(RunArgs),

    /// List past payroll runs, newest first.
    History(HistoryArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pay period as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    pub period: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the full markdown report with per-employee rows.
    #[arg(long, conflicts_with = "json")]
    pub report: bool,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "employee")]
    employee: String,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "gross")]
    gross: String,
    #[tabled(rename = "deductions")]
    deductions: String,
    #[tabled(rename = "net pay")]
    net: String,
}

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "run")]
    id: String,
    #[tabled(rename = "period")]
    period: String,
    #[tabled(rename = "employees")]
    employees: usize,
    #[tabled(rename = "total cost")]
    total_cost: String,
}

#[derive(Serialize)]
struct RunJson<'a> {
    id: &'a str,
    date: String,
    employees: usize,
    total_cost: String,
}

pub fn run(cmd: PayrollCommand) -> Result<()> {
    match cmd {
        PayrollCommand::Run(args) => run_payroll(args),
        PayrollCommand::History(args) => history(args),
    }
}

fn run_payroll(args: RunArgs) -> Result<()> {
    let period = match args.period.as_deref() {
        Some(raw) => raw
            .parse::<PayPeriod>()
            .with_context(|| format!("invalid --period '{raw}', expected YYYY-MM"))?,
        None => PayPeriod::current(),
    };

    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let mut session = require_session(&mut ledger)?;
    if session.dataset().employees.is_empty() {
        anyhow::bail!("no employees to run payroll for. Run: versapay employee add ...");
    }

    let prompt = format!(
        "Run payroll for {} employee(s) for {}?",
        session.dataset().employees.len(),
        period.first_day().format("%B %Y")
    );
    if !confirm(&prompt, args.yes)? {
        println!("Aborted; no payroll run recorded.");
        return Ok(());
    }

    let run = match ledger.run_payroll(&mut session, &RunPayrollRequest { period }) {
        Ok(run) => run,
        Err(LedgerError::EmptyRoster) => anyhow::bail!("no employees to run payroll for"),
        Err(err) => return Err(err).context("payroll run failed"),
    };

    let currency = session.settings().currency.clone();
    println!(
        "{} Payroll for {} recorded as {}",
        "✓".green(),
        run.date.format("%B %Y"),
        run.id
    );
    print_run(&run, &currency);
    println!("Total cost: {}", format_money(&currency, run.total_cost).bold());
    Ok(())
}

fn print_run(run: &PayrollRun, currency: &str) {
    let rows: Vec<RecordRow> = run
        .records
        .iter()
        .map(|r| RecordRow {
            employee: r.employee_name.clone(),
            id: r.employee_id.to_string(),
            gross: format_money(currency, r.gross_salary),
            deductions: format_money(currency, r.total_deductions),
            net: format_money(currency, r.net_salary),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn history(args: HistoryArgs) -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let session = require_session(&mut ledger)?;
    let dataset = session.dataset();
    let currency = &session.settings().currency;

    if args.json {
        let payload: Vec<RunJson<'_>> = history_newest_first(dataset)
            .into_iter()
            .map(|run| RunJson {
                id: run.id.as_str(),
                date: run.date.to_string(),
                employees: run.records.len(),
                total_cost: format_amount(run.total_cost),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize history JSON")?
        );
        return Ok(());
    }

    if args.report {
        let renderer = Renderer::with_overrides(&templates_dir_at(&home))
            .context("failed to load templates")?;
        let report = renderer
            .report(&session.organization().name, currency, &dataset.payroll_history)
            .context("failed to render payroll report")?;
        print!("{report}");
        return Ok(());
    }

    if dataset.payroll_history.is_empty() {
        println!("No payroll history found.");
        return Ok(());
    }

    let rows: Vec<RunRow> = history_newest_first(dataset)
        .into_iter()
        .map(|run| RunRow {
            id: run.id.to_string(),
            period: run.date.format("%B %Y").to_string(),
            employees: run.records.len(),
            total_cost: format_money(currency, run.total_cost),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("Run: versapay payslip <run-id> <employee-id>");
    Ok(())
}
