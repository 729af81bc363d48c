//! `versapay dashboard`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use versapay_core::money::{format_amount, format_money};
use versapay_core::payroll::dashboard;

use super::{home, open_ledger, require_session};

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DashboardJson {
    organization: String,
    currency: String,
    employees: usize,
    last_run_cost: String,
    last_run_date: Option<String>,
}

impl DashboardArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let mut ledger = open_ledger(&home)?;
        let session = require_session(&mut ledger)?;
        let summary = dashboard(session.dataset());
        let currency = &session.settings().currency;

        if self.json {
            let payload = DashboardJson {
                organization: session.organization().name.clone(),
                currency: currency.clone(),
                employees: summary.employee_count,
                last_run_cost: format_amount(summary.last_run_cost),
                last_run_date: summary.last_run_date.map(|d| d.to_string()),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload)
                    .context("failed to serialize dashboard JSON")?
            );
            return Ok(());
        }

        println!("{}", session.organization().name.to_uppercase().bold());
        println!("  Total employees:  {}", summary.employee_count);
        println!(
            "  Last run cost:    {}",
            format_money(currency, summary.last_run_cost)
        );
        match summary.last_run_date {
            Some(date) => println!("  Last run:         {}", date.format("%B %Y")),
            None => println!("  Last run:         {}", "never".bright_black()),
        }
        Ok(())
    }
}
