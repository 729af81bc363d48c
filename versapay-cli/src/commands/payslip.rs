//! `versapay payslip <run-id> <employee-id> [--html] [--output <path>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use versapay_core::payroll::find_record;
use versapay_core::store::templates_dir_at;
use versapay_core::{EmployeeId, LedgerError, PayrollRunId};
use versapay_renderer::{DocumentKind, Renderer};

use super::{home, open_ledger, require_session};

#[derive(Args, Debug)]
pub struct PayslipArgs {
    /// Payroll run id, e.g. pay_1714521600000.
    pub run_id: String,

    /// Employee id as recorded in that run.
    pub employee_id: String,

    /// Render printable HTML instead of plain text.
    #[arg(long)]
    pub html: bool,

    /// Write to this file instead of stdout. A directory gets a default file name.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl PayslipArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let mut ledger = open_ledger(&home)?;
        let session = require_session(&mut ledger)?;

        let run_id = PayrollRunId::from(self.run_id.trim());
        let employee_id = EmployeeId::from(self.employee_id.trim());
        let (run, record) = match find_record(session.dataset(), &run_id, &employee_id) {
            Ok(found) => found,
            Err(LedgerError::RunNotFound(id)) => {
                anyhow::bail!("no payroll run '{id}'. Run: versapay payroll history")
            }
            Err(err) => return Err(err.into()),
        };

        let kind = if self.html {
            DocumentKind::PayslipHtml
        } else {
            DocumentKind::Payslip
        };
        let renderer = Renderer::with_overrides(&templates_dir_at(&home))
            .context("failed to load templates")?;
        let content = renderer
            .payslip(
                &session.organization().name,
                &session.settings().currency,
                run,
                record,
                kind,
            )
            .context("failed to render payslip")?;

        match self.output {
            Some(path) => {
                let path = if path.is_dir() {
                    path.join(kind.payslip_file_name(run_id.as_str(), employee_id.as_str()))
                } else {
                    path
                };
                std::fs::write(&path, &content)
                    .with_context(|| format!("failed to write payslip to '{}'", path.display()))?;
                println!("{} Payslip written to {}", "✓".green(), path.display());
            }
            None => print!("{content}"),
        }
        Ok(())
    }
}
