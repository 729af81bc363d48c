//! Subcommand implementations and the helpers they share.

pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod payroll;
pub mod payslip;
pub mod settings;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;

use versapay_core::{FileStorage, Ledger, Session};

pub fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

pub fn open_ledger(home: &Path) -> Result<Ledger<FileStorage>> {
    tracing::debug!(home = %home.display(), "opening ledger");
    Ledger::open_at(home).context("failed to open the VersaPay data store")
}

/// Resume the stored session or fail with a login hint.
pub fn require_session(ledger: &mut Ledger<FileStorage>) -> Result<Session> {
    ledger
        .resume_session()
        .context("failed to restore session")?
        .ok_or_else(|| anyhow!("not logged in. Run: versapay login <name> --password <pw>"))
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// clap value parser for amounts and percentages.
pub fn parse_decimal(raw: &str) -> std::result::Result<Decimal, String> {
    let trimmed = raw.trim();
    trimmed
        .parse::<Decimal>()
        .map_err(|_| format!("'{trimmed}' is not a valid number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_trims_and_rejects_text() {
        assert_eq!(parse_decimal(" 1000.50 ").unwrap(), Decimal::new(100050, 2));
        assert!(parse_decimal("abc").unwrap_err().contains("'abc'"));
    }

    #[test]
    fn confirm_short_circuits_on_yes_flag() {
        assert!(confirm("Proceed?", true).unwrap());
    }
}
