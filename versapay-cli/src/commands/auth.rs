//! `versapay register`, `login`, `logout`, `whoami`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use versapay_core::{LedgerError, LoginRequest, RegisterRequest};

use super::{home, open_ledger, require_session};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Organization name. Unique regardless of letter case.
    pub name: String,

    #[arg(long, short = 'p')]
    pub password: String,
}

impl RegisterArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let mut ledger = open_ledger(&home)?;
        let req = RegisterRequest {
            name: self.name,
            password: self.password,
        };
        let org = match ledger.register(&req) {
            Ok(org) => org,
            Err(LedgerError::DuplicateOrganization(name)) => {
                anyhow::bail!("organization name '{name}' already exists")
            }
            Err(err) => return Err(err).context("registration failed"),
        };

        println!("{} Registered '{}' ({})", "✓".green(), org.name, org.id);
        println!("Run: versapay login \"{}\" --password <pw>", org.name);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Organization name, any letter case.
    pub name: String,

    #[arg(long, short = 'p')]
    pub password: String,
}

impl LoginArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let mut ledger = open_ledger(&home)?;
        let req = LoginRequest {
            name: self.name,
            password: self.password,
        };
        let session = match ledger.login(&req) {
            Ok(session) => session,
            Err(LedgerError::InvalidCredentials) => {
                anyhow::bail!("invalid organization name or password")
            }
            Err(err) => return Err(err).context("login failed"),
        };

        println!(
            "{} Logged in to '{}'",
            "✓".green(),
            session.organization().name
        );
        Ok(())
    }
}

pub fn logout() -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    match ledger.resume_session().context("failed to restore session")? {
        Some(session) => {
            let name = session.organization().name.clone();
            ledger.logout(session).context("logout failed")?;
            println!("Logged out of '{name}'");
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let session = require_session(&mut ledger)?;
    println!("{} ({})", session.organization().name.bold(), session.org_id());
    Ok(())
}
