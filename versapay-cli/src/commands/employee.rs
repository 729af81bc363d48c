//! `versapay employee list|add|edit|remove`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use versapay_core::money::{format_amount, format_money};
use versapay_core::{Employee, EmployeeDraft, EmployeeId, EmployeeUpdate, LedgerError};

use super::{confirm, home, open_ledger, parse_decimal, require_session};

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    /// List the roster.
    List(ListArgs),

    /// Add an employee.
    Add(AddArgs),

    /// Change an employee's name, role or salary.
    Edit(EditArgs),

    /// Remove an employee. Past payslips are kept.
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub role: String,

    /// Monthly basic salary.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Decimal,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Employee id, e.g. emp_1714521600000.
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long, value_parser = parse_decimal)]
    pub salary: Option<Decimal>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Tabled)]
struct EmployeeRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "role")]
    role: String,
    #[tabled(rename = "basic salary")]
    salary: String,
}

#[derive(Serialize)]
struct EmployeeJson<'a> {
    id: &'a str,
    name: &'a str,
    role: &'a str,
    basic_salary: String,
}

pub fn run(cmd: EmployeeCommand) -> Result<()> {
    match cmd {
        EmployeeCommand::List(args) => list(args),
        EmployeeCommand::Add(args) => add(args),
        EmployeeCommand::Edit(args) => edit(args),
        EmployeeCommand::Remove(args) => remove(args),
    }
}

fn list(args: ListArgs) -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let session = require_session(&mut ledger)?;
    let employees = &session.dataset().employees;

    if args.json {
        let payload: Vec<EmployeeJson<'_>> = employees
            .iter()
            .map(|e| EmployeeJson {
                id: e.id.as_str(),
                name: &e.name,
                role: &e.role,
                basic_salary: format_amount(e.basic_salary),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize roster JSON")?
        );
        return Ok(());
    }

    if employees.is_empty() {
        println!("No employees added yet.");
        println!("Run: versapay employee add --name <n> --role <r> --salary <amount>");
        return Ok(());
    }

    let currency = &session.settings().currency;
    let rows: Vec<EmployeeRow> = employees
        .iter()
        .map(|e| EmployeeRow {
            id: e.id.to_string(),
            name: e.name.clone(),
            role: e.role.clone(),
            salary: format_money(currency, e.basic_salary),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn add(args: AddArgs) -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let mut session = require_session(&mut ledger)?;
    let draft = EmployeeDraft {
        name: args.name,
        role: args.role,
        basic_salary: args.salary,
    };
    let employee = ledger
        .add_employee(&mut session, &draft)
        .context("failed to add employee")?;

    println!("{} Added {}", "✓".green(), describe(&employee, &session.settings().currency));
    Ok(())
}

fn edit(args: EditArgs) -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let mut session = require_session(&mut ledger)?;
    let update = EmployeeUpdate {
        name: args.name,
        role: args.role,
        basic_salary: args.salary,
    };
    let id = EmployeeId::from(args.id.trim());
    let employee = ledger
        .update_employee(&mut session, &id, &update)
        .map_err(not_found_hint)
        .with_context(|| format!("failed to update employee '{id}'"))?;

    println!("{} Updated {}", "✓".green(), describe(&employee, &session.settings().currency));
    Ok(())
}

fn remove(args: RemoveArgs) -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let mut session = require_session(&mut ledger)?;
    let id = EmployeeId::from(args.id.trim());

    let Some(employee) = session.dataset().employee(&id) else {
        return Err(not_found_hint(LedgerError::EmployeeNotFound(id)));
    };
    let prompt = format!("Remove {} ({})?", employee.name, employee.id);
    if !confirm(&prompt, args.yes)? {
        println!("Aborted; roster unchanged.");
        return Ok(());
    }

    let removed = ledger
        .delete_employee(&mut session, &id)
        .with_context(|| format!("failed to remove employee '{id}'"))?;
    println!("{} Removed {} ({})", "✓".green(), removed.name, removed.id);
    Ok(())
}

fn describe(employee: &Employee, currency: &str) -> String {
    format!(
        "{} ({}), {}, {}",
        employee.name,
        employee.id,
        employee.role,
        format_money(currency, employee.basic_salary)
    )
}

fn not_found_hint(err: LedgerError) -> anyhow::Error {
    match err {
        LedgerError::EmployeeNotFound(id) => {
            anyhow::anyhow!("no employee with id '{id}'. Run: versapay employee list")
        }
        other => other.into(),
    }
}
