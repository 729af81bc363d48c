//! `versapay settings show|set`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{settings::Style, Table, Tabled};

use versapay_core::money::{format_money, format_percent};
use versapay_core::{PayItem, Settings, SettingsUpdate};

use super::{home, open_ledger, parse_decimal, require_session};

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current pay policy.
    Show(ShowArgs),

    /// Change currency or statutory rates. Only the given fields change.
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Currency label printed before amounts, e.g. USD or NGN.
    #[arg(long)]
    pub currency: Option<String>,

    /// Income tax percentage of gross salary.
    #[arg(long, value_parser = parse_decimal)]
    pub tax_rate: Option<Decimal>,

    /// Pension percentage of gross salary.
    #[arg(long, value_parser = parse_decimal)]
    pub pension_rate: Option<Decimal>,
}

#[derive(Tabled)]
struct PayItemRow {
    #[tabled(rename = "kind")]
    kind: &'static str,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "amount")]
    amount: String,
}

pub fn run(cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show(args) => show(args),
        SettingsCommand::Set(args) => set(args),
    }
}

fn show(args: ShowArgs) -> Result<()> {
    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let session = require_session(&mut ledger)?;
    let settings = session.settings();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(settings).context("failed to serialize settings JSON")?
        );
        return Ok(());
    }

    print_settings(settings);
    Ok(())
}

fn set(args: SetArgs) -> Result<()> {
    if args.currency.is_none() && args.tax_rate.is_none() && args.pension_rate.is_none() {
        anyhow::bail!("nothing to change; pass --currency, --tax-rate or --pension-rate");
    }

    let home = home()?;
    let mut ledger = open_ledger(&home)?;
    let mut session = require_session(&mut ledger)?;
    let update = SettingsUpdate {
        currency: args.currency,
        tax_rate: args.tax_rate,
        pension_rate: args.pension_rate,
    };
    let settings = ledger
        .save_settings(&mut session, &update)
        .context("failed to save settings")?;

    println!("{} Settings saved", "✓".green());
    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("  Currency:      {}", settings.currency);
    println!("  Tax rate:      {}%", format_percent(settings.tax_rate));
    println!("  Pension rate:  {}%", format_percent(settings.pension_rate));

    let rows: Vec<PayItemRow> = item_rows("allowance", &settings.allowances, &settings.currency)
        .chain(item_rows("deduction", &settings.deductions, &settings.currency))
        .collect();
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn item_rows<'a>(
    kind: &'static str,
    items: &'a [PayItem],
    currency: &'a str,
) -> impl Iterator<Item = PayItemRow> + 'a {
    items.iter().map(move |item| PayItemRow {
        kind,
        name: item.name.clone(),
        amount: format_money(currency, item.amount),
    })
}
