//! VersaPay: local multi-tenant payroll ledger CLI.
//!
//! # Usage
//!
//! ```text
//! versapay register <name> --password <pw>
//! versapay login <name> --password <pw>
//! versapay logout
//! versapay whoami
//! versapay dashboard [--json]
//! versapay employee list|add|edit|remove
//! versapay settings show|set
//! versapay payroll run [--period YYYY-MM] [--yes]
//! versapay payroll history [--json] [--report]
//! versapay payslip <run-id> <employee-id> [--html] [--output <path>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    auth::{LoginArgs, RegisterArgs},
    dashboard::DashboardArgs,
    employee::EmployeeCommand,
    payroll::PayrollCommand,
    payslip::PayslipArgs,
    settings::SettingsCommand,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "versapay",
    version,
    about = "Run payroll for your organization from the terminal",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new organization account.
    Register(RegisterArgs),

    /// Sign in to an organization; later commands act on it.
    Login(LoginArgs),

    /// End the current session.
    Logout,

    /// Show which organization is signed in.
    Whoami,

    /// Headcount and the cost of the latest payroll run.
    Dashboard(DashboardArgs),

    /// Manage the employee roster.
    Employee {
        #[command(subcommand)]
        command: EmployeeCommand,
    },

    /// Show or change currency and statutory rates.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Run payroll and browse past runs.
    Payroll {
        #[command(subcommand)]
        command: PayrollCommand,
    },

    /// Print one employee's payslip from a past run.
    Payslip(PayslipArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Register(args) => args.run(),
        Commands::Login(args) => args.run(),
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(),
        Commands::Dashboard(args) => args.run(),
        Commands::Employee { command } => commands::employee::run(command),
        Commands::Settings { command } => commands::settings::run(command),
        Commands::Payroll { command } => commands::payroll::run(command),
        Commands::Payslip(args) => args.run(),
    }
}

/// Diagnostics go to stderr so table and JSON output on stdout stays clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
