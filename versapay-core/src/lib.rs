//! VersaPay core library: payroll ledger domain, persistence and engine.
//!
//! Public API surface:
//! - [`types`]: data model, ids, pay periods, request objects
//! - [`error`]: [`StoreError`], [`LedgerError`]
//! - [`store`]: [`Storage`] backends and the typed [`Store`]
//! - [`session`]: [`Ledger`] (auth, roster, settings, payroll) and [`Session`]
//! - [`payroll`]: pure run computation and history queries
//! - [`roster`]: employee and settings edits
//! - [`money`]: display formatting
//! - [`ids`]: timestamp identifier generation

pub mod error;
pub mod ids;
pub mod money;
pub mod payroll;
pub mod roster;
pub mod session;
pub mod store;
pub mod types;

pub use error::{LedgerError, StoreError};
pub use payroll::DashboardSummary;
pub use session::{Ledger, Session};
pub use store::{FileStorage, MemoryStorage, Storage, Store};
pub use types::{
    Directory, Employee, EmployeeDraft, EmployeeId, EmployeeUpdate, LoginRequest, Organization,
    OrganizationDataset, OrganizationId, PayItem, PayPeriod, PayrollRecord, PayrollRun,
    PayrollRunId, RegisterRequest, RunPayrollRequest, Settings, SettingsUpdate,
};
