//! Error types for versapay-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{EmployeeId, PayrollRunId};

/// Errors raised by the key-value store and its backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (write path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A key containing characters that cannot name a storage file.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// `dirs::home_dir()` returned `None`, so `~/.versapay/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Errors surfaced by ledger operations.
///
/// Every variant is recoverable: the failing operation leaves both the
/// caller's session and the stored data as they were.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("organization '{0}' already exists")]
    DuplicateOrganization(String),

    #[error("invalid organization or password")]
    InvalidCredentials,

    #[error("cannot run payroll: no employees found")]
    EmptyRoster,

    #[error("employee '{0}' not found")]
    EmployeeNotFound(EmployeeId),

    #[error("payroll run '{0}' not found")]
    RunNotFound(PayrollRunId),

    #[error("no payslip for employee '{employee}' in payroll run '{run}'")]
    RecordNotFound {
        run: PayrollRunId,
        employee: EmployeeId,
    },

    /// A pay period that is not a `YYYY-MM` month.
    #[error("invalid pay period '{0}'; expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("invalid input: {0}")]
    Validation(String),

    /// Payroll arithmetic left the representable decimal range.
    #[error("{0} is out of range; check salaries, allowances and rates")]
    AmountOutOfRange(&'static str),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
