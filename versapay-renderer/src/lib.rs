//! # versapay-renderer
//!
//! Tera-based rendering of printable payslips and payroll history reports
//! from VersaPay ledger data.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use versapay_renderer::{DocumentKind, Renderer};
//! use versapay_core::Session;
//!
//! fn print_latest_payslips(session: &Session) {
//!     let Ok(renderer) = Renderer::new() else { return };
//!     let Some(run) = session.dataset().payroll_history.last() else { return };
//!     for record in &run.records {
//!         if let Ok(text) = renderer.payslip(
//!             &session.organization().name,
//!             &session.settings().currency,
//!             run,
//!             record,
//!             DocumentKind::Payslip,
//!         ) {
//!             println!("{text}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{PayslipContext, ReportContext};
pub use engine::{DocumentKind, Renderer, TemplateEngine};
pub use error::RenderError;
