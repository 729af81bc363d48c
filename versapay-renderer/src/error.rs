//! Error types for versapay-renderer.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::DocumentKind;

/// All errors that can arise from document rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (parse, render, or context conversion).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// A payslip was requested with a kind that is not a payslip template.
    #[error("{0:?} is not a payslip document")]
    NotAPayslip(DocumentKind),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
