//! Tera rendering engine: [`DocumentKind`] and [`Renderer`].
//!
//! | Document     | Template               | Extension |
//! |--------------|------------------------|-----------|
//! | Payslip      | `payslip.txt.tera`     | `txt`     |
//! | PayslipHtml  | `payslip.html.tera`    | `html`    |
//! | Report       | `report.md.tera`       | `md`      |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use versapay_core::{PayrollRecord, PayrollRun};

use crate::context::{PayslipContext, ReportContext};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("shared/_header.tera", include_str!("templates/_partials/header.tera")),
    ("payslip.txt.tera", include_str!("templates/payslip.txt.tera")),
    ("payslip.html.tera", include_str!("templates/payslip.html.tera")),
    ("report.md.tera", include_str!("templates/report.md.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// Every document the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Payslip,
    PayslipHtml,
    Report,
}

impl DocumentKind {
    pub fn all() -> &'static [DocumentKind] {
        &[DocumentKind::Payslip, DocumentKind::PayslipHtml, DocumentKind::Report]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            DocumentKind::Payslip     => "payslip.txt.tera",
            DocumentKind::PayslipHtml => "payslip.html.tera",
            DocumentKind::Report      => "report.md.tera",
        }
    }

    pub fn is_payslip(&self) -> bool {
        matches!(self, DocumentKind::Payslip | DocumentKind::PayslipHtml)
    }

    /// File extension for a saved copy of the document.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Payslip     => "txt",
            DocumentKind::PayslipHtml => "html",
            DocumentKind::Report      => "md",
        }
    }

    /// Suggested file name for a payslip: `payslip_<run>_<employee>.<ext>`.
    pub fn payslip_file_name(&self, run_id: &str, employee_id: &str) -> String {
        format!("payslip_{run_id}_{employee_id}.{}", self.extension())
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera engine with embedded templates and optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that replace embedded
/// templates of the same (lowercased, relative) name.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    pub fn render_payslip(
        &self,
        ctx: &PayslipContext,
        kind: DocumentKind,
    ) -> Result<String, RenderError> {
        if !kind.is_payslip() {
            return Err(RenderError::NotAPayslip(kind));
        }
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(kind.template_name(), &tera_ctx)?)
    }

    pub fn render_report(&self, ctx: &ReportContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(DocumentKind::Report.template_name(), &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Builds contexts from ledger data and renders them.
///
/// Create once and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Embedded templates overridden by any found in `dir`.
    pub fn with_overrides(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(Some(dir))? })
    }

    /// Render one payslip. `kind` is [`DocumentKind::Payslip`] or
    /// [`DocumentKind::PayslipHtml`].
    pub fn payslip(
        &self,
        org_name: &str,
        currency: &str,
        run: &PayrollRun,
        record: &PayrollRecord,
        kind: DocumentKind,
    ) -> Result<String, RenderError> {
        let ctx = PayslipContext::new(org_name, currency, run, record);
        self.engine.render_payslip(&ctx, kind)
    }

    /// Render the payroll history report.
    pub fn report(
        &self,
        org_name: &str,
        currency: &str,
        history: &[PayrollRun],
    ) -> Result<String, RenderError> {
        let ctx = ReportContext::new(org_name, currency, history);
        self.engine.render_report(&ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use versapay_core::payroll::compute_run;
    use versapay_core::{Employee, EmployeeId, OrganizationDataset};

    fn sample_run() -> PayrollRun {
        let dataset = OrganizationDataset {
            employees: vec![Employee {
                id: EmployeeId::from("emp_1"),
                name: "Ada <Lovelace>".to_string(),
                role: "Engineer".to_string(),
                basic_salary: dec!(1000),
            }],
            ..OrganizationDataset::default()
        };
        compute_run(&dataset, "2024-05".parse().unwrap(), "pay_1".into()).unwrap()
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn text_payslip_contains_figures() {
        let renderer = Renderer::new().unwrap();
        let run = sample_run();
        let out = renderer
            .payslip("Acme", "USD", &run, &run.records[0], DocumentKind::Payslip)
            .unwrap();
        assert!(out.contains("Acme"));
        assert!(out.contains("May 2024"));
        assert!(out.contains("USD 1300.00"));
        assert!(out.contains("Tax (15%)"));
        assert!(out.contains("USD 1020.00"));
    }

    #[test]
    fn html_payslip_escapes_user_text() {
        let renderer = Renderer::new().unwrap();
        let run = sample_run();
        let out = renderer
            .payslip("Acme & Sons", "USD", &run, &run.records[0], DocumentKind::PayslipHtml)
            .unwrap();
        assert!(out.contains("Ada &lt;Lovelace&gt;"));
        assert!(out.contains("Acme &amp; Sons"));
        assert!(!out.contains("<Lovelace>"));
    }

    #[test]
    fn report_without_history_says_so() {
        let renderer = Renderer::new().unwrap();
        let out = renderer.report("Acme", "USD", &[]).unwrap();
        assert!(out.contains("No payroll history found."));
    }

    #[test]
    fn report_kind_is_refused_for_payslips() {
        let renderer = Renderer::new().unwrap();
        let run = sample_run();
        let err = renderer
            .payslip("Acme", "USD", &run, &run.records[0], DocumentKind::Report)
            .unwrap_err();
        assert!(matches!(err, RenderError::NotAPayslip(DocumentKind::Report)));
    }

    #[test]
    fn payslip_file_names() {
        assert_eq!(
            DocumentKind::PayslipHtml.payslip_file_name("pay_1", "emp_2"),
            "payslip_pay_1_emp_2.html"
        );
    }

    #[test]
    fn no_crlf_in_any_rendered_output() {
        let renderer = Renderer::new().unwrap();
        let run = sample_run();
        let history = vec![run.clone()];
        for kind in DocumentKind::all() {
            let content = match kind {
                DocumentKind::Report => renderer.report("Acme", "USD", &history).unwrap(),
                _ => renderer.payslip("Acme", "USD", &run, &run.records[0], *kind).unwrap(),
            };
            assert!(
                !content.contains('\r'),
                "Rendered output for {:?} contains CR char; line endings not normalised",
                kind
            );
        }
    }
}
