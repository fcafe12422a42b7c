use crate::analysis::{Diagnostic, Issue, Severity, REQUIRES_ANDROID_ENTRY_POINT};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        let json = self.render(diagnostics)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> Result<String> {
        let report = JsonReport::from_diagnostics(diagnostics);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    total_issues: usize,
    rules: Vec<&'static Issue>,
    issues: Vec<JsonIssue>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonIssue {
    id: &'static str,
    severity: &'static str,
    message: String,
    file: String,
    line: usize,
    column: usize,
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
    infos: usize,
}

impl JsonReport {
    fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut summary = JsonSummary {
            errors: 0,
            warnings: 0,
            infos: 0,
        };

        let issues: Vec<JsonIssue> = diagnostics
            .iter()
            .map(|d| {
                match d.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.infos += 1,
                }

                JsonIssue {
                    id: d.issue,
                    severity: d.severity.as_str(),
                    message: d.message.clone(),
                    file: d.location.file.to_string_lossy().to_string(),
                    line: d.location.line,
                    column: d.location.column,
                }
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION"),
            total_issues: issues.len(),
            rules: vec![&REQUIRES_ANDROID_ENTRY_POINT],
            issues,
            summary,
        }
    }
}
