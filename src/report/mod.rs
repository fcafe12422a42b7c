mod json;
mod sarif;
mod terminal;

pub use json::JsonReporter;
pub use sarif::SarifReporter;
pub use terminal::TerminalReporter;

use crate::analysis::Diagnostic;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Sarif,
}

impl ReportFormat {
    /// Format named in a config file; unknown names fall back to terminal
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => ReportFormat::Json,
            "sarif" => ReportFormat::Sarif,
            _ => ReportFormat::Terminal,
        }
    }
}

/// Reporter for outputting rule diagnostics
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    pub fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new().report(diagnostics),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(diagnostics),
            ReportFormat::Sarif => SarifReporter::new(self.output_path.clone()).report(diagnostics),
        }
    }
}
