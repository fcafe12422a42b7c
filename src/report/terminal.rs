use crate::analysis::{Diagnostic, Severity, REQUIRES_ANDROID_ENTRY_POINT};
use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::Path;

/// Terminal reporter with colored output, grouped by file
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, diagnostics: &[Diagnostic]) -> Result<()> {
        if diagnostics.is_empty() {
            println!("{}", "No missing entry points found!".green().bold());
            return Ok(());
        }

        let mut by_file: BTreeMap<&Path, Vec<&Diagnostic>> = BTreeMap::new();
        for diagnostic in diagnostics {
            by_file
                .entry(diagnostic.location.file.as_path())
                .or_default()
                .push(diagnostic);
        }

        println!();
        println!(
            "{}",
            format!("Found {} entry point issues:", diagnostics.len())
                .yellow()
                .bold()
        );
        println!();

        for (file, items) in &mut by_file {
            items.sort_by_key(|d| (d.location.line, d.location.column));

            println!("{}", file.display().to_string().cyan().bold());
            for item in items.iter() {
                self.print_item(item);
            }
            println!();
        }

        self.print_summary(diagnostics);

        Ok(())
    }

    fn print_item(&self, item: &Diagnostic) {
        let severity_str = match item.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };

        let location = format!("{}:{}", item.location.line, item.location.column);

        println!(
            "  {} {} [{}] {}",
            location.dimmed(),
            severity_str,
            item.issue.dimmed(),
            item.message
        );
    }

    fn print_summary(&self, diagnostics: &[Diagnostic]) {
        let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        let warnings = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

        println!("{}", "─".repeat(60).dimmed());

        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{} errors", errors).red().to_string());
        }
        if warnings > 0 {
            parts.push(format!("{} warnings", warnings).yellow().to_string());
        }
        println!("Summary: {}", parts.join(", "));
        println!();
        println!("{}", REQUIRES_ANDROID_ENTRY_POINT.brief.dimmed());
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
