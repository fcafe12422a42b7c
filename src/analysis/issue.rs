use crate::graph::Location;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Correctness,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Correctness => "Correctness",
        }
    }
}

/// Parts of a project an issue needs to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueScope {
    JavaFile,
    ResourceFile,
}

/// A rule as presented to users and report consumers
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub id: &'static str,
    pub brief: &'static str,
    pub explanation: &'static str,
    pub category: Category,
    /// 1 to 10, 10 being most important
    pub priority: u8,
    pub severity: Severity,
    pub scopes: &'static [IssueScope],
}

pub static REQUIRES_ANDROID_ENTRY_POINT: Issue = Issue {
    id: "RequiresAndroidEntryPoint",
    brief: "Hilt type must be attached to a hilt type with @AndroidEntryPoint annotation",
    explanation: "Hilt type must be attached to a hilt type with @AndroidEntryPoint annotation",
    category: Category::Correctness,
    priority: 10,
    severity: Severity::Error,
    scopes: &[IssueScope::JavaFile, IssueScope::ResourceFile],
};

/// A reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub issue: &'static str,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

/// Receives diagnostics as the rule reports them
pub trait DiagnosticSink {
    fn report(&mut self, issue: &'static Issue, location: Location, message: String);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, issue: &'static Issue, location: Location, message: String) {
        self.push(Diagnostic {
            issue: issue.id,
            severity: issue.severity,
            location,
            message,
        });
    }
}
