//! The `RequiresAndroidEntryPoint` rule.
//!
//! Collectors record facts while the project is traversed, then the
//! evaluator checks them once traversal is over. All state of a run lives in
//! an [`AnalysisContext`] owned by the [`RequiresEntryPointDetector`].

pub mod collectors;
mod context;
mod detector;
mod evaluator;
pub mod facts;
mod issue;
mod naming;
mod query;
mod runner;

pub use context::{AnalysisContext, CollectedFacts};
pub use detector::RequiresEntryPointDetector;
pub use evaluator::ConsistencyEvaluator;
pub use issue::{
    Category, Diagnostic, DiagnosticSink, Issue, IssueScope, Severity, REQUIRES_ANDROID_ENTRY_POINT,
};
pub use naming::binding_layout_name;
pub use query::SourceQuery;
pub use runner::ProjectRunner;

use miette::Diagnostic as MietteDiagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run of the rule
#[derive(Error, Debug, MietteDiagnostic)]
pub enum AnalysisError {
    #[error("Resource folder `{folder}` is not supported by the resource tree collector ({})", file.display())]
    #[diagnostic(
        code(hiltlint::unsupported_resource_folder),
        help("the resource tree collector is only registered for layout and navigation folders")
    )]
    UnsupportedResourceFolder { folder: String, file: PathBuf },
}
