//! hiltlint - Hilt entry point consistency checks for Android (Kotlin/Java)
//!
//! Reports Android components that use Hilt-injected types without being
//! annotated with `@AndroidEntryPoint` themselves.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **File Discovery** - Find all .kt, .java and resource .xml files
//! 2. **Parsing** - Parse source files using tree-sitter, resources using quick-xml
//! 3. **Graph Building** - Build a reference graph of declarations
//! 4. **Collection** - Record marker usages, view model factory calls,
//!    resource trees and resource references
//! 5. **Evaluation** - Check the collected facts for missing entry points
//! 6. **Reporting** - Output results in various formats

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use analysis::{
    AnalysisError, Diagnostic, DiagnosticSink, Issue, RequiresEntryPointDetector, Severity, SourceQuery,
    REQUIRES_ANDROID_ENTRY_POINT,
};
pub use config::Config;
pub use discovery::FileFinder;
pub use graph::{Declaration, DeclarationKind, Graph, Reference};
pub use pipeline::{AnalysisOutcome, Pipeline};
pub use report::{ReportFormat, Reporter};
