use crate::analysis::{Diagnostic, ProjectRunner, RequiresEntryPointDetector};
use crate::config::Config;
use crate::discovery::{FileFinder, FileStats, SourceFile};
use crate::graph::{Graph, GraphBuilder, ParallelGraphBuilder};
use crate::parser::xml::{ResourceDocument, ResourceParser};
use indicatif::{ProgressBar, ProgressStyle};
use miette::Result;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Result of checking one project
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub diagnostics: Vec<Diagnostic>,
    pub stats: FileStats,
}

/// Runs the rule over a project directory: discovery, parsing, graph
/// building, collection and evaluation
pub struct Pipeline<'a> {
    config: &'a Config,
    parallel: bool,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            parallel: false,
            show_progress: false,
        }
    }

    /// Parse sources with rayon instead of one by one
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Show a progress bar while parsing sequentially
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn run(&self, root: &Path) -> Result<AnalysisOutcome> {
        info!("Discovering files...");
        let files = FileFinder::new(self.config).find_files(root)?;
        let stats = FileStats::from_files(&files);
        info!(
            "Found {} source files and {} layout/navigation files",
            stats.source_files(),
            stats.resource_trees()
        );

        let graph = self.build_graph(&files)?;
        info!(
            "Graph: {} declarations, {} references",
            graph.declaration_count(),
            graph.reference_count()
        );

        let mut detector = RequiresEntryPointDetector::new(self.config.hilt.clone());
        let documents = parse_resources(&files, &detector);

        detector.before_check_root_project(self.config.uses_view_binding(root)?);
        ProjectRunner::new(&graph, &documents).run(&detector)?;

        let mut diagnostics = Vec::new();
        detector.after_check_root_project(&graph, &mut diagnostics);
        info!("Found {} issues", diagnostics.len());

        Ok(AnalysisOutcome { diagnostics, stats })
    }

    fn build_graph(&self, files: &[SourceFile]) -> Result<Graph> {
        if self.parallel {
            return ParallelGraphBuilder::new().build_from_files(files);
        }

        let sources: Vec<&SourceFile> = files.iter().filter(|f| f.file_type.is_source()).collect();
        let pb = if self.show_progress {
            let pb = ProgressBar::new(sources.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        info!("Parsing files...");
        let mut builder = GraphBuilder::new();
        for file in sources {
            // A file tree-sitter cannot read is skipped, not fatal
            if let Err(e) = builder.process_file(file) {
                debug!("Parse error in {} (continuing): {}", file.path.display(), e);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!("Resolving references...");
        Ok(builder.build())
    }
}

/// Parse the resource files whose elements the detector visits, keeping
/// discovery order
fn parse_resources(files: &[SourceFile], detector: &RequiresEntryPointDetector) -> Vec<ResourceDocument> {
    let parser = ResourceParser::new();

    files
        .par_iter()
        .filter_map(|file| {
            let folder = file.file_type.resource_folder()?;
            if !detector.applies_to(folder) {
                return None;
            }
            let parsed = file
                .read_contents()
                .and_then(|contents| parser.parse(&file.path, folder, &contents));
            match parsed {
                Ok(document) => Some(document),
                Err(e) => {
                    debug!("Skipping unreadable resource {}: {}", file.path.display(), e);
                    None
                }
            }
        })
        .collect()
}
