// Parallel graph builder using rayon

use super::{Graph, GraphBuilder};
use crate::discovery::{FileType, SourceFile};
use crate::parser::{JavaParser, KotlinParser, ParseResult, Parser as SourceParser};
use miette::Result;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Parallel graph builder for faster processing
pub struct ParallelGraphBuilder;

impl ParallelGraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build graph from source files using parallel processing.
    /// Files that fail to parse are logged and skipped.
    pub fn build_from_files(&self, files: &[SourceFile]) -> Result<Graph> {
        let sources: Vec<&SourceFile> = files.iter().filter(|f| f.file_type.is_source()).collect();
        info!("Parsing {} source files in parallel...", sources.len());

        let results: Vec<(PathBuf, Result<ParseResult>)> = sources
            .par_iter()
            .map(|file| (file.path.clone(), self.parse_file(file)))
            .collect();

        // par_iter keeps input order, so the graph matches a sequential build
        let mut builder = GraphBuilder::new();
        for (path, result) in results {
            match result {
                Ok(parsed) => builder.add_parse_result(&path, parsed),
                Err(e) => debug!("Parse error in {} (continuing): {}", path.display(), e),
            }
        }

        info!("Resolving references...");
        Ok(builder.build())
    }

    fn parse_file(&self, file: &SourceFile) -> Result<ParseResult> {
        let contents = file.read_contents()?;

        match file.file_type {
            FileType::Kotlin => KotlinParser::new().parse(&file.path, &contents),
            FileType::Java => JavaParser::new().parse(&file.path, &contents),
            _ => Ok(ParseResult::new()),
        }
    }
}

impl Default for ParallelGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
