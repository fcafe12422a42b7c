use super::{Declaration, DeclarationId, FileContext, Graph, Reference, Scoped, UnresolvedReference};
use crate::discovery::{FileType, SourceFile};
use crate::parser::{JavaParser, KotlinParser, ParseResult, Parser as SourceParser};
use miette::Result;
use std::path::Path;
use tracing::{debug, trace};

/// Builder for constructing the reference graph
pub struct GraphBuilder {
    /// The graph being built
    graph: Graph,

    kotlin_parser: KotlinParser,

    java_parser: JavaParser,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            kotlin_parser: KotlinParser::new(),
            java_parser: JavaParser::new(),
        }
    }

    /// Parse a source file and add its contents to the graph.
    /// Resource files are not part of the graph and are ignored.
    pub fn process_file(&mut self, file: &SourceFile) -> Result<()> {
        let parse_result = match file.file_type {
            FileType::Kotlin => {
                debug!("Parsing Kotlin file: {}", file.path.display());
                self.kotlin_parser.parse(&file.path, &file.read_contents()?)?
            }
            FileType::Java => {
                debug!("Parsing Java file: {}", file.path.display());
                self.java_parser.parse(&file.path, &file.read_contents()?)?
            }
            FileType::Resource(_) | FileType::XmlOther => return Ok(()),
        };

        self.add_parse_result(&file.path, parse_result);
        Ok(())
    }

    /// Add one parsed file. Every usage, call and resource identifier is
    /// tagged with the innermost declaration of the file that contains it.
    pub fn add_parse_result(&mut self, path: &Path, result: ParseResult) {
        let ParseResult {
            declarations,
            references,
            calls,
            resource_uses,
            package,
            imports,
        } = result;

        self.graph
            .add_file_context(path.to_path_buf(), FileContext { package, imports });

        for reference in references {
            let from = innermost(&declarations, path, reference.location.start_byte);
            self.graph.add_usage(Scoped { from, item: reference });
        }
        for call in calls {
            let from = innermost(&declarations, path, call.location.start_byte);
            self.graph.add_call(Scoped { from, item: call });
        }
        for resource_use in resource_uses {
            let from = innermost(&declarations, path, resource_use.location.start_byte);
            self.graph.add_resource_use(Scoped { from, item: resource_use });
        }

        for decl in declarations {
            self.graph.add_declaration(decl);
        }
    }

    /// Build the final graph, resolving all references
    pub fn build(mut self) -> Graph {
        resolve_references(&mut self.graph);
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The smallest declaration of the file containing the byte offset
fn innermost(declarations: &[Declaration], file: &Path, byte: usize) -> Option<DeclarationId> {
    declarations
        .iter()
        .filter(|d| d.id.contains(file, byte))
        .min_by_key(|d| d.id.end - d.id.start)
        .map(|d| d.id.clone())
}

/// Turn every scoped usage into edges to the declarations it may denote
pub(super) fn resolve_references(graph: &mut Graph) {
    let mut edges = Vec::new();

    for usage in graph.usages() {
        let Some(from) = &usage.from else {
            continue;
        };
        for to in resolve_reference(graph, &usage.item) {
            // A declaration naming itself is a parsing artifact, not a usage
            if &to == from {
                continue;
            }
            let reference = Reference::new(
                usage.item.kind,
                usage.item.location.clone(),
                usage.item.name.clone(),
            );
            edges.push((from.clone(), to, reference));
        }
    }

    debug!("Resolved {} references", edges.len());
    for (from, to, reference) in edges {
        graph.add_reference(&from, &to, reference);
    }
}

/// Declarations a reference may denote. Overloads and same-named members
/// all match when the name is neither qualified nor imported.
fn resolve_reference(graph: &Graph, unresolved: &UnresolvedReference) -> Vec<DeclarationId> {
    if let Some(fqn) = &unresolved.qualified_name {
        if let Some(decl) = graph.find_by_fqn(fqn) {
            return vec![decl.id.clone()];
        }
    }

    let file = &unresolved.location.file;
    if let Some(context) = graph.file_context(file) {
        for import in &context.imports {
            let target = match import.split_once(" as ") {
                Some((original, alias)) if alias.trim() == unresolved.name => original.trim(),
                Some(_) => continue,
                None if import.rsplit('.').next() == Some(unresolved.name.as_str()) => import.as_str(),
                None => continue,
            };
            // Imported from a library: nothing in the project to point at
            return match graph.find_by_fqn(target) {
                Some(decl) => vec![decl.id.clone()],
                None => {
                    trace!("{} is imported from outside the project", target);
                    Vec::new()
                }
            };
        }
    }

    let mut candidates: Vec<DeclarationId> = graph
        .find_by_name(&unresolved.name)
        .into_iter()
        .map(|d| d.id.clone())
        .collect();
    candidates.sort();
    candidates
}
