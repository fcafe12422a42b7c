mod builder;
mod declaration;
pub mod framework;
mod hierarchy;
mod parallel_builder;
pub mod reference;

pub use builder::GraphBuilder;
pub use declaration::{Declaration, DeclarationId, DeclarationKind, Language, Location};
pub use parallel_builder::ParallelGraphBuilder;
pub use reference::{CallSite, Reference, ReferenceKind, ResourceUse, Scoped, UnresolvedReference};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Package and imports of a parsed source file
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub package: Option<String>,
    /// Imports as written: `a.b.C`, `a.b.*`, `a.b.C as D`
    pub imports: Vec<String>,
}

/// The reference graph containing all declarations and their relationships,
/// plus the raw usages, call sites and resource identifiers found while parsing
#[derive(Debug)]
pub struct Graph {
    /// Nodes are DeclarationIds, edges are resolved References
    inner: DiGraph<DeclarationId, Reference>,

    node_map: HashMap<DeclarationId, NodeIndex>,

    declarations: HashMap<DeclarationId, Declaration>,

    /// Simple name to possible declarations (for resolution)
    name_index: HashMap<String, Vec<DeclarationId>>,

    /// Fully qualified name to declaration
    fqn_index: HashMap<String, DeclarationId>,

    files: HashMap<PathBuf, FileContext>,

    /// Every reference found while parsing, resolved or not, in file order
    usages: Vec<Scoped<UnresolvedReference>>,

    calls: Vec<Scoped<CallSite>>,

    resource_uses: Vec<Scoped<ResourceUse>>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            declarations: HashMap::new(),
            name_index: HashMap::new(),
            fqn_index: HashMap::new(),
            files: HashMap::new(),
            usages: Vec::new(),
            calls: Vec::new(),
            resource_uses: Vec::new(),
        }
    }

    /// Add a declaration to the graph
    pub fn add_declaration(&mut self, decl: Declaration) -> DeclarationId {
        let id = decl.id.clone();

        let node_idx = self.inner.add_node(id.clone());
        self.node_map.insert(id.clone(), node_idx);

        self.name_index
            .entry(decl.name.clone())
            .or_default()
            .push(id.clone());

        // First declaration wins for duplicated qualified names (source sets)
        if let Some(fqn) = &decl.fully_qualified_name {
            self.fqn_index.entry(fqn.clone()).or_insert_with(|| id.clone());
        }

        self.declarations.insert(id.clone(), decl);

        id
    }

    /// Add a reference between two declarations
    pub fn add_reference(&mut self, from: &DeclarationId, to: &DeclarationId, reference: Reference) {
        if let (Some(&from_idx), Some(&to_idx)) = (self.node_map.get(from), self.node_map.get(to)) {
            self.inner.add_edge(from_idx, to_idx, reference);
        }
    }

    pub fn add_file_context(&mut self, file: PathBuf, context: FileContext) {
        self.files.insert(file, context);
    }

    pub fn add_usage(&mut self, usage: Scoped<UnresolvedReference>) {
        self.usages.push(usage);
    }

    pub fn add_call(&mut self, call: Scoped<CallSite>) {
        self.calls.push(call);
    }

    pub fn add_resource_use(&mut self, resource_use: Scoped<ResourceUse>) {
        self.resource_uses.push(resource_use);
    }

    pub fn file_context(&self, file: &Path) -> Option<&FileContext> {
        self.files.get(file)
    }

    /// Find declarations by simple name
    pub fn find_by_name(&self, name: &str) -> Vec<&Declaration> {
        self.name_index
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.declarations.get(id)).collect())
            .unwrap_or_default()
    }

    /// Find declaration by fully qualified name
    pub fn find_by_fqn(&self, fqn: &str) -> Option<&Declaration> {
        self.fqn_index
            .get(fqn)
            .and_then(|id| self.declarations.get(id))
    }

    /// Find a class-like declaration by fully qualified name
    pub fn find_class(&self, fqn: &str) -> Option<&Declaration> {
        self.find_by_fqn(fqn).filter(|d| d.kind.is_class_like())
    }

    /// All resolved references, as (from, to, reference), in insertion order
    pub fn references(&self) -> impl Iterator<Item = (&Declaration, &Declaration, &Reference)> {
        self.inner.edge_references().filter_map(|edge| {
            let from = self.declarations.get(self.inner.node_weight(edge.source())?)?;
            let to = self.declarations.get(self.inner.node_weight(edge.target())?)?;
            Some((from, to, edge.weight()))
        })
    }

    pub fn usages(&self) -> &[Scoped<UnresolvedReference>] {
        &self.usages
    }

    pub fn calls(&self) -> &[Scoped<CallSite>] {
        &self.calls
    }

    pub fn resource_uses(&self) -> &[Scoped<ResourceUse>] {
        &self.resource_uses
    }

    /// The nearest class-like declaration enclosing `id`, including itself
    pub fn enclosing_class(&self, id: &DeclarationId) -> Option<&Declaration> {
        let mut current = self.declarations.get(id)?;
        loop {
            if current.kind.is_class_like() {
                return Some(current);
            }
            current = self.declarations.get(current.parent.as_ref()?)?;
        }
    }

    /// The outermost class-like declaration enclosing `id`, including itself
    pub fn top_level_class(&self, id: &DeclarationId) -> Option<&Declaration> {
        let mut current = self.declarations.get(id)?;
        let mut outermost = current.kind.is_class_like().then_some(current);
        while let Some(parent) = current.parent.as_ref().and_then(|p| self.declarations.get(p)) {
            if parent.kind.is_class_like() {
                outermost = Some(parent);
            }
            current = parent;
        }
        outermost
    }

    /// Qualified name of the class a type name denotes when written in `from`.
    ///
    /// Qualified names are returned as written. Simple names are looked up in
    /// explicit and aliased imports, the file's own package, wildcard imports,
    /// then project classes and known framework classes by simple name.
    pub fn resolve_type_name(&self, written: &str, from: &Path) -> Option<String> {
        let written = written.trim();
        if written.is_empty() {
            return None;
        }

        let context = self.files.get(from);

        if let Some((head, rest)) = written.split_once('.') {
            // `Outer.Inner` written against an imported or local `Outer`
            if head.starts_with(|c: char| c.is_uppercase()) {
                if let Some(outer) = self.resolve_type_name(head, from) {
                    return Some(format!("{}.{}", outer, rest));
                }
            }
            return Some(written.to_string());
        }

        if let Some(context) = context {
            for import in &context.imports {
                if let Some((original, alias)) = import.split_once(" as ") {
                    if alias.trim() == written {
                        return Some(original.trim().to_string());
                    }
                } else if import.rsplit('.').next() == Some(written) {
                    return Some(import.clone());
                }
            }

            if let Some(package) = &context.package {
                let candidate = format!("{}.{}", package, written);
                if self.find_class(&candidate).is_some() {
                    return Some(candidate);
                }
            }

            for import in &context.imports {
                if let Some(package) = import.strip_suffix(".*") {
                    let candidate = format!("{}.{}", package, written);
                    if self.find_class(&candidate).is_some()
                        || framework::supertypes(&candidate).is_some()
                    {
                        return Some(candidate);
                    }
                }
            }
        }

        let mut project_classes: Vec<&Declaration> = self
            .find_by_name(written)
            .into_iter()
            .filter(|d| d.kind.is_class_like())
            .collect();
        project_classes.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(decl) = project_classes.first() {
            return Some(decl.qualified_name().to_string());
        }

        framework::qualified_name(written).map(String::from)
    }

    /// Get the number of declarations
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    /// Get the number of resolved references
    pub fn reference_count(&self) -> usize {
        self.inner.edge_count()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
