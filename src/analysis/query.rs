use std::path::Path;

/// Semantic questions the rule asks about the project's sources
pub trait SourceQuery: Send + Sync {
    /// Qualified name of the class `name` denotes when written in `from`,
    /// if that class is known
    fn resolve_class(&self, name: &str, from: &Path) -> Option<String>;

    /// Qualified name of the class a resource element names. Resource files
    /// have no imports: `name` is either fully qualified or the simple name
    /// of a framework class, never a project class by simple name.
    fn resolve_resource_class(&self, name: &str) -> Option<String>;

    /// Whether `class` is `super_class` or transitively extends/implements it
    fn extends_class(&self, class: &str, super_class: &str) -> bool;

    /// Whether `class` is annotated with the annotation named `annotation`
    fn has_annotation(&self, class: &str, annotation: &str) -> bool;
}
