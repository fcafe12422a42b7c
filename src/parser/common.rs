use crate::graph::{CallSite, Declaration, DeclarationId, Location, ResourceUse, UnresolvedReference};
use miette::Result;
use std::path::Path;

/// Result of parsing a source file
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Declarations found in the file
    pub declarations: Vec<Declaration>,

    /// Unresolved references that need to be resolved against other files
    pub references: Vec<UnresolvedReference>,

    /// Calls with their callee name and explicit type arguments
    pub calls: Vec<CallSite>,

    /// `R.<type>.<name>` identifiers
    pub resource_uses: Vec<ResourceUse>,

    /// Package/namespace of the file
    pub package: Option<String>,

    /// Import statements
    pub imports: Vec<String>,
}

impl ParseResult {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Trait for language-specific parsers
pub trait Parser {
    /// Parse a source file and extract declarations and references
    fn parse(&self, path: &Path, contents: &str) -> Result<ParseResult>;
}

/// The declaration a member is being extracted into
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: DeclarationId,
    pub fqn: String,
}

/// Qualified name of `name` declared under `parent`, or at top level of `package`
pub fn qualify(package: &Option<String>, parent: Option<&Scope>, name: &str) -> String {
    match (parent, package) {
        (Some(scope), _) => format!("{}.{}", scope.fqn, name),
        (None, Some(pkg)) => format!("{}.{}", pkg, name),
        (None, None) => name.to_string(),
    }
}

/// Helper to convert tree-sitter Point to Location
pub fn point_to_location(
    file: &Path,
    start: tree_sitter::Point,
    _end: tree_sitter::Point,
    start_byte: usize,
    end_byte: usize,
) -> Location {
    Location::new(
        file.to_path_buf(),
        start.row + 1,    // tree-sitter uses 0-indexed lines
        start.column + 1, // tree-sitter uses 0-indexed columns
        start_byte,
        end_byte,
    )
}

/// Location spanning a whole node
pub fn node_location(file: &Path, node: tree_sitter::Node) -> Location {
    point_to_location(
        file,
        node.start_position(),
        node.end_position(),
        node.start_byte(),
        node.end_byte(),
    )
}

/// Extract text from a node
pub fn node_text<'a>(node: tree_sitter::Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Find the first child of a specific kind
pub fn child_of_kind<'a>(node: tree_sitter::Node<'a>, kind: &str) -> Option<tree_sitter::Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Annotation name as written: `@field:Inject` is `Inject`,
/// `@AndroidEntryPoint(Base::class)` is `AndroidEntryPoint`
pub fn annotation_name(text: &str) -> String {
    let text = text.trim().trim_start_matches('@');
    let text = text.split('(').next().unwrap_or(text);
    let text = match text.split_once(':') {
        Some((_, rest)) => rest,
        None => text,
    };
    text.split('<').next().unwrap_or(text).trim().to_string()
}

/// Type name as written without arguments: `FragmentActivity()` is
/// `FragmentActivity`, `Base<VB>` is `Base`, `out Item?` is `Item`
pub fn type_name(text: &str) -> String {
    let text = text.trim();
    let text = text
        .strip_prefix("in ")
        .or_else(|| text.strip_prefix("out "))
        .unwrap_or(text);
    let text = text.split(['(', '<']).next().unwrap_or(text);
    text.trim().trim_end_matches('?').trim().to_string()
}

/// Split a resource identifier such as `R.layout.main` or
/// `com.example.R.navigation.nav_graph` into (type, name)
pub fn resource_identifier(text: &str) -> Option<(String, String)> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let segments: Vec<&str> = compact.split('.').collect();
    if segments.len() < 3 {
        return None;
    }

    let n = segments.len();
    let (r, resource_type, name) = (segments[n - 3], segments[n - 2], segments[n - 1]);
    let is_identifier = |s: &str| {
        !s.is_empty()
            && s.chars().all(|c| c.is_alphanumeric() || c == '_')
            && !s.starts_with(|c: char| c.is_ascii_digit())
    };

    if r == "R" && is_identifier(resource_type) && is_identifier(name) {
        Some((resource_type.to_string(), name.to_string()))
    } else {
        None
    }
}
