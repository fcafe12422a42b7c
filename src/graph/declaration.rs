use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationId {
    /// File path
    pub file: PathBuf,
    /// Starting byte offset in file
    pub start: usize,
    /// Ending byte offset in file
    pub end: usize,
}

impl DeclarationId {
    pub fn new(file: PathBuf, start: usize, end: usize) -> Self {
        Self { file, start, end }
    }

    /// Whether the byte offset lies inside this declaration in the same file
    pub fn contains(&self, file: &std::path::Path, byte: usize) -> bool {
        self.file == file && self.start <= byte && byte <= self.end
    }
}

impl std::fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.start, self.end)
    }
}

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
    Function,
    Method,
    Constructor,
    Property,
    Field,
}

impl DeclarationKind {
    /// Declarations that can host a usage: classes, interfaces, objects, enums
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Interface
                | DeclarationKind::Object
                | DeclarationKind::Enum
                | DeclarationKind::Annotation
        )
    }
}

/// Location in source code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// Starting byte offset
    pub start_byte: usize,
    /// Ending byte offset
    pub end_byte: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize, start_byte: usize, end_byte: usize) -> Self {
        Self {
            file,
            line,
            column,
            start_byte,
            end_byte,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A declaration in the source code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    /// Unique identifier
    pub id: DeclarationId,

    /// Simple name (e.g., "MainActivity")
    pub name: String,

    /// Fully qualified name (e.g., "com.example.app.MainActivity",
    /// "com.example.app.ExampleApi.exampleFragment" for members)
    pub fully_qualified_name: Option<String>,

    /// Kind of declaration
    pub kind: DeclarationKind,

    /// Location in source code
    pub location: Location,

    /// Parent declaration (e.g., class for a method)
    pub parent: Option<DeclarationId>,

    /// Annotation names as written, without `@`, use-site target or arguments
    pub annotations: Vec<String>,

    /// Extended/implemented type names as written, without type arguments
    pub super_types: Vec<String>,

    /// Language (Kotlin or Java)
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Kotlin,
    Java,
}

impl Declaration {
    pub fn new(
        id: DeclarationId,
        name: String,
        kind: DeclarationKind,
        location: Location,
        language: Language,
    ) -> Self {
        Self {
            id,
            name,
            fully_qualified_name: None,
            kind,
            location,
            parent: None,
            annotations: Vec::new(),
            super_types: Vec::new(),
            language,
        }
    }

    /// Fully qualified name, falling back to the simple name
    pub fn qualified_name(&self) -> &str {
        self.fully_qualified_name.as_deref().unwrap_or(&self.name)
    }
}
