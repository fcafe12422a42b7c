use super::{DeclarationId, Location};
use serde::{Deserialize, Serialize};

/// Kind of reference between declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Calling a function/method, or a Kotlin constructor call
    Call,

    /// Reading a property/field, or naming a class as a receiver
    Read,

    /// Type reference (in type annotation, generic, etc.)
    Type,

    /// Inheritance (extends/implements)
    Inheritance,

    /// Instantiation (Java `new`)
    Instantiation,

    /// Annotation usage
    Annotation,

    /// Generic type argument (e.g., `viewModels<MyViewModel>()`)
    TypeArgument,

    /// Class literal (e.g., `MyClass::class`, Java `MyClass.class`)
    ClassLiteral,

    /// Callable reference (e.g., `MyClass::create`)
    Reflection,
}

impl ReferenceKind {
    /// References that can name a type
    pub fn may_name_type(&self) -> bool {
        matches!(
            self,
            ReferenceKind::Type
                | ReferenceKind::Read
                | ReferenceKind::Call
                | ReferenceKind::Instantiation
                | ReferenceKind::TypeArgument
                | ReferenceKind::ClassLiteral
                | ReferenceKind::Reflection
        )
    }
}

/// A resolved reference from one declaration to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Kind of reference
    pub kind: ReferenceKind,

    /// Location where the reference occurs
    pub location: Location,

    /// The name/identifier used in the reference
    pub name: String,
}

impl Reference {
    pub fn new(kind: ReferenceKind, location: Location, name: String) -> Self {
        Self {
            kind,
            location,
            name,
        }
    }
}

/// A reference that hasn't been resolved to a specific declaration yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedReference {
    /// The name being referenced
    pub name: String,

    /// Fully qualified name if written qualified
    pub qualified_name: Option<String>,

    /// Kind of reference
    pub kind: ReferenceKind,

    /// Location of the reference
    pub location: Location,
}

impl UnresolvedReference {
    /// Build a reference, splitting a qualified name into its simple part
    pub fn new(name: &str, kind: ReferenceKind, location: Location) -> Self {
        let (name, qualified_name) = match name.rsplit_once('.') {
            Some((_, simple)) => (simple.to_string(), Some(name.to_string())),
            None => (name.to_string(), None),
        };

        Self {
            name,
            qualified_name,
            kind,
            location,
        }
    }

    /// The name as written, qualified if it was written qualified
    pub fn written_name(&self) -> &str {
        self.qualified_name.as_deref().unwrap_or(&self.name)
    }
}

/// A call site with its callee name and explicit type arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Simple name of the called function
    pub callee: String,

    /// Type arguments as written, without nested type arguments
    pub type_arguments: Vec<String>,

    /// From the callee name to the end of the argument list
    pub location: Location,
}

/// A compiled resource identifier such as `R.layout.activity_main`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUse {
    /// Resource type segment (`layout`, `navigation`, `string`, ...)
    pub resource_type: String,

    /// Resource name segment
    pub name: String,

    pub location: Location,
}

/// An item tagged with the innermost declaration enclosing it
#[derive(Debug, Clone)]
pub struct Scoped<T> {
    pub from: Option<DeclarationId>,
    pub item: T,
}
