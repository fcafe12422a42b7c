//! Facts gathered during collection.
//!
//! Every fact set is append-only and coalesces duplicates by value, so the
//! same usage reported twice (or from two threads) is evaluated once.

use crate::graph::Location;
use std::collections::HashSet;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Which of the two applicable markers a declaration carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `@RequiresAndroidEntryPoint`: may only be used from an entry point
    RequiresEntryPoint,
    /// `@AndroidEntryPoint`
    EntryPoint,
}

/// Where something is used, and the class it is used from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageSite {
    /// Qualified name of the nearest enclosing class-like declaration
    pub host: Option<String>,
    pub location: Location,
}

/// A usage of a declaration carrying one of the markers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationUsage {
    /// Qualified name of the annotated declaration (`pkg.Class` or `pkg.Class.member`)
    pub annotated: String,

    /// Top-level class containing the annotated declaration
    pub annotated_class: Option<String>,

    pub marker: MarkerKind,
    pub usage: UsageSite,
}

/// A call to a view model factory such as `viewModels<T>()`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactoryCall {
    pub usage: UsageSite,

    /// First type argument as written
    pub type_argument: Option<String>,
}

/// Resource kinds the rule relates to code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Layout,
    Navigation,
}

impl ResourceKind {
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            "layout" => Some(ResourceKind::Layout),
            "navigation" => Some(ResourceKind::Navigation),
            _ => None,
        }
    }
}

/// An element of a layout or navigation resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceNode {
    pub file: PathBuf,

    /// File name without extension
    pub base_name: String,

    pub kind: ResourceKind,
    pub tag: String,

    /// `android:name` for fragment tags, the tag name otherwise
    pub presentable_name: String,

    /// Base name of the navigation graph embedded with `app:navGraph`
    pub nav_graph: Option<String>,

    pub location: Location,
}

/// How a class came to be associated with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceOrigin {
    /// `R.layout.<name>` or `R.navigation.<name>`
    Direct,
    /// Naming convention of a generated binding class
    Binding,
}

/// A class referring to a layout or navigation resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    /// Qualified name of the referring class
    pub host: Option<String>,
    pub base_name: String,
    pub kind: ResourceKind,
    pub origin: ReferenceOrigin,
    pub location: Location,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Facts stay valid even if a collecting thread panicked
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Insertion-ordered set shared between collecting threads
#[derive(Debug)]
pub struct FactSet<T> {
    inner: Mutex<FactSetInner<T>>,
}

#[derive(Debug)]
struct FactSetInner<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Clone + Eq + Hash> FactSet<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(FactSetInner {
                items: Vec::new(),
                seen: HashSet::new(),
            }),
        }
    }

    /// Add a fact; returns false when an equal fact was already present
    pub fn insert(&self, fact: T) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.seen.insert(fact.clone()) {
            return false;
        }
        inner.items.push(fact);
        true
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The facts in insertion order
    pub fn into_vec(self) -> Vec<T> {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .items
    }
}

impl<T: Clone + Eq + Hash> Default for FactSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource references keyed by base name.
///
/// Holds at most one reference per base name. A direct reference replaces a
/// binding-derived one and is never replaced itself; otherwise the first
/// reference for a name is kept.
#[derive(Debug, Default)]
pub struct ResourceReferences {
    inner: Mutex<Vec<ResourceReference>>,
}

impl ResourceReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference; returns whether it is now the one kept for its name
    pub fn insert(&self, reference: ResourceReference) -> bool {
        let mut references = lock(&self.inner);

        match references.iter_mut().find(|r| r.base_name == reference.base_name) {
            None => {
                references.push(reference);
                true
            }
            Some(existing)
                if existing.origin == ReferenceOrigin::Binding
                    && reference.origin == ReferenceOrigin::Direct =>
            {
                *existing = reference;
                true
            }
            Some(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<ResourceReference> {
        self.inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
