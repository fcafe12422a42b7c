use super::{framework, Declaration, Graph};
use crate::analysis::SourceQuery;
use std::collections::HashSet;
use std::path::Path;
use tracing::trace;

impl Graph {
    /// Qualified names of the direct supertypes of a class
    fn direct_supertypes(&self, class: &str) -> Vec<String> {
        if let Some(decl) = self.find_class(class) {
            return decl
                .super_types
                .iter()
                .filter_map(|written| self.resolve_type_name(written, &decl.location.file))
                .collect();
        }

        if let Some(parents) = framework::supertypes(class) {
            return parents.iter().map(|p| p.to_string()).collect();
        }

        if framework::is_generated_binding(class) {
            return vec![framework::CLASS_VIEW_BINDING.to_string()];
        }

        trace!("No supertype information for {}", class);
        Vec::new()
    }

    /// Whether an annotation written on a declaration in `file` denotes `annotation`
    fn annotation_matches(&self, written: &str, annotation: &str, file: &Path) -> bool {
        written == annotation
            || self.resolve_type_name(written, file).as_deref() == Some(annotation)
    }

    /// Qualified names of all annotations on a declaration
    pub fn declaration_annotations(&self, decl: &Declaration) -> Vec<String> {
        decl.annotations
            .iter()
            .filter_map(|written| self.resolve_type_name(written, &decl.location.file))
            .collect()
    }
}

impl SourceQuery for Graph {
    fn resolve_class(&self, name: &str, from: &Path) -> Option<String> {
        let resolved = self.resolve_type_name(name, from)?;
        let known = self.find_class(&resolved).is_some()
            || framework::supertypes(&resolved).is_some()
            || framework::is_generated_binding(&resolved);
        known.then_some(resolved)
    }

    fn resolve_resource_class(&self, name: &str) -> Option<String> {
        if !name.contains('.') {
            return framework::qualified_name(name).map(String::from);
        }
        // Nested classes are written `Outer$Inner` in resources
        let name = name.replace('$', ".");
        let known = self.find_class(&name).is_some() || framework::supertypes(&name).is_some();
        known.then_some(name)
    }

    fn extends_class(&self, class: &str, super_class: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![class.to_string()];

        while let Some(current) = stack.pop() {
            if current == super_class {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            stack.extend(self.direct_supertypes(&current));
        }

        false
    }

    fn has_annotation(&self, class: &str, annotation: &str) -> bool {
        let Some(decl) = self.find_by_fqn(class) else {
            return false;
        };
        decl.annotations
            .iter()
            .any(|written| self.annotation_matches(written, annotation, &decl.location.file))
    }
}
