use super::detector::RequiresEntryPointDetector;
use super::facts::UsageSite;
use super::AnalysisError;
use crate::graph::{DeclarationId, Graph, Location, ReferenceKind};
use crate::parser::xml::ResourceDocument;
use tracing::{debug, trace};

/// Reference kinds through which a marked declaration counts as used
const USAGE_KINDS: [ReferenceKind; 7] = [
    ReferenceKind::Call,
    ReferenceKind::Instantiation,
    ReferenceKind::Type,
    ReferenceKind::Read,
    ReferenceKind::TypeArgument,
    ReferenceKind::Inheritance,
    ReferenceKind::ClassLiteral,
];

/// Feeds a detector with everything found in a parsed project.
///
/// Sources are walked in graph order and resources in the order given,
/// both sorted by path, so ties between facts resolve the same way on
/// every run.
pub struct ProjectRunner<'a> {
    graph: &'a Graph,
    documents: &'a [ResourceDocument],
}

impl<'a> ProjectRunner<'a> {
    pub fn new(graph: &'a Graph, documents: &'a [ResourceDocument]) -> Self {
        Self { graph, documents }
    }

    /// Issue every collection callback of one run
    pub fn run(&self, detector: &RequiresEntryPointDetector) -> Result<(), AnalysisError> {
        self.visit_annotation_usages(detector);
        self.visit_method_calls(detector);
        self.visit_binding_references(detector);
        self.visit_resource_references(detector);
        self.visit_resources(detector)
    }

    fn visit_annotation_usages(&self, detector: &RequiresEntryPointDetector) {
        let applicable = detector.applicable_annotations();

        for (from, to, reference) in self.graph.references() {
            if !USAGE_KINDS.contains(&reference.kind) {
                continue;
            }

            let markers: Vec<String> = self
                .graph
                .declaration_annotations(to)
                .into_iter()
                .filter(|a| applicable.contains(&a.as_str()))
                .collect();
            if markers.is_empty() {
                continue;
            }

            let annotated_class = self
                .graph
                .top_level_class(&to.id)
                .map(|d| d.qualified_name().to_string());
            for marker in &markers {
                detector.visit_annotation_usage(
                    to.qualified_name(),
                    annotated_class.as_deref(),
                    marker,
                    self.usage_site(Some(&from.id), &reference.location),
                );
            }
        }
    }

    fn visit_method_calls(&self, detector: &RequiresEntryPointDetector) {
        let factories = detector.applicable_method_names();

        for call in self.graph.calls() {
            if !factories.contains(&call.item.callee) {
                continue;
            }
            trace!("{} called at {}", call.item.callee, call.item.location);
            detector.visit_method_call(
                &call.item.callee,
                &call.item.type_arguments,
                self.usage_site(call.from.as_ref(), &call.item.location),
            );
        }
    }

    fn visit_binding_references(&self, detector: &RequiresEntryPointDetector) {
        for usage in self.graph.usages() {
            let reference = &usage.item;
            // Only type names can denote a binding class
            if !reference.kind.may_name_type() || !reference.name.starts_with(char::is_uppercase) {
                continue;
            }
            detector.visit_binding_reference(
                self.graph,
                reference.written_name(),
                &reference.location.file,
                self.usage_site(usage.from.as_ref(), &reference.location),
            );
        }
    }

    fn visit_resource_references(&self, detector: &RequiresEntryPointDetector) {
        for resource_use in self.graph.resource_uses() {
            detector.visit_resource_reference(
                &resource_use.item.resource_type,
                &resource_use.item.name,
                self.usage_site(resource_use.from.as_ref(), &resource_use.item.location),
            );
        }
    }

    fn visit_resources(&self, detector: &RequiresEntryPointDetector) -> Result<(), AnalysisError> {
        for document in self.documents {
            if !detector.applies_to(document.folder) {
                continue;
            }
            debug!(
                "Visiting {} elements of {}",
                document.elements.len(),
                document.path.display()
            );
            for element in &document.elements {
                detector.visit_element(document, element)?;
            }
        }
        Ok(())
    }

    /// The usage location together with its nearest enclosing class
    fn usage_site(&self, from: Option<&DeclarationId>, location: &Location) -> UsageSite {
        let host = from
            .and_then(|id| self.graph.enclosing_class(id))
            .map(|class| class.qualified_name().to_string());
        UsageSite {
            host,
            location: location.clone(),
        }
    }
}
