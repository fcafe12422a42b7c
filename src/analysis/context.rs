use super::facts::{
    AnnotationUsage, FactSet, FactoryCall, ResourceKind, ResourceNode, ResourceReference,
    ResourceReferences,
};

/// Per-run state filled by the collectors.
///
/// Collectors only need `&AnalysisContext`, so they may run from several
/// threads. Evaluation needs the `CollectedFacts` that `finish` returns,
/// which is only reachable once every collector is done with the context.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub(super) annotation_usages: FactSet<AnnotationUsage>,
    pub(super) factory_calls: FactSet<FactoryCall>,
    pub(super) layout_nodes: FactSet<ResourceNode>,
    pub(super) navigation_nodes: FactSet<ResourceNode>,
    pub(super) resource_references: ResourceReferences,
    uses_view_binding: bool,
}

impl AnalysisContext {
    pub fn new(uses_view_binding: bool) -> Self {
        Self {
            uses_view_binding,
            ..Self::default()
        }
    }

    pub fn uses_view_binding(&self) -> bool {
        self.uses_view_binding
    }

    pub(super) fn resource_nodes(&self, kind: ResourceKind) -> &FactSet<ResourceNode> {
        match kind {
            ResourceKind::Layout => &self.layout_nodes,
            ResourceKind::Navigation => &self.navigation_nodes,
        }
    }

    /// Close collection and hand the facts to evaluation
    pub fn finish(self) -> CollectedFacts {
        CollectedFacts {
            annotation_usages: self.annotation_usages.into_vec(),
            factory_calls: self.factory_calls.into_vec(),
            layout_nodes: self.layout_nodes.into_vec(),
            navigation_nodes: self.navigation_nodes.into_vec(),
            resource_references: self.resource_references.into_vec(),
            uses_view_binding: self.uses_view_binding,
        }
    }
}

/// Frozen facts of one run, in collection order
#[derive(Debug, Default, Clone)]
pub struct CollectedFacts {
    pub annotation_usages: Vec<AnnotationUsage>,
    pub factory_calls: Vec<FactoryCall>,
    pub layout_nodes: Vec<ResourceNode>,
    pub navigation_nodes: Vec<ResourceNode>,
    pub resource_references: Vec<ResourceReference>,
    pub uses_view_binding: bool,
}

impl CollectedFacts {
    pub fn is_empty(&self) -> bool {
        self.annotation_usages.is_empty()
            && self.factory_calls.is_empty()
            && self.layout_nodes.is_empty()
            && self.navigation_nodes.is_empty()
            && self.resource_references.is_empty()
    }
}
