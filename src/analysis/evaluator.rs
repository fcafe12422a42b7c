use super::context::CollectedFacts;
use super::facts::{AnnotationUsage, FactoryCall, MarkerKind, ReferenceOrigin, ResourceKind, ResourceNode, ResourceReference};
use super::issue::{DiagnosticSink, REQUIRES_ANDROID_ENTRY_POINT};
use super::SourceQuery;
use crate::config::HiltConfig;
use crate::graph::framework::{CLASS_ACTIVITY, CLASS_APPLICATION, CLASS_FRAGMENT, CLASS_VIEW};
use crate::graph::Location;
use tracing::{debug, trace};

/// Checks the collected facts once collection is over
pub struct ConsistencyEvaluator<'a> {
    query: &'a dyn SourceQuery,
    config: &'a HiltConfig,
}

impl<'a> ConsistencyEvaluator<'a> {
    pub fn new(query: &'a dyn SourceQuery, config: &'a HiltConfig) -> Self {
        Self { query, config }
    }

    /// Run every pass, reporting at most one diagnostic per fact
    pub fn evaluate(&self, facts: &CollectedFacts, sink: &mut dyn DiagnosticSink) {
        debug!(
            "Evaluating {} annotation usages, {} factory calls, {} layout nodes, {} navigation nodes, {} resource references",
            facts.annotation_usages.len(),
            facts.factory_calls.len(),
            facts.layout_nodes.len(),
            facts.navigation_nodes.len(),
            facts.resource_references.len()
        );

        for usage in &facts.annotation_usages {
            self.check_annotation_usage(usage, sink);
        }
        for call in &facts.factory_calls {
            self.check_factory_call(call, sink);
        }
        self.check_layouts(facts, sink);
        self.check_navigation(facts, sink);
    }

    /// Fragments used from an activity and views used from an activity or
    /// fragment must be attached to an entry point, as must anything
    /// explicitly marked as requiring one
    fn check_annotation_usage(&self, data: &AnnotationUsage, sink: &mut dyn DiagnosticSink) {
        let Some(host) = data.usage.host.as_deref() else {
            trace!("No host for usage of {}", data.annotated);
            return;
        };
        if !self.is_android_component(host) {
            return;
        }

        let annotated_extends = |super_class: &str| {
            data.annotated_class
                .as_deref()
                .map(|class| self.query.extends_class(class, super_class))
                .unwrap_or(false)
        };

        let host_is_activity = self.query.extends_class(host, CLASS_ACTIVITY);
        let host_is_fragment = self.query.extends_class(host, CLASS_FRAGMENT);

        let fragment_used_in_activity = annotated_extends(CLASS_FRAGMENT) && host_is_activity;
        let view_used_in_activity_or_fragment =
            annotated_extends(CLASS_VIEW) && (host_is_activity || host_is_fragment);

        let marker = if fragment_used_in_activity || view_used_in_activity_or_fragment {
            &self.config.entry_point_annotation
        } else if data.marker == MarkerKind::RequiresEntryPoint {
            &self.config.requires_entry_point_annotation
        } else {
            return;
        };

        self.require_entry_point(host, &data.annotated, marker, &data.usage.location, sink);
    }

    /// A view model annotated with `@HiltViewModel` can only be created from an entry point
    fn check_factory_call(&self, data: &FactoryCall, sink: &mut dyn DiagnosticSink) {
        let Some(host) = data.usage.host.as_deref() else {
            return;
        };
        if !self.is_android_component(host) {
            return;
        }
        let Some(type_argument) = data.type_argument.as_deref() else {
            return;
        };
        let Some(view_model) = self.query.resolve_class(type_argument, &data.usage.location.file) else {
            trace!("Cannot resolve view model {}", type_argument);
            return;
        };

        if self.query.has_annotation(&view_model, &self.config.view_model_annotation) {
            self.require_entry_point(
                host,
                &view_model,
                &self.config.view_model_annotation,
                &data.usage.location,
                sink,
            );
        }
    }

    /// An entry point placed in a layout needs the class using that layout
    /// to be an entry point too
    fn check_layouts(&self, facts: &CollectedFacts, sink: &mut dyn DiagnosticSink) {
        if facts.resource_references.is_empty() || facts.layout_nodes.is_empty() {
            return;
        }

        for node in &facts.layout_nodes {
            let Some(reference) = first_reference(&facts.resource_references, &node.base_name) else {
                continue;
            };
            if !self.is_entry_point_node(node) {
                continue;
            }
            let Some(host) = reference.host.as_deref() else {
                continue;
            };
            self.require_entry_point(
                host,
                &node.presentable_name,
                &self.config.entry_point_annotation,
                &node.location,
                sink,
            );
        }
    }

    /// An entry point destination needs the class hosting its navigation
    /// graph to be an entry point, whether the graph is set from code or
    /// embedded in one of the host's layouts
    fn check_navigation(&self, facts: &CollectedFacts, sink: &mut dyn DiagnosticSink) {
        if facts.resource_references.is_empty() || facts.navigation_nodes.is_empty() {
            return;
        }

        let associations = navigation_hosts(facts);

        for node in &facts.navigation_nodes {
            if !self.is_entry_point_node(node) {
                continue;
            }
            // Every association's host comes from a collected reference
            let Some((_, host)) = associations.iter().find(|(graph, _)| *graph == node.base_name) else {
                continue;
            };
            self.require_entry_point(
                host,
                &node.presentable_name,
                &self.config.entry_point_annotation,
                &node.location,
                sink,
            );
        }
    }

    fn is_android_component(&self, class: &str) -> bool {
        [CLASS_APPLICATION, CLASS_ACTIVITY, CLASS_FRAGMENT, CLASS_VIEW]
            .iter()
            .any(|component| self.query.extends_class(class, component))
    }

    /// Whether a resource element names a class annotated with `@AndroidEntryPoint`
    fn is_entry_point_node(&self, node: &ResourceNode) -> bool {
        self.query
            .resolve_resource_class(&node.presentable_name)
            .map(|class| self.query.has_annotation(&class, &self.config.entry_point_annotation))
            .unwrap_or(false)
    }

    fn require_entry_point(
        &self,
        host: &str,
        subject: &str,
        marker: &str,
        location: &Location,
        sink: &mut dyn DiagnosticSink,
    ) {
        if self.query.has_annotation(host, &self.config.entry_point_annotation) {
            return;
        }

        let message = format!(
            "{} is annotated with {}, {} must be annotated with {}.",
            subject,
            display_annotation(marker),
            host,
            display_annotation(&self.config.entry_point_annotation)
        );
        sink.report(&REQUIRES_ANDROID_ENTRY_POINT, location.clone(), message);
    }
}

fn first_reference<'f>(references: &'f [ResourceReference], base_name: &str) -> Option<&'f ResourceReference> {
    references.iter().find(|r| r.base_name == base_name)
}

/// Navigation graph base name to the class hosting it, layout-embedded
/// graphs first, then graphs referenced directly from code
fn navigation_hosts(facts: &CollectedFacts) -> Vec<(String, String)> {
    let from_layouts = facts.layout_nodes.iter().filter_map(|node| {
        let graph = node.nav_graph.clone()?;
        let reference = first_reference(&facts.resource_references, &node.base_name)?;
        Some((graph, reference.host.clone()?))
    });

    let from_code = facts
        .resource_references
        .iter()
        .filter(|r| r.kind == ResourceKind::Navigation && r.origin == ReferenceOrigin::Direct)
        .filter_map(|r| Some((r.base_name.clone(), r.host.clone()?)));

    from_layouts.chain(from_code).collect()
}

/// `dagger.hilt.android.AndroidEntryPoint` is shown as `@AndroidEntryPoint`
fn display_annotation(qualified_name: &str) -> String {
    format!("@{}", qualified_name.rsplit('.').next().unwrap_or(qualified_name))
}
