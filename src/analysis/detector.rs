use super::collectors::{
    AnnotationUsageCollector, FactoryCallCollector, ResourceReferenceCollector, ResourceTreeCollector,
};
use super::context::AnalysisContext;
use super::evaluator::ConsistencyEvaluator;
use super::facts::UsageSite;
use super::issue::{DiagnosticSink, Issue, REQUIRES_ANDROID_ENTRY_POINT};
use super::{AnalysisError, SourceQuery};
use crate::config::HiltConfig;
use crate::discovery::ResourceFolder;
use crate::parser::xml::{ResourceDocument, XmlElement};
use std::path::Path;
use tracing::{debug, info};

/// Entry point of the rule for a host running it over a project.
///
/// A run is `before_check_root_project`, any number of `visit_*` callbacks in
/// any order, then `after_check_root_project`. The callbacks only borrow the
/// detector, so they may be issued from several threads.
pub struct RequiresEntryPointDetector {
    config: HiltConfig,
    context: AnalysisContext,
    annotation_usages: AnnotationUsageCollector,
    factory_calls: FactoryCallCollector,
    resource_tree: ResourceTreeCollector,
    resource_references: ResourceReferenceCollector,
}

impl RequiresEntryPointDetector {
    pub fn new(config: HiltConfig) -> Self {
        Self {
            annotation_usages: AnnotationUsageCollector::new(&config),
            factory_calls: FactoryCallCollector::new(&config),
            resource_tree: ResourceTreeCollector::new(),
            resource_references: ResourceReferenceCollector::new(),
            context: AnalysisContext::default(),
            config,
        }
    }

    pub fn issue() -> &'static Issue {
        &REQUIRES_ANDROID_ENTRY_POINT
    }

    /// Start a run, dropping everything collected by the previous one
    pub fn before_check_root_project(&mut self, uses_view_binding: bool) {
        self.context = AnalysisContext::new(uses_view_binding);
    }

    pub fn applicable_annotations(&self) -> [&str; 2] {
        self.annotation_usages.applicable_annotations()
    }

    pub fn applicable_method_names(&self) -> &[String] {
        self.factory_calls.applicable_method_names()
    }

    /// Whether elements of resources in `folder` should be visited
    pub fn applies_to(&self, folder: ResourceFolder) -> bool {
        self.resource_tree.applies_to(folder)
    }

    pub fn visit_annotation_usage(
        &self,
        annotated: &str,
        annotated_class: Option<&str>,
        annotation: &str,
        usage: UsageSite,
    ) {
        self.annotation_usages
            .visit_annotation_usage(&self.context, annotated, annotated_class, annotation, usage);
    }

    pub fn visit_method_call(&self, callee: &str, type_arguments: &[String], usage: UsageSite) {
        self.factory_calls
            .visit_method_call(&self.context, callee, type_arguments, usage);
    }

    pub fn visit_element(&self, document: &ResourceDocument, element: &XmlElement) -> Result<(), AnalysisError> {
        self.resource_tree.visit_element(&self.context, document, element)
    }

    pub fn visit_binding_reference(
        &self,
        query: &dyn SourceQuery,
        type_name: &str,
        from: &Path,
        usage: UsageSite,
    ) {
        self.resource_references
            .visit_binding_reference(&self.context, query, type_name, from, usage);
    }

    pub fn visit_resource_reference(&self, resource_type: &str, name: &str, usage: UsageSite) {
        self.resource_references
            .visit_resource_reference(&self.context, resource_type, name, usage);
    }

    /// Evaluate what the run collected. The run's facts are consumed, so a
    /// second call without a new `before_check_root_project` reports nothing.
    pub fn after_check_root_project(&mut self, query: &dyn SourceQuery, sink: &mut dyn DiagnosticSink) {
        let facts = std::mem::take(&mut self.context).finish();
        if facts.is_empty() {
            debug!("Nothing collected, skipping evaluation");
            return;
        }

        info!("Checking entry point consistency...");
        debug!("Project uses view binding: {}", facts.uses_view_binding);
        ConsistencyEvaluator::new(query, &self.config).evaluate(&facts, sink);
    }
}
