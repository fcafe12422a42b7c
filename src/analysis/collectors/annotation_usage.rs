use crate::analysis::context::AnalysisContext;
use crate::analysis::facts::{AnnotationUsage, MarkerKind, UsageSite};
use crate::config::HiltConfig;
use tracing::trace;

/// Records usages of declarations carrying `@RequiresAndroidEntryPoint`
/// or `@AndroidEntryPoint`
pub struct AnnotationUsageCollector {
    requires_entry_point: String,
    entry_point: String,
}

impl AnnotationUsageCollector {
    pub fn new(config: &HiltConfig) -> Self {
        Self {
            requires_entry_point: config.requires_entry_point_annotation.clone(),
            entry_point: config.entry_point_annotation.clone(),
        }
    }

    /// Qualified names of the annotations this collector is interested in
    pub fn applicable_annotations(&self) -> [&str; 2] {
        [&self.requires_entry_point, &self.entry_point]
    }

    fn marker(&self, annotation: &str) -> Option<MarkerKind> {
        if annotation == self.requires_entry_point {
            Some(MarkerKind::RequiresEntryPoint)
        } else if annotation == self.entry_point {
            Some(MarkerKind::EntryPoint)
        } else {
            None
        }
    }

    /// A usage of `annotated` (qualified name), which carries `annotation`.
    /// `annotated_class` is the top-level class declaring it.
    pub fn visit_annotation_usage(
        &self,
        context: &AnalysisContext,
        annotated: &str,
        annotated_class: Option<&str>,
        annotation: &str,
        usage: UsageSite,
    ) {
        let Some(marker) = self.marker(annotation) else {
            return;
        };

        trace!("{} ({:?}) used at {}", annotated, marker, usage.location);
        context.annotation_usages.insert(AnnotationUsage {
            annotated: annotated.to_string(),
            annotated_class: annotated_class.map(String::from),
            marker,
            usage,
        });
    }
}
