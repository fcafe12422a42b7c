use crate::analysis::context::AnalysisContext;
use crate::analysis::facts::{ReferenceOrigin, ResourceKind, ResourceReference, UsageSite};
use crate::analysis::naming::binding_layout_name;
use crate::analysis::SourceQuery;
use crate::graph::framework::CLASS_VIEW_BINDING;
use std::path::Path;
use tracing::trace;

/// Records which class refers to which layout or navigation resource, either
/// through a generated binding class or through `R.layout`/`R.navigation`
pub struct ResourceReferenceCollector;

impl ResourceReferenceCollector {
    pub fn new() -> Self {
        Self
    }

    /// A reference written as `type_name` in `from`. Only binding classes
    /// are recorded, under the layout name they were generated for.
    pub fn visit_binding_reference(
        &self,
        context: &AnalysisContext,
        query: &dyn SourceQuery,
        type_name: &str,
        from: &Path,
        usage: UsageSite,
    ) {
        let Some(class) = query.resolve_class(type_name, from) else {
            return;
        };
        if !query.extends_class(&class, CLASS_VIEW_BINDING) {
            return;
        }

        let simple_name = class.rsplit('.').next().unwrap_or(&class);
        let base_name = binding_layout_name(simple_name);
        trace!("{} refers to layout {}", class, base_name);

        context.resource_references.insert(ResourceReference {
            host: usage.host,
            base_name,
            kind: ResourceKind::Layout,
            origin: ReferenceOrigin::Binding,
            location: usage.location,
        });
    }

    /// A resource identifier `R.<resource_type>.<name>`
    pub fn visit_resource_reference(
        &self,
        context: &AnalysisContext,
        resource_type: &str,
        name: &str,
        usage: UsageSite,
    ) {
        let Some(kind) = ResourceKind::from_resource_type(resource_type) else {
            return;
        };

        context.resource_references.insert(ResourceReference {
            host: usage.host,
            base_name: name.to_string(),
            kind,
            origin: ReferenceOrigin::Direct,
            location: usage.location,
        });
    }
}

impl Default for ResourceReferenceCollector {
    fn default() -> Self {
        Self::new()
    }
}
