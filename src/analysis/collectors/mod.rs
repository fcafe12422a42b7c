//! Collection callbacks. Each collector appends to its own fact set of the
//! run's `AnalysisContext` and never reads another collector's facts.

mod annotation_usage;
mod factory_call;
mod resource_reference;
mod resource_tree;

pub use annotation_usage::AnnotationUsageCollector;
pub use factory_call::FactoryCallCollector;
pub use resource_reference::ResourceReferenceCollector;
pub use resource_tree::ResourceTreeCollector;
