use crate::analysis::context::AnalysisContext;
use crate::analysis::facts::{ResourceKind, ResourceNode};
use crate::analysis::AnalysisError;
use crate::discovery::ResourceFolder;
use crate::parser::xml::{ResourceDocument, XmlElement};

const TAG_FRAGMENT: &str = "fragment";
const TAG_FRAGMENT_CONTAINER_VIEW: &str = "androidx.fragment.app.FragmentContainerView";
const ATTR_NAME: &str = "android:name";
const ATTR_NAV_GRAPH: &str = "app:navGraph";

/// Records every element of layout and navigation resources
pub struct ResourceTreeCollector;

impl ResourceTreeCollector {
    pub fn new() -> Self {
        Self
    }

    /// The resource folders elements may be visited for
    pub fn applies_to(&self, folder: ResourceFolder) -> bool {
        matches!(folder, ResourceFolder::Layout | ResourceFolder::Navigation)
    }

    pub fn visit_element(
        &self,
        context: &AnalysisContext,
        document: &ResourceDocument,
        element: &XmlElement,
    ) -> Result<(), AnalysisError> {
        let kind = match document.folder {
            ResourceFolder::Layout => ResourceKind::Layout,
            ResourceFolder::Navigation => ResourceKind::Navigation,
            folder => {
                return Err(AnalysisError::UnsupportedResourceFolder {
                    folder: folder.to_string(),
                    file: document.path.clone(),
                })
            }
        };

        let node = ResourceNode {
            file: document.path.clone(),
            base_name: document.base_name(),
            kind,
            tag: element.tag.clone(),
            presentable_name: presentable_name(element),
            nav_graph: nav_graph(element),
            location: element.location.clone(),
        };
        context.resource_nodes(kind).insert(node);

        Ok(())
    }
}

impl Default for ResourceTreeCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Fragment hosts are named by the class they inflate
fn presentable_name(element: &XmlElement) -> String {
    match element.tag.as_str() {
        TAG_FRAGMENT | TAG_FRAGMENT_CONTAINER_VIEW => {
            element.attribute(ATTR_NAME).unwrap_or_default().to_string()
        }
        tag => tag.to_string(),
    }
}

fn nav_graph(element: &XmlElement) -> Option<String> {
    let value = element.attribute(ATTR_NAV_GRAPH)?.replace("@navigation/", "");
    (!value.trim().is_empty()).then_some(value)
}
