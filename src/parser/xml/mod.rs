mod resource;

pub use resource::{ResourceDocument, ResourceParser, XmlElement};
