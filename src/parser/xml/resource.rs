use crate::discovery::ResourceFolder;
use crate::graph::Location;
use miette::{miette, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An element of a resource XML tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name as written (`fragment`, `androidx.fragment.app.FragmentContainerView`)
    pub tag: String,

    /// Attributes by qualified name (`android:name`, `app:navGraph`), unescaped
    pub attributes: Vec<(String, String)>,

    /// From the opening `<` to the end of the start tag
    pub location: Location,
}

impl XmlElement {
    /// Value of the attribute with the given qualified name
    pub fn attribute(&self, qualified_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == qualified_name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed resource file: every element in document order
#[derive(Debug, Clone)]
pub struct ResourceDocument {
    pub path: PathBuf,
    pub folder: ResourceFolder,
    pub elements: Vec<XmlElement>,
}

impl ResourceDocument {
    /// File name without extension, the name `R.<folder>.<name>` refers to
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Parser for Android resource XML files
pub struct ResourceParser;

impl ResourceParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a resource file into its elements.
    /// Malformed XML is an error; the elements read before it are discarded.
    pub fn parse(&self, path: &Path, folder: ResourceFolder, contents: &str) -> Result<ResourceDocument> {
        let lines = LineIndex::new(contents);
        let mut reader = Reader::from_str(contents);

        let mut elements = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    // Attribute values cannot hold a raw `<`, so the last one
                    // before the reader position opens this tag
                    let end = reader.buffer_position();
                    let start = contents[..end].rfind('<').unwrap_or(0);
                    elements.push(self.element(path, e, start..end, &lines));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(miette!(
                        "Malformed XML in {} at byte {}: {}",
                        path.display(),
                        reader.buffer_position(),
                        e
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        debug!("Parsed {} resource {}: {} elements", folder, path.display(), elements.len());

        Ok(ResourceDocument {
            path: path.to_path_buf(),
            folder,
            elements,
        })
    }

    fn element(&self, path: &Path, start: &BytesStart, span: Range<usize>, lines: &LineIndex) -> XmlElement {
        let tag = String::from_utf8_lossy(start.name().as_ref()).to_string();

        let attributes = start
            .attributes()
            .filter_map(|a| a.ok())
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                let value = attr
                    .unescape_value()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
                (key, value)
            })
            .collect();

        let (line, column) = lines.position(span.start);

        XmlElement {
            tag,
            attributes,
            location: Location::new(path.to_path_buf(), line, column, span.start, span.end),
        }
    }
}

impl Default for ResourceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset to 1-based line and column
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(contents: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(contents.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.starts[line] + 1)
    }
}
