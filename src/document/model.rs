//! Layout document types

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use toml::Value;

use super::attributes::{self, ID};
use super::lexer::parse_reference;

/// The only container kind the engine understands
pub const RELATIVE_LAYOUT: &str = "RelativeLayout";

/// On-disk representation of a layout document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Android layout XML
    Xml,
    /// `container` key plus `[[element]]` tables
    Toml,
}

impl DocumentFormat {
    /// Format named by a file extension, if it names one
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "xml" => Some(Self::Xml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Guess from content: markup starts with `<`
    pub fn sniff(source: &str) -> Self {
        if source.trim_start().starts_with('<') {
            Self::Xml
        } else {
            Self::Toml
        }
    }

    /// Extension first, content otherwise
    pub fn detect(path: &Path, source: &str) -> Self {
        Self::from_path(path).unwrap_or_else(|| Self::sniff(source))
    }
}

/// A container and its child elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub container: String,
    #[serde(rename = "element", default)]
    pub elements: Vec<RawElement>,
    /// Attributes of the XML root (namespace declarations included), kept
    /// verbatim
    #[serde(skip)]
    pub root_attributes: Vec<(String, String)>,
}

impl LayoutDocument {
    pub fn new(elements: Vec<RawElement>) -> Self {
        Self {
            container: RELATIVE_LAYOUT.to_string(),
            elements,
            root_attributes: Vec::new(),
        }
    }

    /// Find an element by its (normalized) id
    pub fn element(&self, id: &str) -> Option<&RawElement> {
        self.elements
            .iter()
            .find(|e| e.id().as_deref() == Some(id))
    }
}

/// One element's attributes, keyed by local attribute name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawElement {
    pub attributes: BTreeMap<String, Value>,
    #[serde(skip)]
    pub markup: Markup,
}

/// XML details of an element that the engine never looks at
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Markup {
    /// Element tag, e.g. `TextView`
    pub tag: Option<String>,
    /// Attributes outside the Android namespace, in document order
    pub foreign: Vec<(String, String)>,
    /// Raw inner markup of the element, if it has any
    pub body: Option<String>,
}

impl RawElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute (builder style)
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The element id without its `@+id/` prefix, if it parses
    pub fn id(&self) -> Option<String> {
        match self.get(ID)? {
            Value::String(s) => parse_reference(s).ok(),
            _ => None,
        }
    }

    /// Drop namespace prefixes from every attribute name.
    ///
    /// An unprefixed attribute wins over a prefixed one with the same name.
    pub(crate) fn normalize_names(&mut self) {
        let prefixed: Vec<String> = self
            .attributes
            .keys()
            .filter(|k| attributes::local_name(k) != k.as_str())
            .cloned()
            .collect();
        for key in prefixed {
            if let Some(value) = self.attributes.remove(&key) {
                let local = attributes::local_name(&key).to_string();
                self.attributes.entry(local).or_insert(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_strips_prefix() {
        let element = RawElement::new().with(ID, "@+id/title");
        assert_eq!(element.id(), Some("title".to_string()));
    }

    #[test]
    fn test_non_string_id_is_ignored() {
        let element = RawElement::new().with(ID, 4);
        assert_eq!(element.id(), None);
    }

    #[test]
    fn test_normalize_names() {
        let mut element = RawElement::new()
            .with("android:layout_width", "10dp")
            .with("android:layout_height", "5dp")
            .with("layout_height", "7dp");
        element.normalize_names();

        assert_eq!(element.get("layout_width"), Some(&Value::from("10dp")));
        assert_eq!(element.get("layout_height"), Some(&Value::from("7dp")));
        assert_eq!(element.attributes.len(), 2);
    }

    #[test]
    fn test_find_element_by_id() {
        let doc = LayoutDocument::new(vec![
            RawElement::new().with(ID, "@+id/a"),
            RawElement::new().with(ID, "b"),
        ]);
        assert!(doc.element("b").is_some());
        assert!(doc.element("c").is_none());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("res/main.xml")),
            Some(DocumentFormat::Xml)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("main")), None);
        assert_eq!(
            DocumentFormat::detect(Path::new("main"), "  <RelativeLayout/>"),
            DocumentFormat::Xml
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("main.toml"), "<oops"),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::sniff("container = \"RelativeLayout\""),
            DocumentFormat::Toml
        );
    }
}
