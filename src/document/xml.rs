//! Android layout XML
//!
//! The root must be a `RelativeLayout`; its direct children are the
//! elements. Attributes bound to the Android namespace become element
//! attributes under their local name, whatever prefix the file uses.
//! Everything else (other namespaces, unprefixed attributes, nested
//! markup) is kept in [`Markup`](super::model::Markup) and written back
//! unchanged.

use std::borrow::Cow;
use std::fmt::Display;

use log::debug;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use toml::Value;

use crate::error::DocumentError;

use super::model::{LayoutDocument, RawElement, RELATIVE_LAYOUT};

pub const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";
const ANDROID_PREFIX: &str = "android";
const XMLNS_ANDROID: &str = "xmlns:android";
/// Tag for elements that never had one
const DEFAULT_TAG: &str = "View";

impl LayoutDocument {
    /// Load a layout document from Android layout XML
    pub fn from_xml(source: &str) -> Result<Self, DocumentError> {
        let doc = XmlLayoutReader::new(source).read()?;
        debug!(target: "relflat::document", "read {} elements from XML", doc.elements.len());
        Ok(doc)
    }

    /// Render the document as Android layout XML
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        let mut writer = XmlLayoutWriter::new();
        writer.document(self)?;
        writer.finish()
    }
}

struct XmlLayoutReader<'i> {
    reader: NsReader<&'i [u8]>,
}

impl<'i> XmlLayoutReader<'i> {
    fn new(source: &'i str) -> Self {
        let mut reader = NsReader::from_str(source);
        reader.config_mut().trim_text(true);
        Self { reader }
    }

    fn read(mut self) -> Result<LayoutDocument, DocumentError> {
        let (root, empty) = loop {
            match self.next()? {
                Event::Start(e) => break (e, false),
                Event::Empty(e) => break (e, true),
                Event::Eof => return Err(self.error("no root element")),
                _ => {}
            }
        };

        if root.local_name().as_ref() != RELATIVE_LAYOUT.as_bytes() {
            return Err(DocumentError::UnsupportedContainer {
                found: text(root.name().as_ref()),
            });
        }

        let mut doc = LayoutDocument::new(Vec::new());
        for attr in root.attributes() {
            let attr = attr.map_err(|e| self.error(e))?;
            let value = attr.unescape_value().map_err(|e| self.error(e))?;
            doc.root_attributes
                .push((text(attr.key.as_ref()), value.into_owned()));
        }
        if empty {
            return Ok(doc);
        }

        loop {
            match self.next()? {
                Event::Start(e) => {
                    let mut element = self.element(&e)?;
                    let body = self
                        .reader
                        .read_text(e.name())
                        .map_err(|err| self.error(err))?;
                    if !body.trim().is_empty() {
                        element.markup.body = Some(body.into_owned());
                    }
                    doc.elements.push(element);
                }
                Event::Empty(e) => {
                    let element = self.element(&e)?;
                    doc.elements.push(element);
                }
                Event::End(_) => break,
                Event::Eof => return Err(self.error("RelativeLayout is never closed")),
                _ => {}
            }
        }
        Ok(doc)
    }

    fn next(&mut self) -> Result<Event<'i>, DocumentError> {
        self.reader.read_event().map_err(|e| self.error(e))
    }

    fn element(&self, start: &BytesStart<'i>) -> Result<RawElement, DocumentError> {
        let mut element = RawElement::new();
        element.markup.tag = Some(text(start.name().as_ref()));

        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.error(e))?;
            let value = attr.unescape_value().map_err(|e| self.error(e))?.into_owned();
            match self.android_name(attr.key) {
                Some(local) => element.set(&local, value),
                None => element.markup.foreign.push((text(attr.key.as_ref()), value)),
            }
        }
        Ok(element)
    }

    /// Local name of `key` if it belongs to the Android namespace.
    ///
    /// An undeclared `android:` prefix also counts as the Android namespace.
    fn android_name(&self, key: QName<'_>) -> Option<String> {
        let (namespace, local) = self.reader.resolve_attribute(key);
        let android = match namespace {
            ResolveResult::Bound(Namespace(uri)) => uri == ANDROID_NS.as_bytes(),
            ResolveResult::Unknown(prefix) => prefix == ANDROID_PREFIX.as_bytes(),
            _ => false,
        };
        android.then(|| text(local.as_ref()))
    }

    fn error(&self, e: impl Display) -> DocumentError {
        DocumentError::Xml {
            message: e.to_string(),
            position: self.reader.buffer_position() as usize,
        }
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

struct XmlLayoutWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlLayoutWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 4),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), DocumentError> {
        self.writer
            .write_event(event)
            .map_err(|e| DocumentError::XmlWrite(e.to_string()))
    }

    fn document(&mut self, doc: &LayoutDocument) -> Result<(), DocumentError> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new(doc.container.as_str());
        if !doc.root_attributes.iter().any(|(name, _)| name == XMLNS_ANDROID) {
            root.push_attribute((XMLNS_ANDROID, ANDROID_NS));
        }
        for (name, value) in &doc.root_attributes {
            root.push_attribute((name.as_str(), value.as_str()));
        }

        if doc.elements.is_empty() {
            return self.emit(Event::Empty(root));
        }
        let end = root.to_end().into_owned();
        self.emit(Event::Start(root))?;
        for element in &doc.elements {
            self.element(element)?;
        }
        self.emit(Event::End(end))
    }

    fn element(&mut self, element: &RawElement) -> Result<(), DocumentError> {
        let tag = element.markup.tag.as_deref().unwrap_or(DEFAULT_TAG);
        let mut start = BytesStart::new(tag);
        for (name, value) in &element.attributes {
            let name = if name.contains(':') {
                Cow::Borrowed(name.as_str())
            } else {
                Cow::Owned(format!("{}:{}", ANDROID_PREFIX, name))
            };
            let value = attribute_text(value);
            start.push_attribute((&*name, &*value));
        }
        for (name, value) in &element.markup.foreign {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        match element.markup.body.as_deref() {
            Some(body) => {
                let end = start.to_end().into_owned();
                self.emit(Event::Start(start))?;
                self.emit(Event::Text(BytesText::from_escaped(body)))?;
                self.emit(Event::End(end))
            }
            None => self.emit(Event::Empty(start)),
        }
    }

    fn finish(self) -> Result<String, DocumentError> {
        let mut out = String::from_utf8(self.writer.into_inner())
            .map_err(|e| DocumentError::XmlWrite(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}

/// XML attributes are text; integers and flags from TOML are stringified
fn attribute_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LAYOUT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- profile row -->
<RelativeLayout xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:tools="http://schemas.android.com/tools"
    android:layout_width="match_parent"
    android:layout_height="match_parent">

    <ImageView
        android:id="@+id/avatar"
        android:layout_width="40dp"
        android:layout_height="40dp"
        android:layout_alignParentLeft="true"
        android:layout_alignParentTop="true"
        tools:src="@drawable/sample" />

    <EditText
        android:id="@+id/name"
        android:layout_width="120dp"
        android:layout_height="20dp"
        android:layout_toRightOf="@id/avatar"
        android:layout_alignTop="@id/avatar"
        style="@style/Name">
        <requestFocus />
    </EditText>
</RelativeLayout>
"#;

    fn attribute<'a>(doc: &'a LayoutDocument, id: &str, name: &str) -> Option<&'a str> {
        doc.element(id)?.get(name)?.as_str()
    }

    #[test]
    fn test_read_layout() {
        let doc = LayoutDocument::from_xml(LAYOUT).unwrap();

        assert_eq!(doc.container, RELATIVE_LAYOUT);
        assert_eq!(doc.elements.len(), 2);
        assert_eq!(attribute(&doc, "avatar", "layout_width"), Some("40dp"));
        assert_eq!(attribute(&doc, "name", "layout_toRightOf"), Some("@id/avatar"));
        assert_eq!(
            doc.root_attributes[0],
            (XMLNS_ANDROID.to_string(), ANDROID_NS.to_string())
        );
    }

    #[test]
    fn test_foreign_markup_is_kept_aside() {
        let doc = LayoutDocument::from_xml(LAYOUT).unwrap();
        let avatar = doc.element("avatar").unwrap();
        let name = doc.element("name").unwrap();

        assert_eq!(avatar.markup.tag.as_deref(), Some("ImageView"));
        assert_eq!(
            avatar.markup.foreign,
            vec![("tools:src".to_string(), "@drawable/sample".to_string())]
        );
        assert!(!avatar.has("src"));
        assert_eq!(
            name.markup.foreign,
            vec![("style".to_string(), "@style/Name".to_string())]
        );
        assert_eq!(name.markup.body.as_deref().map(str::trim), Some("<requestFocus />"));
    }

    #[test]
    fn test_namespace_is_matched_by_uri() {
        let source = r#"<RelativeLayout xmlns:a="http://schemas.android.com/apk/res/android"
                xmlns:android="http://example.com/not-android">
            <View a:id="@+id/v" a:layout_width="4dp" android:layout_height="9dp" />
        </RelativeLayout>"#;
        let doc = LayoutDocument::from_xml(source).unwrap();
        let view = &doc.elements[0];

        assert_eq!(view.get("layout_width").and_then(|v| v.as_str()), Some("4dp"));
        assert!(!view.has("layout_height"));
        assert_eq!(
            view.markup.foreign,
            vec![("android:layout_height".to_string(), "9dp".to_string())]
        );
    }

    #[test]
    fn test_undeclared_android_prefix_is_accepted() {
        let source = r#"<RelativeLayout><View android:id="@+id/v" /></RelativeLayout>"#;
        let doc = LayoutDocument::from_xml(source).unwrap();
        assert_eq!(doc.elements[0].id().as_deref(), Some("v"));
    }

    #[test]
    fn test_other_root_is_rejected() {
        let source = r#"<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android" />"#;
        let err = LayoutDocument::from_xml(source).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::UnsupportedContainer { ref found } if found == "LinearLayout"
        ));
    }

    #[test]
    fn test_malformed_xml_has_position() {
        let source = "<RelativeLayout>\n    <View>\n</RelativeLayout>\n";
        let err = LayoutDocument::from_xml(source).unwrap_err();
        assert!(matches!(err, DocumentError::Xml { .. }));
        assert!(err.span().is_some());
    }

    #[test]
    fn test_unclosed_root_is_an_error() {
        let err = LayoutDocument::from_xml("<RelativeLayout><View/>").unwrap_err();
        assert!(matches!(err, DocumentError::Xml { .. }));
    }

    #[test]
    fn test_written_xml_reads_back() {
        let doc = LayoutDocument::from_xml(LAYOUT).unwrap();
        let written = doc.to_xml().unwrap();

        assert!(written.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(written.contains(r#"android:layout_alignTop="@id/avatar""#));
        assert!(written.contains(r#"tools:src="@drawable/sample""#));
        assert_eq!(LayoutDocument::from_xml(&written).unwrap(), doc);
    }

    #[test]
    fn test_namespace_declared_when_missing() {
        let doc = LayoutDocument::new(vec![RawElement::new()
            .with("id", "@+id/a")
            .with("layout_marginLeft", 12)
            .with("layout_alignParentLeft", true)]);
        let written = doc.to_xml().unwrap();

        assert!(written.contains(r#"xmlns:android="http://schemas.android.com/apk/res/android""#));
        assert!(written.contains(r#"<View android:id="@+id/a""#));
        assert!(written.contains(r#"android:layout_marginLeft="12""#));
        assert!(written.contains(r#"android:layout_alignParentLeft="true""#));
    }
}
