//! Reading layout documents and turning them into element records

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use toml::Value;

use crate::error::DocumentError;
use crate::layout::{AnchorDecl, Axis, ElementRecord};

use super::attributes::{AnchorAttribute, ANCHOR_ATTRIBUTES, HEIGHT, ID, WIDTH};
use super::lexer::{parse_dimension, parse_flag, parse_reference, ValueError};
use super::model::{DocumentFormat, LayoutDocument, RawElement, RELATIVE_LAYOUT};

impl LayoutDocument {
    /// Load a layout document, XML or TOML depending on the file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, DocumentFormat::detect(path, &content))
    }

    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, DocumentError> {
        match format {
            DocumentFormat::Xml => Self::from_xml(content),
            DocumentFormat::Toml => Self::from_str(content),
        }
    }

    /// Load a layout document from a TOML string.
    ///
    /// Attribute names lose their `android:` prefix and the container kind
    /// is checked.
    pub fn from_str(content: &str) -> Result<Self, DocumentError> {
        let mut doc: LayoutDocument = toml::from_str(content)?;
        if doc.container != RELATIVE_LAYOUT {
            return Err(DocumentError::UnsupportedContainer {
                found: doc.container,
            });
        }
        for element in &mut doc.elements {
            element.normalize_names();
        }
        debug!(target: "relflat::document", "read {} elements", doc.elements.len());
        Ok(doc)
    }

    /// Convert every element into the engine's record form.
    ///
    /// Dimensions must carry `unit` as their suffix (or none at all).
    pub fn records(&self, unit: &str) -> Result<Vec<ElementRecord>, DocumentError> {
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(self.elements.len());

        for (index, element) in self.elements.iter().enumerate() {
            let record = ElementReader::new(element, index, unit).read()?;
            if !seen.insert(record.id.clone()) {
                return Err(DocumentError::DuplicateId { id: record.id });
            }
            records.push(record);
        }
        Ok(records)
    }
}

/// Reads one element, naming it in every error
struct ElementReader<'a> {
    element: &'a RawElement,
    name: String,
    unit: &'a str,
}

impl<'a> ElementReader<'a> {
    fn new(element: &'a RawElement, index: usize, unit: &'a str) -> Self {
        Self {
            element,
            name: format!("element #{}", index + 1),
            unit,
        }
    }

    fn read(mut self) -> Result<ElementRecord, DocumentError> {
        let id = match self.element.get(ID) {
            Some(value) => self.reference(ID, value)?,
            None => return Err(DocumentError::missing(&self.name, ID)),
        };
        self.name = format!("element '{}'", id);

        let width = self.size(WIDTH)?;
        let height = self.size(HEIGHT)?;
        let mut record = ElementRecord::new(id, width, height);

        for row in ANCHOR_ATTRIBUTES {
            if let Some(anchor) = self.anchor(row)? {
                record.anchors.push(anchor);
            }
        }
        Ok(record)
    }

    fn anchor(&self, row: &AnchorAttribute) -> Result<Option<AnchorDecl>, DocumentError> {
        let Some((name, value)) = row
            .names
            .iter()
            .find_map(|name| self.element.get(name).map(|v| (*name, v)))
        else {
            return Ok(None);
        };

        let anchor = if row.parent {
            if !self.flag(name, value)? {
                return Ok(None);
            }
            AnchorDecl::parent(row.axis, row.kind, self.margin(row.margins)?)
        } else {
            let target = self.reference(name, value)?;
            AnchorDecl::sibling(row.axis, row.kind, target, self.margin(row.margins)?)
        };
        Ok(Some(anchor))
    }

    fn margin(&self, names: &[&str]) -> Result<Option<i64>, DocumentError> {
        for name in names {
            if let Some(value) = self.element.get(name) {
                return self.dimension(name, value).map(Some);
            }
        }
        Ok(None)
    }

    fn size(&self, attribute: &str) -> Result<i64, DocumentError> {
        let value = self
            .element
            .get(attribute)
            .ok_or_else(|| DocumentError::missing(&self.name, attribute))?;
        let size = self.dimension(attribute, value)?;
        if size <= 0 {
            return Err(DocumentError::NonPositiveSize {
                element: self.name.clone(),
                attribute: attribute.to_string(),
                value: size,
            });
        }
        Ok(size)
    }

    fn dimension(&self, attribute: &str, value: &Value) -> Result<i64, DocumentError> {
        match value {
            Value::Integer(n) => Ok(*n),
            Value::String(s) => parse_dimension(s, self.unit).map_err(|e| match e {
                ValueError::Intrinsic(keyword) => DocumentError::UnsupportedSize {
                    element: self.name.clone(),
                    attribute: attribute.to_string(),
                    value: keyword,
                },
                other => self.invalid(attribute, value, other.to_string()),
            }),
            _ => Err(self.invalid(attribute, value, "expected a dimension")),
        }
    }

    fn reference(&self, attribute: &str, value: &Value) -> Result<String, DocumentError> {
        match value {
            Value::String(s) => {
                parse_reference(s).map_err(|e| self.invalid(attribute, value, e.to_string()))
            }
            _ => Err(self.invalid(attribute, value, "expected an element id")),
        }
    }

    fn flag(&self, attribute: &str, value: &Value) -> Result<bool, DocumentError> {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::String(s) => {
                parse_flag(s).map_err(|e| self.invalid(attribute, value, e.to_string()))
            }
            _ => Err(self.invalid(attribute, value, "expected true or false")),
        }
    }

    fn invalid(&self, attribute: &str, value: &Value, reason: impl Into<String>) -> DocumentError {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        DocumentError::invalid(&self.name, attribute, shown, reason)
    }
}

/// One-line summary of a record for debug logs
pub fn describe(record: &ElementRecord) -> String {
    format!(
        "{} ({}x{}, {} anchors: {})",
        record.id,
        record.size(Axis::Horizontal),
        record.size(Axis::Vertical),
        record.anchors.len(),
        record
            .anchors
            .iter()
            .map(|a| match a.target.sibling_id() {
                Some(target) => format!("{} {} of {}", a.axis, a.kind, target),
                None => format!("{} {} of parent", a.axis, a.kind),
            })
            .collect::<Vec<_>>()
            .join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AnchorKind;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
container = "RelativeLayout"

[[element]]
"android:id" = "@+id/title"
"android:layout_width" = "100dp"
"android:layout_height" = "20dp"
"android:layout_alignParentLeft" = "true"
"android:layout_alignParentTop" = true
"android:layout_marginTop" = 4

[[element]]
id = "@+id/icon"
layout_width = "20dp"
layout_height = 20
layout_toRightOf = "@id/title"
layout_marginLeft = "5dp"
layout_alignBaseline = "@id/title"
"#;

    #[test]
    fn test_reads_records() {
        let doc = LayoutDocument::from_str(SOURCE).unwrap();
        let records = doc.records("dp").unwrap();

        assert_eq!(
            records,
            vec![
                ElementRecord::new("title", 100, 20)
                    .with_anchor(AnchorDecl::parent(Axis::Horizontal, AnchorKind::Near, None))
                    .with_anchor(AnchorDecl::parent(Axis::Vertical, AnchorKind::Near, Some(4))),
                ElementRecord::new("icon", 20, 20)
                    .with_anchor(AnchorDecl::sibling(
                        Axis::Horizontal,
                        AnchorKind::After,
                        "title",
                        Some(5)
                    ))
                    .with_anchor(AnchorDecl::sibling(
                        Axis::Vertical,
                        AnchorKind::Baseline,
                        "title",
                        None
                    )),
            ]
        );
    }

    #[test]
    fn test_rejects_other_containers() {
        let err = LayoutDocument::from_str(r#"container = "LinearLayout""#).unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedContainer { .. }));
    }

    #[test]
    fn test_false_flag_is_absent() {
        let doc = LayoutDocument::new(vec![RawElement::new()
            .with(ID, "a")
            .with(WIDTH, 10)
            .with(HEIGHT, 10)
            .with("layout_alignParentLeft", false)]);
        let records = doc.records("dp").unwrap();
        assert!(records[0].anchors.is_empty());
    }

    #[test]
    fn test_uniform_margin_wins() {
        let doc = LayoutDocument::new(vec![RawElement::new()
            .with(ID, "a")
            .with(WIDTH, 10)
            .with(HEIGHT, 10)
            .with("layout_alignParentLeft", "true")
            .with("layout_marginLeft", "3dp")
            .with("layout_margin", "8dp")]);
        let records = doc.records("dp").unwrap();
        assert_eq!(records[0].anchors[0].margin, Some(8));
    }

    #[test]
    fn test_missing_id() {
        let doc = LayoutDocument::new(vec![RawElement::new().with(WIDTH, 10)]);
        let err = doc.records("dp").unwrap_err();
        assert_eq!(
            err.to_string(),
            "element #1 is missing required attribute 'id'"
        );
    }

    #[test]
    fn test_intrinsic_size_rejected() {
        let doc = LayoutDocument::new(vec![RawElement::new()
            .with(ID, "a")
            .with(WIDTH, "wrap_content")
            .with(HEIGHT, 10)]);
        let err = doc.records("dp").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedSize { .. }));
    }

    #[test]
    fn test_non_positive_size_rejected() {
        let doc = LayoutDocument::new(vec![RawElement::new()
            .with(ID, "a")
            .with(WIDTH, "0dp")
            .with(HEIGHT, 10)]);
        let err = doc.records("dp").unwrap_err();
        assert!(matches!(err, DocumentError::NonPositiveSize { value: 0, .. }));
    }

    #[test]
    fn test_wrong_unit_names_element() {
        let doc = LayoutDocument::new(vec![RawElement::new()
            .with(ID, "a")
            .with(WIDTH, "10px")
            .with(HEIGHT, 10)]);
        let err = doc.records("dp").unwrap_err();
        assert_eq!(
            err.to_string(),
            "element 'a' has invalid layout_width '10px': expected unit 'dp', found 'px'"
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let element = RawElement::new().with(ID, "a").with(WIDTH, 1).with(HEIGHT, 1);
        let doc = LayoutDocument::new(vec![element.clone(), element]);
        let err = doc.records("dp").unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { .. }));
    }

    #[test]
    fn test_describe() {
        let record = ElementRecord::new("b", 20, 10).with_anchor(AnchorDecl::sibling(
            Axis::Horizontal,
            AnchorKind::After,
            "a",
            None,
        ));
        assert_eq!(
            describe(&record),
            "b (20x10, 1 anchors: horizontal after of a)"
        );
    }
}
