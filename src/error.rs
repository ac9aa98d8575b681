//! Error types for reading and writing layout documents

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to access layout document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout document: {}", .0.message())]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize layout document: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to parse layout XML: {message}")]
    Xml { message: String, position: usize },

    #[error("failed to write layout XML: {0}")]
    XmlWrite(String),

    #[error("container must be RelativeLayout, found '{found}'")]
    UnsupportedContainer { found: String },

    #[error("{element} is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("{element} has invalid {attribute} '{value}': {reason}")]
    InvalidValue {
        element: String,
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("{element} uses intrinsic size '{value}' for {attribute}; only explicit sizes are supported")]
    UnsupportedSize {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("{element} has non-positive {attribute} {value}")]
    NonPositiveSize {
        element: String,
        attribute: String,
        value: i64,
    },

    #[error("duplicate element id '{id}'")]
    DuplicateId { id: String },
}

impl DocumentError {
    /// Create an invalid value error
    pub fn invalid(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing attribute error
    pub fn missing(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Toml(e) => e.span(),
            Self::Xml { position, .. } => Some(*position..*position + 1),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne.
    ///
    /// Errors without a span fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("Error: {}", self);
        };
        // XML positions can point at the end of input
        let end = span.end.min(source.len());
        let span = span.start.min(end.saturating_sub(1))..end;

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Error: {}", self),
        }
    }
}
