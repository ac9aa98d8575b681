//! Error types for the flattening engine

use thiserror::Error;

use super::types::{AnchorKind, Axis};

/// Fatal errors that abort one axis pipeline
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// Top-level element anchored to the container's far edge or center
    #[error(
        "element '{element}' uses {anchor} on its parent ({axis}) without a near-edge anchor; \
         the container's extent cannot be inferred"
    )]
    UnsupportedAnchor {
        element: String,
        anchor: AnchorKind,
        axis: Axis,
    },

    /// Sandwich between two different elements
    #[error("element '{element}' is sandwiched between two distinct elements '{first}' and '{second}'")]
    ConflictingAnchor {
        element: String,
        first: String,
        second: String,
    },

    /// A pass made no progress: references that can never resolve
    #[error(
        "unresolved reference from '{element}' to '{target}' ({axis}); stalled: {}",
        format_stalled(.stalled)
    )]
    UnresolvedReference {
        element: String,
        target: String,
        axis: Axis,
        stalled: Vec<(String, String)>,
    },

    /// The same id was attached twice to one tree
    #[error("duplicate element id '{element}' ({axis})")]
    DuplicateElement { element: String, axis: Axis },

    /// Scale factor was negative or not a finite number
    #[error("invalid scale factor {factor}: must be a finite, non-negative number")]
    InvalidScale { factor: f64 },

    /// An offset left the `i64` range
    #[error("offset of element '{element}' overflows on the {axis} axis")]
    OffsetOverflow { element: String, axis: Axis },

    /// A derived size came out zero or negative
    #[error("element '{element}' would get non-positive size {size} ({axis})")]
    NonPositiveSize {
        element: String,
        axis: Axis,
        size: i64,
    },
}

fn format_stalled(stalled: &[(String, String)]) -> String {
    stalled
        .iter()
        .map(|(element, target)| format!("{} -> {}", element, target))
        .collect::<Vec<_>>()
        .join(", ")
}

impl LayoutError {
    /// Create an offset overflow error
    pub fn overflow(element: impl Into<String>, axis: Axis) -> Self {
        Self::OffsetOverflow {
            element: element.into(),
            axis,
        }
    }

    /// Create an unsupported anchor error
    pub fn unsupported(element: impl Into<String>, anchor: AnchorKind, axis: Axis) -> Self {
        Self::UnsupportedAnchor {
            element: element.into(),
            anchor,
            axis,
        }
    }

    /// Create a conflicting sandwich error
    pub fn conflicting(
        element: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::ConflictingAnchor {
            element: element.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a stall error from every `(element, target)` pair left in the pass.
    ///
    /// The first pair names the error; `stalled` must not be empty.
    pub fn unresolved(axis: Axis, stalled: Vec<(String, String)>) -> Self {
        let (element, target) = stalled.first().cloned().unwrap_or_default();
        Self::UnresolvedReference {
            element,
            target,
            axis,
            stalled,
        }
    }

    /// The id of the element the error is about, if any
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::UnsupportedAnchor { element, .. }
            | Self::ConflictingAnchor { element, .. }
            | Self::UnresolvedReference { element, .. }
            | Self::DuplicateElement { element, .. }
            | Self::OffsetOverflow { element, .. }
            | Self::NonPositiveSize { element, .. } => Some(element),
            Self::InvalidScale { .. } => None,
        }
    }
}
