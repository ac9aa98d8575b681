//! Core types for the flattening engine

use std::fmt;

/// One of the two spatial dimensions, resolved independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Id of the synthetic root node standing for the container's origin
    pub fn root_id(&self) -> &'static str {
        match self {
            Axis::Horizontal => "root_x",
            Axis::Vertical => "root_y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// The relationship an anchor declares, independent of the axis.
///
/// "Near" is the left/top edge, "far" the right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Align near edges (left with left, top with top)
    Near,
    /// Align far edges (right with right, bottom with bottom)
    Far,
    /// Center within the target
    Center,
    /// Sit entirely on the near side of the target (left-of, above)
    Before,
    /// Sit entirely on the far side of the target (right-of, below)
    After,
    /// Share the target's text baseline (vertical only)
    Baseline,
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorKind::Near => write!(f, "align-near"),
            AnchorKind::Far => write!(f, "align-far"),
            AnchorKind::Center => write!(f, "center"),
            AnchorKind::Before => write!(f, "before"),
            AnchorKind::After => write!(f, "after"),
            AnchorKind::Baseline => write!(f, "baseline"),
        }
    }
}

/// What an anchor is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    /// The enclosing container
    Parent,
    /// Another element, by id
    Sibling(String),
}

impl AnchorTarget {
    pub fn sibling_id(&self) -> Option<&str> {
        match self {
            AnchorTarget::Parent => None,
            AnchorTarget::Sibling(id) => Some(id),
        }
    }
}

/// A single positioning declaration on one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorDecl {
    pub axis: Axis,
    pub kind: AnchorKind,
    pub target: AnchorTarget,
    pub margin: Option<i64>,
}

impl AnchorDecl {
    /// Anchor to the enclosing container
    pub fn parent(axis: Axis, kind: AnchorKind, margin: Option<i64>) -> Self {
        Self {
            axis,
            kind,
            target: AnchorTarget::Parent,
            margin,
        }
    }

    /// Anchor to another element
    pub fn sibling(
        axis: Axis,
        kind: AnchorKind,
        target: impl Into<String>,
        margin: Option<i64>,
    ) -> Self {
        Self {
            axis,
            kind,
            target: AnchorTarget::Sibling(target.into()),
            margin,
        }
    }

    /// Declared margin, 0 when absent
    pub fn margin(&self) -> i64 {
        self.margin.unwrap_or(0)
    }

    pub fn is_parent(&self) -> bool {
        self.target == AnchorTarget::Parent
    }
}

/// An element as the engine sees it: id, size on both axes, anchors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRecord {
    pub id: String,
    pub width: i64,
    pub height: i64,
    pub anchors: Vec<AnchorDecl>,
}

impl ElementRecord {
    pub fn new(id: impl Into<String>, width: i64, height: i64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            anchors: Vec::new(),
        }
    }

    /// Add an anchor declaration (builder style)
    pub fn with_anchor(mut self, anchor: AnchorDecl) -> Self {
        self.anchors.push(anchor);
        self
    }

    /// Declared extent on the given axis
    pub fn size(&self, axis: Axis) -> i64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// The parent-targeted anchor of this kind on the axis, if declared
    pub fn parent_anchor(&self, axis: Axis, kind: AnchorKind) -> Option<&AnchorDecl> {
        self.anchors
            .iter()
            .find(|a| a.axis == axis && a.kind == kind && a.is_parent())
    }

    /// The sibling-targeted anchor of this kind on the axis, if declared
    pub fn sibling_anchor(&self, axis: Axis, kind: AnchorKind) -> Option<&AnchorDecl> {
        self.anchors
            .iter()
            .find(|a| a.axis == axis && a.kind == kind && !a.is_parent())
    }
}

/// One element's resolved position on one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: String,
    /// Offset from the container's origin
    pub offset: i64,
    pub size: i64,
}

/// Output of one axis pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLayout {
    pub axis: Axis,
    pub placements: Vec<Placement>,
    /// Elements with no anchor on this axis, left out of `placements`
    pub anomalies: Vec<String>,
    /// Number of attachment passes the resolver needed
    pub passes: usize,
}

impl AxisLayout {
    /// Find the placement for an element id
    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_size_per_axis() {
        let rec = ElementRecord::new("a", 30, 12);
        assert_eq!(rec.size(Axis::Horizontal), 30);
        assert_eq!(rec.size(Axis::Vertical), 12);
    }

    #[test]
    fn test_anchor_lookup_respects_axis_and_target() {
        let rec = ElementRecord::new("a", 30, 12)
            .with_anchor(AnchorDecl::parent(Axis::Horizontal, AnchorKind::Near, Some(4)))
            .with_anchor(AnchorDecl::sibling(Axis::Vertical, AnchorKind::Near, "b", None));

        assert_eq!(
            rec.parent_anchor(Axis::Horizontal, AnchorKind::Near)
                .map(|a| a.margin()),
            Some(4)
        );
        assert!(rec.parent_anchor(Axis::Vertical, AnchorKind::Near).is_none());
        assert!(rec.sibling_anchor(Axis::Horizontal, AnchorKind::Near).is_none());
        assert_eq!(
            rec.sibling_anchor(Axis::Vertical, AnchorKind::Near)
                .and_then(|a| a.target.sibling_id()),
            Some("b")
        );
    }

    #[test]
    fn test_margin_defaults_to_zero() {
        let anchor = AnchorDecl::sibling(Axis::Horizontal, AnchorKind::After, "x", None);
        assert_eq!(anchor.margin(), 0);
    }

    #[test]
    fn test_root_ids() {
        assert_eq!(Axis::Horizontal.root_id(), "root_x");
        assert_eq!(Axis::Vertical.root_id(), "root_y");
    }
}
