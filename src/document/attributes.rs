//! Mapping between RelativeLayout attribute names and anchor declarations

use crate::layout::{AnchorKind, Axis};

/// Namespace prefix accepted (and dropped) on attribute names
pub const NAMESPACE_PREFIX: &str = "android:";

pub const ID: &str = "id";
pub const WIDTH: &str = "layout_width";
pub const HEIGHT: &str = "layout_height";

pub const ALIGN_PARENT_LEFT: &str = "layout_alignParentLeft";
pub const ALIGN_PARENT_START: &str = "layout_alignParentStart";
pub const ALIGN_PARENT_TOP: &str = "layout_alignParentTop";
pub const CENTER_IN_PARENT: &str = "layout_centerInParent";
pub const MARGIN: &str = "layout_margin";
pub const MARGIN_LEFT: &str = "layout_marginLeft";
pub const MARGIN_START: &str = "layout_marginStart";
pub const MARGIN_TOP: &str = "layout_marginTop";
pub const MARGIN_RIGHT: &str = "layout_marginRight";
pub const MARGIN_BOTTOM: &str = "layout_marginBottom";

const NEAR_MARGINS_H: &[&str] = &[MARGIN, MARGIN_LEFT, MARGIN_START];
const FAR_MARGINS_H: &[&str] = &[MARGIN, MARGIN_RIGHT, "layout_marginEnd"];
const NEAR_MARGINS_V: &[&str] = &[MARGIN, MARGIN_TOP];
const FAR_MARGINS_V: &[&str] = &[MARGIN, MARGIN_BOTTOM];

/// One row of the mapping: which attribute declares which anchor, and
/// where its margin comes from
#[derive(Debug, Clone, Copy)]
pub struct AnchorAttribute {
    /// Attribute names, the first one present is used
    pub names: &'static [&'static str],
    pub axis: Axis,
    pub kind: AnchorKind,
    /// Parent anchors are flags; sibling anchors name an element
    pub parent: bool,
    /// Margin attributes, the first one present is used
    pub margins: &'static [&'static str],
}

const fn row(
    names: &'static [&'static str],
    axis: Axis,
    kind: AnchorKind,
    parent: bool,
    margins: &'static [&'static str],
) -> AnchorAttribute {
    AnchorAttribute {
        names,
        axis,
        kind,
        parent,
        margins,
    }
}

pub const ANCHOR_ATTRIBUTES: &[AnchorAttribute] = &[
    // Horizontal
    row(
        &[ALIGN_PARENT_LEFT, ALIGN_PARENT_START],
        Axis::Horizontal,
        AnchorKind::Near,
        true,
        NEAR_MARGINS_H,
    ),
    row(
        &["layout_alignParentRight", "layout_alignParentEnd"],
        Axis::Horizontal,
        AnchorKind::Far,
        true,
        FAR_MARGINS_H,
    ),
    row(
        &["layout_centerHorizontal", CENTER_IN_PARENT],
        Axis::Horizontal,
        AnchorKind::Center,
        true,
        &[],
    ),
    row(
        &["layout_alignLeft", "layout_alignStart"],
        Axis::Horizontal,
        AnchorKind::Near,
        false,
        NEAR_MARGINS_H,
    ),
    row(
        &["layout_alignRight", "layout_alignEnd"],
        Axis::Horizontal,
        AnchorKind::Far,
        false,
        FAR_MARGINS_H,
    ),
    row(
        &["layout_toLeftOf", "layout_toStartOf"],
        Axis::Horizontal,
        AnchorKind::Before,
        false,
        FAR_MARGINS_H,
    ),
    row(
        &["layout_toRightOf", "layout_toEndOf"],
        Axis::Horizontal,
        AnchorKind::After,
        false,
        NEAR_MARGINS_H,
    ),
    // Vertical
    row(
        &[ALIGN_PARENT_TOP],
        Axis::Vertical,
        AnchorKind::Near,
        true,
        NEAR_MARGINS_V,
    ),
    row(
        &["layout_alignParentBottom"],
        Axis::Vertical,
        AnchorKind::Far,
        true,
        FAR_MARGINS_V,
    ),
    row(
        &["layout_centerVertical", CENTER_IN_PARENT],
        Axis::Vertical,
        AnchorKind::Center,
        true,
        &[],
    ),
    row(
        &["layout_alignTop"],
        Axis::Vertical,
        AnchorKind::Near,
        false,
        NEAR_MARGINS_V,
    ),
    row(
        &["layout_alignBottom"],
        Axis::Vertical,
        AnchorKind::Far,
        false,
        FAR_MARGINS_V,
    ),
    row(
        &["layout_alignBaseline"],
        Axis::Vertical,
        AnchorKind::Baseline,
        false,
        FAR_MARGINS_V,
    ),
    row(
        &["layout_above"],
        Axis::Vertical,
        AnchorKind::Before,
        false,
        FAR_MARGINS_V,
    ),
    row(
        &["layout_below"],
        Axis::Vertical,
        AnchorKind::After,
        false,
        NEAR_MARGINS_V,
    ),
];

/// Relative attributes that lose their meaning once an axis is absolute.
///
/// `layout_centerInParent` spans both axes and is only dropped once both
/// have been applied.
pub fn stripped_on_apply(axis: Axis) -> &'static [&'static str] {
    match axis {
        Axis::Horizontal => &[
            "layout_alignParentRight",
            "layout_alignParentEnd",
            "layout_centerHorizontal",
            "layout_alignLeft",
            "layout_alignRight",
            "layout_alignStart",
            "layout_alignEnd",
            "layout_toLeftOf",
            "layout_toRightOf",
            "layout_toStartOf",
            "layout_toEndOf",
            "layout_marginRight",
            "layout_marginEnd",
        ],
        Axis::Vertical => &[
            "layout_alignParentBottom",
            "layout_centerVertical",
            "layout_alignTop",
            "layout_alignBottom",
            "layout_above",
            "layout_below",
            "layout_alignBaseline",
            "layout_marginBottom",
        ],
    }
}

/// Side margins a uniform `layout_margin` stands for
pub const UNIFORM_MARGIN_SIDES: &[&str] = &[MARGIN_LEFT, MARGIN_TOP, MARGIN_RIGHT, MARGIN_BOTTOM];

/// Attribute name without the namespace prefix
pub fn local_name(name: &str) -> &str {
    name.strip_prefix(NAMESPACE_PREFIX).unwrap_or(name)
}

/// Size attribute for an axis
pub fn size_attribute(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => WIDTH,
        Axis::Vertical => HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str, axis: Axis) -> Option<&'static AnchorAttribute> {
        ANCHOR_ATTRIBUTES
            .iter()
            .find(|row| row.axis == axis && row.names.contains(&name))
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("android:layout_width"), "layout_width");
        assert_eq!(local_name("layout_width"), "layout_width");
    }

    #[test]
    fn test_center_in_parent_maps_to_both_axes() {
        let h = lookup("layout_centerInParent", Axis::Horizontal).unwrap();
        let v = lookup("layout_centerInParent", Axis::Vertical).unwrap();
        assert_eq!(h.kind, AnchorKind::Center);
        assert_eq!(v.kind, AnchorKind::Center);
        assert!(h.parent && v.parent);
    }

    #[test]
    fn test_margin_sources() {
        let to_left = lookup("layout_toLeftOf", Axis::Horizontal).unwrap();
        assert!(to_left.margins.contains(&MARGIN_RIGHT));
        let baseline = lookup("layout_alignBaseline", Axis::Vertical).unwrap();
        assert!(baseline.margins.contains(&MARGIN_BOTTOM));
        let below = lookup("layout_below", Axis::Vertical).unwrap();
        assert!(below.margins.contains(&MARGIN_TOP));
    }

    #[test]
    fn test_stripped_attributes_never_include_sizes() {
        for axis in Axis::ALL {
            let stripped = stripped_on_apply(axis);
            assert!(!stripped.contains(&WIDTH));
            assert!(!stripped.contains(&HEIGHT));
            assert!(!stripped.contains(&MARGIN_LEFT));
            assert!(!stripped.contains(&MARGIN_TOP));
            assert!(!stripped.contains(&ALIGN_PARENT_LEFT));
            assert!(!stripped.contains(&ALIGN_PARENT_TOP));
            assert!(!stripped.contains(&CENTER_IN_PARENT));
        }
    }
}
