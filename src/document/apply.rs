//! Writing resolved placements back onto a layout document
//!
//! For each axis that completed, every element with a placement is
//! re-anchored to the container's near edge with its absolute offset as
//! margin, and the relative attributes of that axis are removed. Elements
//! without a placement (anomalies) keep their attributes and are reported.

use std::fmt;

use log::{debug, warn};
use toml::Value;

use crate::layout::{Axis, AxisLayout, FlattenOutcome, Placement};

use super::attributes::{
    self, ALIGN_PARENT_LEFT, ALIGN_PARENT_START, ALIGN_PARENT_TOP, CENTER_IN_PARENT, MARGIN,
    MARGIN_LEFT, MARGIN_START, MARGIN_TOP, UNIFORM_MARGIN_SIDES,
};
use super::lexer::format_dimension;
use super::model::{LayoutDocument, RawElement};

/// An element left untouched on one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub axis: Axis,
    pub element: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' has no {} anchor and was left unchanged on that axis",
            self.element, self.axis
        )
    }
}

/// What the applier did to a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied_axes: Vec<Axis>,
    /// Axes whose pipeline failed and were not applied
    pub incomplete_axes: Vec<Axis>,
    pub warnings: Vec<Warning>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.incomplete_axes.is_empty()
    }
}

/// Apply every completed axis of `outcome` to `doc`
pub fn apply(doc: &mut LayoutDocument, outcome: &FlattenOutcome, unit: &str) -> ApplyReport {
    let mut report = ApplyReport::default();

    for axis in Axis::ALL {
        match outcome.axis(axis) {
            Ok(layout) => {
                report.warnings.extend(apply_axis(doc, layout, unit));
                report.applied_axes.push(axis);
            }
            Err(e) => {
                warn!(target: "relflat::apply", "{} axis not applied: {}", axis, e);
                report.incomplete_axes.push(axis);
            }
        }
    }

    if report.is_complete() {
        for element in &mut doc.elements {
            element.remove(CENTER_IN_PARENT);
        }
    }
    report
}

/// Apply one axis's placements to the matching elements
pub fn apply_axis(doc: &mut LayoutDocument, layout: &AxisLayout, unit: &str) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for element in &mut doc.elements {
        let Some(id) = element.id() else {
            continue;
        };
        match layout.placement(&id) {
            Some(placement) => {
                expand_uniform_margin(element);
                write_placement(element, layout.axis, placement, unit);
            }
            None => {
                debug!(target: "relflat::apply", "{} left relative on {}", id, layout.axis);
                warnings.push(Warning {
                    axis: layout.axis,
                    element: id,
                });
            }
        }
    }
    warnings
}

/// Replace `layout_margin` with the side margins it stands for, so that one
/// axis can be rewritten without touching the other. Explicit side margins
/// are overridden, as a uniform margin overrides them when laid out.
fn expand_uniform_margin(element: &mut RawElement) {
    let Some(margin) = element.remove(MARGIN) else {
        return;
    };
    for side in UNIFORM_MARGIN_SIDES {
        element.set(side, margin.clone());
    }
}

fn write_placement(element: &mut RawElement, axis: Axis, placement: &Placement, unit: &str) {
    for name in attributes::stripped_on_apply(axis) {
        element.remove(name);
    }

    let offset = Value::String(format_dimension(placement.offset, unit));
    let size = Value::String(format_dimension(placement.size, unit));
    let flag = Value::String("true".to_string());

    match axis {
        Axis::Horizontal => {
            element.set(ALIGN_PARENT_LEFT, flag.clone());
            element.set(ALIGN_PARENT_START, flag);
            element.set(MARGIN_START, offset.clone());
            element.set(MARGIN_LEFT, offset);
        }
        Axis::Vertical => {
            element.set(ALIGN_PARENT_TOP, flag);
            element.set(MARGIN_TOP, offset);
        }
    }
    element.set(attributes::size_attribute(axis), size);
}
