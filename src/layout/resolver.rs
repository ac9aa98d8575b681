//! Constraint resolution: anchor declarations to a positioning tree
//!
//! Resolution runs in two phases:
//! 1. **Top-level pass**: elements anchored to the container's near edge
//!    become children of the axis root.
//! 2. **Attachment passes**: every remaining element is attached under the
//!    element its highest-precedence anchor names, once that element is in
//!    the tree. Passes repeat until nothing is left.
//!
//! A pass that attaches nothing while elements remain can never make
//! progress, so it fails with [`LayoutError::UnresolvedReference`] instead of
//! retrying forever.

use log::{debug, trace};

use super::error::LayoutError;
use super::tree::{NodeId, PositioningTree};
use super::types::{AnchorDecl, AnchorKind, Axis, ElementRecord};

/// Sibling anchors tried on the horizontal axis, first match wins
const HORIZONTAL_PRECEDENCE: &[AnchorKind] = &[
    AnchorKind::Near,
    AnchorKind::Far,
    AnchorKind::Before,
    AnchorKind::After,
];

/// Sibling anchors tried on the vertical axis after the sandwich check
const VERTICAL_PRECEDENCE: &[AnchorKind] = &[
    AnchorKind::Near,
    AnchorKind::Baseline,
    AnchorKind::Far,
    AnchorKind::Before,
    AnchorKind::After,
];

/// A resolved (but not yet flattened) tree for one axis
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tree: PositioningTree,
    /// Elements without any anchor on this axis
    pub anomalies: Vec<String>,
    /// Attachment passes run after the top-level pass
    pub passes: usize,
}

/// What happened to one candidate during an attachment pass
enum Step<'a> {
    Attached,
    /// Target not in the tree yet
    Deferred { target: &'a str },
    /// No anchor on this axis
    Anomaly,
}

/// Builds the positioning tree for one axis
pub struct ConstraintResolver<'a> {
    axis: Axis,
    records: &'a [ElementRecord],
}

impl<'a> ConstraintResolver<'a> {
    pub fn new(axis: Axis, records: &'a [ElementRecord]) -> Self {
        Self { axis, records }
    }

    /// Resolve every record into a tree, collecting anomalies
    pub fn resolve(&self) -> Result<Resolution, LayoutError> {
        let mut tree = PositioningTree::new(self.axis);
        let mut remaining = self.attach_top_level(&mut tree)?;
        let mut anomalies = Vec::new();
        let mut passes = 0;

        while !remaining.is_empty() {
            passes += 1;
            debug!(
                target: "relflat::resolver",
                "{} pass {}: {} elements left",
                self.axis,
                passes,
                remaining.len()
            );

            let mut next = Vec::with_capacity(remaining.len());
            let mut stalled = Vec::new();
            let mut progressed = false;

            for &record in &remaining {
                match self.attach_candidate(&mut tree, record)? {
                    Step::Attached => progressed = true,
                    Step::Deferred { target } => {
                        stalled.push((record.id.clone(), target.to_string()));
                        next.push(record);
                    }
                    Step::Anomaly => {
                        debug!(
                            target: "relflat::resolver",
                            "{} has no {} anchor",
                            record.id,
                            self.axis
                        );
                        anomalies.push(record.id.clone());
                        progressed = true;
                    }
                }
            }

            if !progressed {
                return Err(LayoutError::unresolved(self.axis, stalled));
            }
            remaining = next;
        }

        Ok(Resolution {
            tree,
            anomalies,
            passes,
        })
    }

    /// Attach near-edge parent anchors to the root; return everything else.
    fn attach_top_level(
        &self,
        tree: &mut PositioningTree,
    ) -> Result<Vec<&'a ElementRecord>, LayoutError> {
        let root = tree.root();
        let mut remaining = Vec::new();

        for record in self.records {
            if let Some(anchor) = record.parent_anchor(self.axis, AnchorKind::Near) {
                tree.attach(root, &record.id, anchor.margin(), record.size(self.axis))?;
                trace!(
                    target: "relflat::resolver",
                    "{} attached to {}",
                    record.id,
                    self.axis.root_id()
                );
                continue;
            }

            for kind in [AnchorKind::Far, AnchorKind::Center] {
                if record.parent_anchor(self.axis, kind).is_some() {
                    return Err(LayoutError::unsupported(&record.id, kind, self.axis));
                }
            }
            remaining.push(record);
        }

        Ok(remaining)
    }

    fn attach_candidate<'r>(
        &self,
        tree: &mut PositioningTree,
        record: &'r ElementRecord,
    ) -> Result<Step<'r>, LayoutError> {
        if self.axis == Axis::Vertical {
            if let Some(step) = self.attach_sandwich(tree, record)? {
                return Ok(step);
            }
        }

        let precedence = match self.axis {
            Axis::Horizontal => HORIZONTAL_PRECEDENCE,
            Axis::Vertical => VERTICAL_PRECEDENCE,
        };

        for &kind in precedence {
            let Some(anchor) = record.sibling_anchor(self.axis, kind) else {
                continue;
            };
            let Some(target) = anchor.target.sibling_id() else {
                continue;
            };
            let Some(parent) = tree.find(target) else {
                return Ok(Step::Deferred { target });
            };

            let offset = self.offset_for(tree, parent, record, anchor)?;
            tree.attach(parent, &record.id, offset, record.size(self.axis))?;
            trace!(target: "relflat::resolver", "{} attached to {} ({})", record.id, target, kind);
            return Ok(Step::Attached);
        }

        Ok(Step::Anomaly)
    }

    /// Top and bottom aligned to the same element: take its height.
    ///
    /// Returns `None` when the record is not a sandwich.
    fn attach_sandwich<'r>(
        &self,
        tree: &mut PositioningTree,
        record: &'r ElementRecord,
    ) -> Result<Option<Step<'r>>, LayoutError> {
        let top = record.sibling_anchor(Axis::Vertical, AnchorKind::Near);
        let bottom = record.sibling_anchor(Axis::Vertical, AnchorKind::Far);
        let (Some(top), Some(bottom)) = (top, bottom) else {
            return Ok(None);
        };
        let (Some(first), Some(second)) = (top.target.sibling_id(), bottom.target.sibling_id())
        else {
            return Ok(None);
        };
        if first != second {
            return Err(LayoutError::conflicting(&record.id, first, second));
        }

        let Some(parent) = tree.find(first) else {
            return Ok(Some(Step::Deferred { target: first }));
        };
        let margin = top.margin();
        let size = tree
            .node(parent)
            .size
            .checked_sub(margin)
            .ok_or_else(|| LayoutError::overflow(&record.id, self.axis))?;
        if size <= 0 {
            return Err(LayoutError::NonPositiveSize {
                element: record.id.clone(),
                axis: self.axis,
                size,
            });
        }
        tree.attach(parent, &record.id, margin, size)?;
        trace!(target: "relflat::resolver", "{} sandwiched in {}", record.id, first);
        Ok(Some(Step::Attached))
    }

    /// Offset of `record` in the coordinate space of `parent`
    fn offset_for(
        &self,
        tree: &PositioningTree,
        parent: NodeId,
        record: &ElementRecord,
        anchor: &AnchorDecl,
    ) -> Result<i64, LayoutError> {
        let parent_size = tree.node(parent).size;
        let size = record.size(self.axis);
        let margin = anchor.margin();
        let centered = (parent_size / 2).checked_sub(size / 2);

        let offset = match anchor.kind {
            AnchorKind::Near => Some(margin),
            AnchorKind::Far => parent_size
                .checked_sub(size)
                .and_then(|o| o.checked_sub(margin)),
            AnchorKind::Before => size.checked_neg().and_then(|o| o.checked_sub(margin)),
            AnchorKind::After => parent_size.checked_add(margin),
            // 3/70 of the height approximates the gap between a text box's
            // center line and its baseline
            AnchorKind::Baseline => centered
                .and_then(|o| o.checked_sub(margin))
                .zip(size.checked_mul(3))
                .and_then(|(o, lift)| o.checked_add(lift / 70)),
            AnchorKind::Center => centered,
        };
        offset.ok_or_else(|| LayoutError::overflow(&record.id, self.axis))
    }
}

/// Resolve `records` on `axis` into a positioning tree
pub fn resolve(records: &[ElementRecord], axis: Axis) -> Result<Resolution, LayoutError> {
    ConstraintResolver::new(axis, records).resolve()
}
