//! Per-axis positioning tree
//!
//! Nodes live in an arena owned by the tree and are addressed by [`NodeId`].
//! An id-to-index map gives constant-time lookup by element id, so attaching
//! a node under its anchor target never walks the tree.
//!
//! Before [`PositioningTree::flatten`] each node's offset is relative to its
//! parent; afterwards every node hangs directly off the axis root and its
//! offset is absolute.

use std::collections::HashMap;
use std::fmt::Write;

use super::error::LayoutError;
use super::types::{Axis, Placement};

/// Index of a node in the tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One element's node in an axis tree
#[derive(Debug, Clone, PartialEq)]
pub struct PositionNode {
    pub id: String,
    pub offset: i64,
    pub size: i64,
    children: Vec<NodeId>,
}

impl PositionNode {
    fn new(id: impl Into<String>, offset: i64, size: i64) -> Self {
        Self {
            id: id.into(),
            offset,
            size,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Hierarchy of resolved positioning relationships for one axis
#[derive(Debug, Clone)]
pub struct PositioningTree {
    axis: Axis,
    nodes: Vec<PositionNode>,
    index: HashMap<String, NodeId>,
}

impl PositioningTree {
    /// Create a tree holding only the axis root
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            nodes: vec![PositionNode::new(axis.root_id(), 0, 0)],
            index: HashMap::new(),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The synthetic root node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &PositionNode {
        &self.nodes[id.0]
    }

    /// Look up an element's node. The root is not addressable by id.
    pub fn find(&self, element: &str) -> Option<NodeId> {
        self.index.get(element).copied()
    }

    pub fn contains(&self, element: &str) -> bool {
        self.index.contains_key(element)
    }

    /// Number of element nodes (the root is not counted)
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attach a new node under `parent` with an offset in the parent's space
    pub fn attach(
        &mut self,
        parent: NodeId,
        element: impl Into<String>,
        offset: i64,
        size: i64,
    ) -> Result<NodeId, LayoutError> {
        let element = element.into();
        if self.index.contains_key(&element) {
            return Err(LayoutError::DuplicateElement {
                element,
                axis: self.axis,
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(PositionNode::new(element.clone(), offset, size));
        self.nodes[parent.0].children.push(id);
        self.index.insert(element, id);
        Ok(id)
    }

    /// Longest root-to-leaf path, counted in edges. A flat tree has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for &child in &self.nodes[id.0].children {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// True once every element node is a direct child of the root
    pub fn is_flat(&self) -> bool {
        self.depth() <= 1
    }

    /// Collapse the tree so every node is a direct child of the root with
    /// an absolute offset. Sizes are unchanged.
    ///
    /// Uses an explicit work stack, so nesting as deep as the element count
    /// cannot overflow the call stack. Flattening a flat tree is a no-op.
    /// Fails if an absolute offset does not fit in an `i64`.
    pub fn flatten(&mut self) -> Result<(), LayoutError> {
        let root = self.root();
        let mut promoted = Vec::with_capacity(self.len());
        // (node, absolute offset of its parent's origin)
        let mut stack: Vec<(NodeId, i64)> = self.nodes[root.0]
            .children
            .iter()
            .rev()
            .map(|&child| (child, 0))
            .collect();

        while let Some((id, base)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            let Some(absolute) = node.offset.checked_add(base) else {
                return Err(LayoutError::overflow(node.id.clone(), self.axis));
            };
            node.offset = absolute;
            let children = std::mem::take(&mut node.children);
            promoted.push(id);
            stack.extend(children.into_iter().rev().map(|child| (child, absolute)));
        }

        self.nodes[root.0].children = promoted;
        Ok(())
    }

    /// Multiply every root child's offset by `factor`, truncating toward zero.
    ///
    /// Meant for a flattened tree, where those offsets are absolute. Whole
    /// factors multiply exactly; fractional ones go through `f64`, which is
    /// exact only for offsets up to 2^53 in magnitude.
    pub fn scale(&mut self, factor: f64) -> Result<(), LayoutError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(LayoutError::InvalidScale { factor });
        }
        let children = self.nodes[0].children.clone();
        for child in children {
            let node = &mut self.nodes[child.0];
            let Some(scaled) = scale_offset(node.offset, factor) else {
                return Err(LayoutError::overflow(node.id.clone(), self.axis));
            };
            node.offset = scaled;
        }
        Ok(())
    }

    /// Root children as placements, in tree order
    pub fn placements(&self) -> Vec<Placement> {
        self.nodes[0]
            .children
            .iter()
            .map(|&child| {
                let node = &self.nodes[child.0];
                Placement {
                    id: node.id.clone(),
                    offset: node.offset,
                    size: node.size,
                }
            })
            .collect()
    }

    /// Indented dump of the tree, one node per line
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, level)) = stack.pop() {
            let node = &self.nodes[id.0];
            let _ = writeln!(
                out,
                "{}{} pos={} size={}",
                "    ".repeat(level),
                node.id,
                node.offset,
                node.size
            );
            for &child in node.children.iter().rev() {
                stack.push((child, level + 1));
            }
        }
        out
    }
}

/// 2^63, one past `i64::MAX`
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn scale_offset(offset: i64, factor: f64) -> Option<i64> {
    if factor.fract() == 0.0 && factor < I64_LIMIT {
        return offset.checked_mul(factor as i64);
    }
    let scaled = (offset as f64 * factor).trunc();
    (scaled >= -I64_LIMIT && scaled < I64_LIMIT).then_some(scaled as i64)
}
