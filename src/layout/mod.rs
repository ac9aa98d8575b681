//! Flattening engine: relative anchors to absolute offsets
//!
//! Each axis is handled by its own [`AxisPipeline`]: the
//! [`ConstraintResolver`] builds a [`PositioningTree`] from the element
//! records, the tree is flattened so every offset is measured from the
//! container's origin, and horizontal offsets are scaled.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod tree;
pub mod types;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use pipeline::{
    run_both, AxisPipeline, FlattenOutcome, NoopObserver, TreeDumper, TreeObserver,
};
pub use resolver::{resolve, ConstraintResolver, Resolution};
pub use tree::{NodeId, PositionNode, PositioningTree};
pub use types::*;

/// Run one axis with the given configuration
pub fn compute(
    records: &[ElementRecord],
    axis: Axis,
    config: &LayoutConfig,
) -> Result<AxisLayout, LayoutError> {
    AxisPipeline::new(axis, config).run(records)
}
