//! Per-axis pipeline: resolve, flatten, then scale (horizontal only)

use log::{debug, info, warn};

use super::config::LayoutConfig;
use super::error::LayoutError;
use super::resolver::ConstraintResolver;
use super::tree::PositioningTree;
use super::types::{Axis, AxisLayout, ElementRecord};

/// Receives the positioning tree at each stage of a pipeline run
pub trait TreeObserver {
    /// Called once after resolution, before flattening
    fn resolved(&mut self, _tree: &PositioningTree) {}

    /// Called once after flattening and scaling
    fn flattened(&mut self, _tree: &PositioningTree) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl TreeObserver for NoopObserver {}

/// Observer that keeps a text dump of every tree it sees
#[derive(Debug, Default)]
pub struct TreeDumper {
    pub dumps: Vec<String>,
}

impl TreeObserver for TreeDumper {
    fn resolved(&mut self, tree: &PositioningTree) {
        self.dumps
            .push(format!("=== {} resolved ===\n{}", tree.axis(), tree.dump()));
    }

    fn flattened(&mut self, tree: &PositioningTree) {
        self.dumps
            .push(format!("=== {} flattened ===\n{}", tree.axis(), tree.dump()));
    }
}

/// Resolver, flattener and scaler for a single axis
#[derive(Debug, Clone, Copy)]
pub struct AxisPipeline {
    axis: Axis,
    scale: f64,
}

impl AxisPipeline {
    /// Pipeline for `axis`; only the horizontal axis picks up the scale
    pub fn new(axis: Axis, config: &LayoutConfig) -> Self {
        let scale = match axis {
            Axis::Horizontal => config.scale,
            Axis::Vertical => 1.0,
        };
        Self { axis, scale }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn run(&self, records: &[ElementRecord]) -> Result<AxisLayout, LayoutError> {
        self.run_observed(records, &mut NoopObserver)
    }

    /// Run the pipeline, reporting intermediate trees to `observer`
    pub fn run_observed(
        &self,
        records: &[ElementRecord],
        observer: &mut dyn TreeObserver,
    ) -> Result<AxisLayout, LayoutError> {
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(LayoutError::InvalidScale { factor: self.scale });
        }

        let resolution = ConstraintResolver::new(self.axis, records).resolve()?;
        let mut tree = resolution.tree;
        observer.resolved(&tree);
        debug!(
            target: "relflat::pipeline",
            "{}: resolved {} elements in {} passes, depth {}",
            self.axis,
            tree.len(),
            resolution.passes,
            tree.depth()
        );

        tree.flatten()?;
        if self.scale != 1.0 {
            tree.scale(self.scale)?;
        }
        observer.flattened(&tree);

        if !resolution.anomalies.is_empty() {
            warn!(
                target: "relflat::pipeline",
                "{}: no anchor for {}",
                self.axis,
                resolution.anomalies.join(", ")
            );
        }
        info!(target: "relflat::pipeline", "{} scan done: {} placed", self.axis, tree.len());

        Ok(AxisLayout {
            axis: self.axis,
            placements: tree.placements(),
            anomalies: resolution.anomalies,
            passes: resolution.passes,
        })
    }
}

/// Results of both axis pipelines. Each axis fails on its own.
#[derive(Debug, Clone)]
pub struct FlattenOutcome {
    pub horizontal: Result<AxisLayout, LayoutError>,
    pub vertical: Result<AxisLayout, LayoutError>,
}

impl FlattenOutcome {
    pub fn axis(&self, axis: Axis) -> &Result<AxisLayout, LayoutError> {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    /// True when neither axis failed
    pub fn is_complete(&self) -> bool {
        self.horizontal.is_ok() && self.vertical.is_ok()
    }

    /// Axes whose pipeline failed, with the error
    pub fn failures(&self) -> Vec<(Axis, &LayoutError)> {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| self.axis(axis).as_ref().err().map(|e| (axis, e)))
            .collect()
    }

    /// Anomalies of every axis that completed
    pub fn anomalies(&self) -> Vec<(Axis, &str)> {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| self.axis(axis).as_ref().ok())
            .flat_map(|layout| {
                layout
                    .anomalies
                    .iter()
                    .map(move |id| (layout.axis, id.as_str()))
            })
            .collect()
    }
}

/// Run both axes over the same records, reporting trees to `observer`
pub fn run_both(
    records: &[ElementRecord],
    config: &LayoutConfig,
    observer: &mut dyn TreeObserver,
) -> FlattenOutcome {
    let mut run = |axis: Axis| {
        let result = AxisPipeline::new(axis, config).run_observed(records, &mut *observer);
        if let Err(e) = &result {
            warn!(target: "relflat::pipeline", "{} axis failed: {}", axis, e);
        }
        result
    };
    let horizontal = run(Axis::Horizontal);
    let vertical = run(Axis::Vertical);
    FlattenOutcome {
        horizontal,
        vertical,
    }
}
