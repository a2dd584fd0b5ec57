//! Metrics Engine - Aggregate Structural Statistics
//!
//! Computes `StructureMetrics` from a `GraphView` snapshot. Deterministic
//! given the snapshot and purely synchronous; callers may run it
//! concurrently without coordination.
//!
//! The zero-node boundary is explicit: `max_depth` is a maximum over an
//! empty sequence and `avg_connections` a division by zero, so an empty map
//! fails with [`MetricsError::EmptyGraph`] instead of inventing a value.

use crate::graph::GraphView;
use crate::models::StructureMetrics;
use thiserror::Error;

/// Metrics computation errors
#[derive(Error, Debug, PartialEq)]
pub enum MetricsError {
    /// Metrics are undefined on a map with zero nodes
    #[error("Metrics are undefined for an empty map")]
    EmptyGraph,
}

impl StructureMetrics {
    /// Compute metrics for one snapshot.
    ///
    /// # Errors
    ///
    /// [`MetricsError::EmptyGraph`] when the snapshot has zero nodes.
    pub fn compute(view: &GraphView<'_>) -> Result<Self, MetricsError> {
        if view.is_empty() {
            return Err(MetricsError::EmptyGraph);
        }

        let total_nodes = view.len();
        let total_connections = view.total_connections();

        // depth_of cannot fail here: every id comes from the view itself.
        let max_depth = view
            .nodes()
            .map(|node| view.depth_of(&node.id).unwrap_or(0))
            .max()
            .unwrap_or(0);

        let avg_connections = total_connections as f64 / total_nodes as f64;
        // Zero on flat maps (max_depth 0) by construction; intentional.
        let complexity_score = (total_connections * max_depth) as f64 / total_nodes as f64;

        Ok(Self {
            total_nodes,
            max_depth,
            avg_connections,
            complexity_score,
        })
    }
}
