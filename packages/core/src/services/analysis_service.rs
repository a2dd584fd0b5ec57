//! Analysis Orchestrator
//!
//! Produces a holistic `AnalysisResult` for one map: a flat structural
//! summary goes to the inference collaborator for qualitative commentary,
//! and the quantitative side (metrics, quality and balance scores,
//! rule-based improvement hints) is computed locally and merged in.
//!
//! # Degradation contract
//!
//! An empty map fails with `EmptyGraph` (metrics are undefined there). An
//! inference failure does NOT fail the request: the orchestrator returns a
//! degraded result with an explicit `error` field, keeping the locally
//! computable metrics, so the boundary can still respond.

use crate::graph::GraphView;
use crate::models::{AnalysisResult, MindMap, NodeSummary, StructureMetrics};
use crate::services::error::MapServiceError;
use mindmesh_ai_engine::{bounded_infer, InferenceClient, InferenceConfig};
use std::sync::Arc;
use tracing::{instrument, warn};

/// System framing for the analysis call site
const ANALYSIS_FRAMING: &str =
    "You are an AI expert in analyzing mind maps and providing insights.";

/// Depth beyond which a chain is suggested for regrouping
const DEEP_CHAIN_THRESHOLD: usize = 6;

/// Full-map analysis orchestrator.
pub struct AnalysisService {
    client: Arc<dyn InferenceClient>,
    config: InferenceConfig,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn InferenceClient>, config: InferenceConfig) -> Self {
        Self { client, config }
    }

    /// Analyze one map snapshot.
    ///
    /// # Errors
    ///
    /// `EmptyGraph` when the map has zero nodes. Inference failures degrade
    /// instead of erroring.
    #[instrument(skip(self, map), fields(map_id = %map.id))]
    pub async fn analyze(&self, map: &MindMap) -> Result<AnalysisResult, MapServiceError> {
        let view = GraphView::new(map);
        let metrics = StructureMetrics::compute(&view)?;
        let summaries = node_summaries(&view);

        let payload = serde_json::to_string(&summaries)
            .unwrap_or_else(|_| "[]".to_string());

        let insight = match bounded_infer(
            self.client.as_ref(),
            self.config.timeout,
            ANALYSIS_FRAMING,
            &payload,
            &self.config.analysis,
        )
        .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "analysis inference unavailable, degrading");
                return Ok(AnalysisResult::degraded(
                    format!("Failed to analyze mind map structure: {}", err),
                    Some(metrics),
                ));
            }
        };

        Ok(AnalysisResult {
            insight: Some(insight),
            structure_quality: Some(structure_quality(&view, &metrics)),
            balance_score: Some(balance_score(&view)),
            improvement_suggestions: improvement_suggestions(&view, &metrics),
            metrics: Some(metrics),
            error: None,
        })
    }
}

/// Flat structural summary of every node, the inference payload.
fn node_summaries(view: &GraphView<'_>) -> Vec<NodeSummary> {
    let mut summaries: Vec<NodeSummary> = view
        .nodes()
        .map(|node| {
            let connections: Vec<String> = view
                .connections_of(&node.id)
                .unwrap_or_default()
                .iter()
                .map(|c| c.target_id.clone())
                .collect();
            NodeSummary {
                id: node.id.clone(),
                text: node.text.clone(),
                depth: view.depth_of(&node.id).unwrap_or(0),
                children_count: connections.len(),
                connections,
            }
        })
        .collect();
    // Deterministic payload ordering regardless of index iteration order.
    summaries.sort_by(|a, b| a.id.cmp(&b.id));
    summaries
}

/// Structure quality in [0, 1]: connectedness (share of nodes touching at
/// least one connection) blended equally with depth utilization (actual max
/// depth vs. the deepest chain the node count allows).
fn structure_quality(view: &GraphView<'_>, metrics: &StructureMetrics) -> f64 {
    let total = metrics.total_nodes;
    if total <= 1 {
        return 1.0;
    }

    let connected = view
        .nodes()
        .filter(|n| {
            !view.connections_of(&n.id).unwrap_or_default().is_empty()
                || !view.neighbors(&n.id).unwrap_or_default().is_empty()
        })
        .count();
    let connectedness = connected as f64 / total as f64;

    let depth_utilization = metrics.max_depth as f64 / (total - 1) as f64;

    (connectedness + depth_utilization.min(1.0)) / 2.0
}

/// Balance in [0, 1]: how evenly the hierarchy's root subtrees are sized.
/// 1 − normalized mean absolute deviation of subtree node counts; 1.0 when
/// there are zero or one subtrees to compare.
fn balance_score(view: &GraphView<'_>) -> f64 {
    let roots: Vec<&str> = view
        .nodes()
        .filter(|n| n.is_root())
        .map(|n| n.id.as_str())
        .collect();

    let sizes: Vec<f64> = roots
        .iter()
        .map(|root| subtree_size(view, root) as f64)
        .collect();

    if sizes.len() <= 1 {
        return 1.0;
    }

    let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
    if mean == 0.0 {
        return 1.0;
    }
    let mad = sizes.iter().map(|s| (s - mean).abs()).sum::<f64>() / sizes.len() as f64;
    (1.0 - mad / mean).clamp(0.0, 1.0)
}

/// Nodes in a root's tree-view subtree (cycle-guarded breadth-first walk).
fn subtree_size(view: &GraphView<'_>, root_id: &str) -> usize {
    let mut visited = std::collections::HashSet::new();
    let mut queue = vec![root_id.to_string()];
    while let Some(id) = queue.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        for child in view.tree_children_of(&id).unwrap_or_default() {
            queue.push(child.id.clone());
        }
    }
    visited.len()
}

/// Rule-based improvement hints, deterministic given the snapshot.
fn improvement_suggestions(view: &GraphView<'_>, metrics: &StructureMetrics) -> Vec<String> {
    let mut hints = Vec::new();

    if metrics.max_depth == 0 && metrics.total_nodes > 1 {
        hints.push(
            "The map is flat; grouping related nodes under parent topics would add hierarchy."
                .to_string(),
        );
    }

    let isolated: Vec<&str> = view
        .nodes()
        .filter(|n| {
            n.is_root()
                && view.neighbors(&n.id).unwrap_or_default().is_empty()
                && view.tree_children_of(&n.id).unwrap_or_default().is_empty()
        })
        .map(|n| n.text.as_str())
        .collect();
    if !isolated.is_empty() && metrics.total_nodes > 1 {
        hints.push(format!(
            "{} node(s) are isolated; connecting them would integrate them into the map.",
            isolated.len()
        ));
    }

    if metrics.max_depth >= DEEP_CHAIN_THRESHOLD {
        hints.push(format!(
            "Some chains run {} levels deep; splitting them into intermediate topics may help.",
            metrics.max_depth
        ));
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Connection, MindMap, Node, Position};

    fn node(id: &str, parent: Option<&str>) -> Node {
        Node::new_with_id(
            id.to_string(),
            format!("topic {}", id),
            parent.map(str::to_string),
            Position::default(),
        )
    }

    fn chain_map() -> MindMap {
        let mut map = MindMap::new("user-1".to_string(), "chain".to_string());
        map.nodes = vec![node("A", None), node("B", Some("A")), node("C", Some("B"))];
        map.connections = vec![
            Connection::new("A".to_string(), "B".to_string()),
            Connection::new("B".to_string(), "C".to_string()),
        ];
        map
    }

    #[test]
    fn test_node_summaries_shape() {
        let map = chain_map();
        let view = GraphView::new(&map);
        let summaries = node_summaries(&view);

        assert_eq!(summaries.len(), 3);
        let a = summaries.iter().find(|s| s.id == "A").unwrap();
        assert_eq!(a.depth, 0);
        assert_eq!(a.children_count, 1);
        assert_eq!(a.connections, vec!["B".to_string()]);

        let c = summaries.iter().find(|s| s.id == "C").unwrap();
        assert_eq!(c.depth, 2);
        assert_eq!(c.children_count, 0);
    }

    #[test]
    fn test_balance_single_tree_is_one() {
        let map = chain_map();
        let view = GraphView::new(&map);
        assert_eq!(balance_score(&view), 1.0);
    }

    #[test]
    fn test_balance_penalizes_lopsided_trees() {
        // Two roots: one with four descendants, one bare.
        let mut map = MindMap::new("user-1".to_string(), "lopsided".to_string());
        map.nodes = vec![
            node("big", None),
            node("b1", Some("big")),
            node("b2", Some("big")),
            node("b3", Some("big")),
            node("b4", Some("big")),
            node("small", None),
        ];
        let view = GraphView::new(&map);

        let score = balance_score(&view);
        assert!(score < 1.0);
        assert!(score >= 0.0);
    }

    #[test]
    fn test_flat_map_hints_at_hierarchy() {
        let mut map = MindMap::new("user-1".to_string(), "flat".to_string());
        map.nodes = vec![node("A", None), node("B", None)];
        let view = GraphView::new(&map);
        let metrics = StructureMetrics::compute(&view).unwrap();

        let hints = improvement_suggestions(&view, &metrics);
        assert!(hints.iter().any(|h| h.contains("flat")));
        assert!(hints.iter().any(|h| h.contains("isolated")));
    }

    #[test]
    fn test_connected_chain_has_no_isolation_hint() {
        let map = chain_map();
        let view = GraphView::new(&map);
        let metrics = StructureMetrics::compute(&view).unwrap();

        let hints = improvement_suggestions(&view, &metrics);
        assert!(!hints.iter().any(|h| h.contains("isolated")));
        assert!(!hints.iter().any(|h| h.contains("flat")));
    }

    #[test]
    fn test_structure_quality_bounds() {
        let map = chain_map();
        let view = GraphView::new(&map);
        let metrics = StructureMetrics::compute(&view).unwrap();

        let q = structure_quality(&view, &metrics);
        assert!((0.0..=1.0).contains(&q));

        // A single node map is trivially well-structured.
        let mut single = MindMap::new("u".to_string(), "one".to_string());
        single.nodes = vec![node("A", None)];
        let view = GraphView::new(&single);
        let metrics = StructureMetrics::compute(&view).unwrap();
        assert_eq!(structure_quality(&view, &metrics), 1.0);
    }

    #[test]
    fn test_subtree_size_survives_cycle() {
        let mut map = MindMap::new("u".to_string(), "cyclic".to_string());
        // "a" is a root; "b" and "c" form a parent cycle below it.
        map.nodes = vec![node("a", None), node("b", Some("a")), node("c", Some("b"))];
        map.nodes[1].parent_id = Some("c".to_string());
        let view = GraphView::new(&map);

        // Must terminate.
        let _ = subtree_size(&view, "a");
    }
}
