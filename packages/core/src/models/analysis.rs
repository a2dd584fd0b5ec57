//! Derived Analysis and Suggestion Types
//!
//! Everything in this module is ephemeral: computed from a map snapshot on
//! demand, returned to the caller, never persisted.

use serde::{Deserialize, Serialize};

/// Aggregate structural statistics of one map snapshot.
///
/// Computed by `graph::metrics`; deterministic given the snapshot. All four
/// values are undefined on an empty map, which the metrics engine surfaces
/// as an explicit error instead of producing a value here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMetrics {
    /// Node count
    pub total_nodes: usize,

    /// Maximum hierarchy depth over all nodes
    pub max_depth: usize,

    /// Mean outgoing-connection count per node
    pub avg_connections: f64,

    /// (total outgoing connections × max_depth) / total_nodes.
    /// Zero for flat maps (max_depth 0); that is a valid score, not an error.
    pub complexity_score: f64,
}

/// Flat per-node structural summary, the payload handed to the inference
/// collaborator for holistic commentary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    pub text: String,
    /// Target ids of outgoing connections
    pub connections: Vec<String>,
    /// Hierarchy depth (cycle-guarded)
    pub depth: usize,
    /// Outgoing connection count ("children" in the connection view)
    pub children_count: usize,
}

/// Full-map analysis result.
///
/// On success `insight` and the quality scores are populated. When the
/// inference collaborator fails or times out the orchestrator degrades to an
/// explicit `error` payload; the quantitative metrics stay available either
/// way since they never involve inference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Qualitative commentary from the inference collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,

    /// [0, 1]: connectedness blended with depth utilization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_quality: Option<f64>,

    /// [0, 1]: how evenly root subtrees are sized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_score: Option<f64>,

    /// Rule-based improvement hints
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub improvement_suggestions: Vec<String>,

    /// Quantitative metrics (always computable on non-empty maps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<StructureMetrics>,

    /// Set when the inference collaborator was unavailable; the response is
    /// still a success envelope at the boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Build the degraded variant returned when inference fails.
    pub fn degraded(reason: impl Into<String>, metrics: Option<StructureMetrics>) -> Self {
        Self {
            error: Some(reason.into()),
            metrics,
            ..Default::default()
        }
    }
}

/// Trimmed context attached to suggestion responses: what the model was
/// actually shown about the target node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionContext {
    /// The target node's label
    pub topic: String,

    /// Labels of connected nodes, truncated to five
    pub related_concepts: Vec<String>,

    /// Hierarchy depth of the target node
    pub hierarchy_level: usize,
}

/// One generated suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Suggested idea text
    pub text: String,

    /// [0, 1] relevance estimate (lexical overlap with the context)
    pub relevance_score: f64,
}

/// Suggestion response for one target node.
///
/// An empty `suggestions` list is a valid success: it is what the
/// orchestrator returns when the inference collaborator fails, times out or
/// produces unparseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    pub suggestions: Vec<Suggestion>,
    pub context: SuggestionContext,
}
