//! Suggestion Orchestrator
//!
//! Builds a bounded context window around one target node, asks the
//! inference collaborator for ideas, and normalizes whatever comes back into
//! scored suggestion records.
//!
//! # Degradation contract
//!
//! Inference failure (error or timeout) is absorbed here: the caller gets a
//! successful `SuggestionResult` with an empty suggestion list, never a hard
//! failure. A node id that is not in the map, however, fails with `NotFound`
//! before any inference call is made.

use crate::graph::GraphView;
use crate::models::{MindMap, Suggestion, SuggestionContext, SuggestionResult};
use crate::services::error::MapServiceError;
use mindmesh_ai_engine::{bounded_infer, InferenceClient, InferenceConfig};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, warn};

/// System framing for the suggestion call site
const SUGGESTION_FRAMING: &str = "You are an AI expert in mind mapping and brainstorming.";

/// Maximum related concepts included in the context window
const MAX_RELATED_CONCEPTS: usize = 5;

/// Floor of the lexical-overlap relevance range. Model output with no
/// lexical overlap at all still answered the request, so it keeps half the
/// score instead of being zeroed.
const RELEVANCE_FLOOR: f64 = 0.5;

/// Per-node suggestion orchestrator.
///
/// The inference client is an injected collaborator (no global singletons),
/// which is also what makes the degradation paths testable with doubles.
pub struct SuggestionService {
    client: Arc<dyn InferenceClient>,
    config: InferenceConfig,
}

impl SuggestionService {
    pub fn new(client: Arc<dyn InferenceClient>, config: InferenceConfig) -> Self {
        Self { client, config }
    }

    /// Generate suggestions for one node of a map.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` when `node_id` is not in the map. Inference failures
    /// do not error; they degrade to an empty suggestion list.
    #[instrument(skip(self, map), fields(map_id = %map.id))]
    pub async fn generate(
        &self,
        map: &MindMap,
        node_id: &str,
    ) -> Result<SuggestionResult, MapServiceError> {
        let view = GraphView::new(map);
        let node = view
            .node(node_id)
            .map_err(|_| MapServiceError::node_not_found(node_id))?;

        let related_concepts: Vec<String> = view
            .neighbors(node_id)
            .unwrap_or_default()
            .iter()
            .map(|n| n.text.clone())
            .take(MAX_RELATED_CONCEPTS)
            .collect();

        let context = SuggestionContext {
            topic: node.text.clone(),
            related_concepts,
            hierarchy_level: view.depth_of(node_id).unwrap_or(0),
        };

        let payload = json!({
            "topic": context.topic,
            "relatedConcepts": context.related_concepts,
            "hierarchyLevel": context.hierarchy_level,
        })
        .to_string();

        let suggestions = match bounded_infer(
            self.client.as_ref(),
            self.config.timeout,
            SUGGESTION_FRAMING,
            &payload,
            &self.config.suggestion,
        )
        .await
        {
            Ok(raw) => parse_suggestions(&raw, &context),
            Err(err) => {
                // Absorbed: no suggestions available, not a request failure.
                warn!(node_id, error = %err, "suggestion inference unavailable");
                Vec::new()
            }
        };

        Ok(SuggestionResult {
            suggestions,
            context,
        })
    }
}

/// Parse raw model output into suggestion records.
///
/// One suggestion per bullet (`-`, `*`) or `N.`-numbered line. A non-empty
/// response with no list markers becomes a single suggestion. Anything else
/// (blank output, whitespace) parses to zero suggestions - malformed output
/// is not an error.
fn parse_suggestions(raw: &str, context: &SuggestionContext) -> Vec<Suggestion> {
    let items: Vec<&str> = raw
        .lines()
        .filter_map(|line| strip_list_marker(line.trim()))
        .filter(|text| !text.is_empty())
        .collect();

    let items = if items.is_empty() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        vec![trimmed]
    } else {
        items
    };

    items
        .into_iter()
        .map(|text| Suggestion {
            text: text.to_string(),
            relevance_score: relevance_score(text, context),
        })
        .collect()
}

/// Strip a leading `- `, `* ` or `12. ` marker; `None` for non-list lines.
fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest.trim());
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix('.') {
            return Some(rest.trim());
        }
    }
    None
}

/// Relevance policy: lexical overlap with the context.
///
/// The fraction of distinct context terms (topic + related concepts,
/// lowercased alphanumeric words) that occur in the suggestion text, mapped
/// linearly onto [RELEVANCE_FLOOR, 1.0].
fn relevance_score(text: &str, context: &SuggestionContext) -> f64 {
    let context_terms: HashSet<String> = std::iter::once(context.topic.as_str())
        .chain(context.related_concepts.iter().map(String::as_str))
        .flat_map(terms)
        .collect();

    if context_terms.is_empty() {
        return RELEVANCE_FLOOR;
    }

    let suggestion_terms: HashSet<String> = terms(text).collect();
    let overlap = context_terms
        .iter()
        .filter(|t| suggestion_terms.contains(*t))
        .count();

    RELEVANCE_FLOOR + (1.0 - RELEVANCE_FLOOR) * overlap as f64 / context_terms.len() as f64
}

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
