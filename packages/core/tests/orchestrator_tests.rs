//! Integration tests for the AI orchestrators: degradation on provider
//! failure, and the ordering guarantee that entity checks run before any
//! inference call is dispatched.

use async_trait::async_trait;
use mindmesh_ai_engine::{
    EchoClient, InferenceClient, InferenceConfig, InferenceError, SamplingParams,
};
use mindmesh_core::models::Position;
use mindmesh_core::services::{
    AnalysisService, CreateNodeParams, MapService, MapServiceError, SuggestionService,
};
use mindmesh_core::{MemoryStore, MindMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Provider double that always fails, counting how often it was reached.
struct FailingClient {
    calls: AtomicUsize,
}

impl FailingClient {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for FailingClient {
    async fn infer(
        &self,
        _framing: &str,
        _payload: &str,
        _params: &SamplingParams,
    ) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InferenceError::Unavailable("provider offline".to_string()))
    }
}

async fn seeded_map() -> MindMap {
    let service = MapService::new(Arc::new(MemoryStore::new()));
    let map = service
        .create_map("alice", "Ideas".to_string())
        .await
        .unwrap();

    let root = service
        .create_node(
            "alice",
            &map.id,
            CreateNodeParams {
                id: None,
                text: "error handling".to_string(),
                parent_id: None,
                position: Position::default(),
            },
        )
        .await
        .unwrap();
    let child = service
        .create_node(
            "alice",
            &map.id,
            CreateNodeParams {
                id: None,
                text: "panics".to_string(),
                parent_id: Some(root.id.clone()),
                position: Position::default(),
            },
        )
        .await
        .unwrap();
    service
        .create_connection("alice", &map.id, root.id.clone(), child.id.clone())
        .await
        .unwrap();

    service.get_map("alice", &map.id).await.unwrap()
}

#[tokio::test]
async fn test_suggestion_degrades_to_empty_list_on_provider_failure() {
    let map = seeded_map().await;
    let node_id = map.nodes[0].id.clone();

    let client = Arc::new(FailingClient::new());
    let service = SuggestionService::new(client.clone(), InferenceConfig::default());

    let result = service.generate(&map, &node_id).await.unwrap();
    assert!(result.suggestions.is_empty());
    assert_eq!(result.context.topic, "error handling");
    assert_eq!(client.call_count(), 1);
}

/// Provider double that never answers within any reasonable deadline.
struct SlowClient;

#[async_trait]
impl InferenceClient for SlowClient {
    async fn infer(
        &self,
        _framing: &str,
        _payload: &str,
        _params: &SamplingParams,
    ) -> Result<String, InferenceError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("too late".to_string())
    }
}

#[tokio::test]
async fn test_suggestion_timeout_degrades_to_empty_list() {
    let map = seeded_map().await;
    let node_id = map.nodes[0].id.clone();

    let config = InferenceConfig {
        timeout: Duration::from_millis(10),
        ..Default::default()
    };
    let service = SuggestionService::new(Arc::new(SlowClient), config);

    // A timed-out call is a success envelope with zero suggestions.
    let result = service.generate(&map, &node_id).await.unwrap();
    assert!(result.suggestions.is_empty());
}

#[tokio::test]
async fn test_suggestion_checks_node_before_inference() {
    let map = seeded_map().await;

    let client = Arc::new(FailingClient::new());
    let service = SuggestionService::new(client.clone(), InferenceConfig::default());

    let err = service.generate(&map, "no-such-node").await.unwrap_err();
    assert!(matches!(err, MapServiceError::NodeNotFound { .. }));
    // The provider was never reached.
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_suggestion_success_with_bundled_provider() {
    let map = seeded_map().await;
    let node_id = map.nodes[0].id.clone();

    let service = SuggestionService::new(Arc::new(EchoClient), InferenceConfig::default());
    let result = service.generate(&map, &node_id).await.unwrap();

    assert!(!result.suggestions.is_empty());
    for suggestion in &result.suggestions {
        assert!((0.0..=1.0).contains(&suggestion.relevance_score));
    }
}

#[tokio::test]
async fn test_analysis_degrades_but_keeps_metrics() {
    let map = seeded_map().await;

    let service = AnalysisService::new(
        Arc::new(FailingClient::new()),
        InferenceConfig::default(),
    );
    let result = service.analyze(&map).await.unwrap();

    assert!(result.error.is_some());
    assert!(result.insight.is_none());

    // Quantitative metrics never involve inference and survive the outage.
    let metrics = result.metrics.expect("metrics missing from degraded result");
    assert_eq!(metrics.total_nodes, 2);
    assert_eq!(metrics.max_depth, 1);
}

#[tokio::test]
async fn test_analysis_of_empty_map_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let maps = MapService::new(store);
    let map = maps.create_map("alice", "Empty".to_string()).await.unwrap();

    let service = AnalysisService::new(Arc::new(EchoClient), InferenceConfig::default());
    let err = service.analyze(&map).await.unwrap_err();
    assert!(matches!(err, MapServiceError::EmptyGraph));
}

#[tokio::test]
async fn test_analysis_success_populates_scores() {
    let map = seeded_map().await;

    let service = AnalysisService::new(Arc::new(EchoClient), InferenceConfig::default());
    let result = service.analyze(&map).await.unwrap();

    assert!(result.error.is_none());
    assert!(result.insight.is_some());
    let quality = result.structure_quality.unwrap();
    let balance = result.balance_score.unwrap();
    assert!((0.0..=1.0).contains(&quality));
    assert!((0.0..=1.0).contains(&balance));
}
