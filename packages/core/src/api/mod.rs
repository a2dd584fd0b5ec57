//! HTTP/WebSocket API surface
//!
//! axum router over the service layer: map CRUD, node and connection edits,
//! analysis and suggestion endpoints, and the realtime WebSocket upgrade.

pub mod error;
pub mod identity;
pub mod routes;
pub mod ws;

pub use error::ApiError;
pub use identity::{HeaderResolver, IdentityResolver};
pub use routes::build_router;

use crate::db::MapStore;
use crate::realtime::SessionHub;
use crate::services::{AnalysisService, MapService, SuggestionService};
use mindmesh_ai_engine::{InferenceClient, InferenceConfig};
use std::sync::Arc;

/// Shared application state behind every handler.
pub struct AppState {
    pub maps: Arc<MapService>,
    pub hub: Arc<SessionHub>,
    pub suggestions: Arc<SuggestionService>,
    pub analysis: Arc<AnalysisService>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    /// Wire the full service stack over one store and one inference client.
    pub fn new(
        store: Arc<dyn MapStore>,
        client: Arc<dyn InferenceClient>,
        config: InferenceConfig,
    ) -> Self {
        let maps = Arc::new(MapService::new(store));
        Self {
            hub: Arc::new(SessionHub::new(Arc::clone(&maps))),
            suggestions: Arc::new(SuggestionService::new(
                Arc::clone(&client),
                config.clone(),
            )),
            analysis: Arc::new(AnalysisService::new(client, config)),
            maps,
            identity: Arc::new(HeaderResolver),
        }
    }

    /// Replace the identity resolver (tests inject doubles here).
    pub fn with_identity(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.identity = resolver;
        self
    }
}
