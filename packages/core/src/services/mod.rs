//! Service layer
//!
//! Orchestration over the storage, graph and inference collaborators:
//! CRUD with ownership checks ([`MapService`]), per-node suggestions
//! ([`SuggestionService`]) and full-map analysis ([`AnalysisService`]).

pub mod analysis_service;
pub mod error;
pub mod map_service;
pub mod suggestion_service;

pub use analysis_service::AnalysisService;
pub use error::MapServiceError;
pub use map_service::{CreateNodeParams, MapService};
pub use suggestion_service::SuggestionService;
