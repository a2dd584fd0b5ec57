//! MindMesh Core
//!
//! Collaborative mind-map engine: graph model and structural metrics over
//! map snapshots, AI-assisted analysis and suggestion orchestration, map
//! CRUD with ownership checks, and a per-map realtime session hub, exposed
//! through an HTTP/WebSocket API.
//!
//! # Architecture
//!
//! - [`models`] — wire-facing data types (maps, nodes, connections, derived
//!   analysis types)
//! - [`graph`] — read-only structural queries and metrics over one snapshot
//! - [`db`] — the [`db::MapStore`] storage seam and the in-memory reference
//!   backend
//! - [`services`] — orchestration: CRUD with ownership-as-absence, and the
//!   degradation-first AI orchestrators
//! - [`realtime`] — per-map broadcast sessions and the wire protocol
//! - [`api`] — axum router, identity resolution, error mapping

pub mod api;
pub mod db;
pub mod graph;
pub mod models;
pub mod realtime;
pub mod services;

pub use api::{build_router, AppState};
pub use db::{MapStore, MemoryStore};
pub use graph::GraphView;
pub use models::{Connection, MindMap, Node, Position};
pub use services::{AnalysisService, MapService, MapServiceError, SuggestionService};
