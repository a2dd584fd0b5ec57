//! REST Routes
//!
//! Thin translation layer: resolve identity, call the service, map the
//! result. All domain rules (ownership-as-absence, validation, degradation)
//! live below this module.

use crate::api::error::ApiError;
use crate::api::ws::ws_map_handler;
use crate::api::AppState;
use crate::models::{
    AnalysisResult, Connection, MindMap, MindMapUpdate, Node, NodeUpdate, Position,
    SuggestionResult,
};
use crate::services::CreateNodeParams;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/maps", post(create_map).get(list_maps))
        .route(
            "/api/v1/maps/:id",
            get(get_map).put(update_map).delete(delete_map),
        )
        .route("/api/v1/maps/:id/nodes", post(create_node))
        .route(
            "/api/v1/maps/:id/nodes/:node_id",
            put(update_node).delete(delete_node),
        )
        .route("/api/v1/maps/:id/connections", post(create_connection))
        .route(
            "/api/v1/maps/:id/connections/:conn_id",
            axum::routing::delete(delete_connection),
        )
        .route("/api/v1/maps/:id/analyze", post(analyze_map))
        .route("/api/v1/maps/:id/suggest/:node_id", post(suggest_for_node))
        .route("/api/v1/ws/maps/:id", get(ws_map_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn identity(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    state
        .identity
        .resolve(headers)
        .ok_or(ApiError::UnresolvedIdentity)
}

async fn health() -> &'static str {
    "OK"
}

// --- Map endpoints ---

#[derive(Debug, Deserialize)]
struct CreateMapRequest {
    title: String,
}

async fn create_map(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateMapRequest>,
) -> Result<(StatusCode, Json<MindMap>), ApiError> {
    let user = identity(&state, &headers)?;
    let map = state.maps.create_map(&user, req.title).await?;
    Ok((StatusCode::CREATED, Json(map)))
}

async fn list_maps(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<MindMap>>, ApiError> {
    let user = identity(&state, &headers)?;
    Ok(Json(state.maps.list_maps(&user).await?))
}

async fn get_map(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(map_id): Path<String>,
) -> Result<Json<MindMap>, ApiError> {
    let user = identity(&state, &headers)?;
    Ok(Json(state.maps.get_map(&user, &map_id).await?))
}

async fn update_map(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(map_id): Path<String>,
    Json(update): Json<MindMapUpdate>,
) -> Result<Json<MindMap>, ApiError> {
    let user = identity(&state, &headers)?;
    Ok(Json(state.maps.update_map(&user, &map_id, update).await?))
}

async fn delete_map(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(map_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user = identity(&state, &headers)?;
    state.maps.delete_map(&user, &map_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Node endpoints ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNodeRequest {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    position: Position,
}

async fn create_node(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(map_id): Path<String>,
    Json(req): Json<CreateNodeRequest>,
) -> Result<(StatusCode, Json<Node>), ApiError> {
    let user = identity(&state, &headers)?;
    let node = state
        .maps
        .create_node(
            &user,
            &map_id,
            CreateNodeParams {
                id: req.id,
                text: req.text,
                parent_id: req.parent_id,
                position: req.position,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(node)))
}

async fn update_node(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((map_id, node_id)): Path<(String, String)>,
    Json(update): Json<NodeUpdate>,
) -> Result<Json<Node>, ApiError> {
    let user = identity(&state, &headers)?;
    Ok(Json(
        state
            .maps
            .update_node(&user, &map_id, &node_id, update)
            .await?,
    ))
}

async fn delete_node(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((map_id, node_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let user = identity(&state, &headers)?;
    state.maps.delete_node(&user, &map_id, &node_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Connection endpoints ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateConnectionRequest {
    source_id: String,
    target_id: String,
}

async fn create_connection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(map_id): Path<String>,
    Json(req): Json<CreateConnectionRequest>,
) -> Result<(StatusCode, Json<Connection>), ApiError> {
    let user = identity(&state, &headers)?;
    let connection = state
        .maps
        .create_connection(&user, &map_id, req.source_id, req.target_id)
        .await?;
    Ok((StatusCode::CREATED, Json(connection)))
}

async fn delete_connection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((map_id, conn_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let user = identity(&state, &headers)?;
    state
        .maps
        .delete_connection(&user, &map_id, &conn_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Analysis / suggestion endpoints ---

async fn analyze_map(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(map_id): Path<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let user = identity(&state, &headers)?;
    let map = state.maps.get_map(&user, &map_id).await?;
    Ok(Json(state.analysis.analyze(&map).await?))
}

async fn suggest_for_node(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((map_id, node_id)): Path<(String, String)>,
) -> Result<Json<SuggestionResult>, ApiError> {
    let user = identity(&state, &headers)?;
    let map = state.maps.get_map(&user, &map_id).await?;
    Ok(Json(state.suggestions.generate(&map, &node_id).await?))
}
