//! Map Service - CRUD Boundary With Ownership Checks
//!
//! Thin authorization + validation layer over the [`MapStore`] collaborator.
//! Every operation takes the acting user's resolved identity; an ownership
//! mismatch surfaces as [`MapServiceError::MapNotFound`], indistinguishable
//! from a map that does not exist. That is deliberate information hiding:
//! callers cannot probe for the existence of other users' maps.
//!
//! Node and connection edits are validated against the map's current state
//! before anything is persisted: referenced parents and endpoints must live
//! in the same map.

use crate::db::MapStore;
use crate::models::{
    Connection, MindMap, MindMapUpdate, Node, NodeUpdate, Position, ValidationError,
};
use crate::services::error::MapServiceError;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Parameters for creating a node through the service boundary
#[derive(Debug, Clone)]
pub struct CreateNodeParams {
    /// Optional client-generated ID; auto-generated when `None`
    pub id: Option<String>,
    /// Node label
    pub text: String,
    /// Optional hierarchy parent, must exist in the target map
    pub parent_id: Option<String>,
    /// Canvas position
    pub position: Position,
}

/// CRUD boundary over maps, nodes and connections.
///
/// Shared behind an `Arc` by the API layer and the realtime hub.
pub struct MapService {
    store: Arc<dyn MapStore>,
}

impl MapService {
    pub fn new(store: Arc<dyn MapStore>) -> Self {
        Self { store }
    }

    /// Fetch a map the caller owns.
    ///
    /// The single authorization gate: absence and foreign ownership both
    /// yield `MapNotFound`.
    pub async fn get_map(&self, user_id: &str, map_id: &str) -> Result<MindMap, MapServiceError> {
        match self.store.get_map(map_id).await? {
            Some(map) if map.owner_id == user_id => Ok(map),
            _ => Err(MapServiceError::map_not_found(map_id)),
        }
    }

    /// Create a new empty map owned by the caller
    #[instrument(skip(self))]
    pub async fn create_map(
        &self,
        user_id: &str,
        title: String,
    ) -> Result<MindMap, MapServiceError> {
        let map = MindMap::new(user_id.to_string(), title);
        debug!(map_id = %map.id, "creating mind map");
        Ok(self.store.create_map(map).await?)
    }

    /// List the caller's maps
    pub async fn list_maps(&self, user_id: &str) -> Result<Vec<MindMap>, MapServiceError> {
        Ok(self.store.list_maps(user_id).await?)
    }

    /// Update map-level fields
    #[instrument(skip(self, update))]
    pub async fn update_map(
        &self,
        user_id: &str,
        map_id: &str,
        update: MindMapUpdate,
    ) -> Result<MindMap, MapServiceError> {
        self.get_map(user_id, map_id).await?;
        Ok(self.store.update_map(map_id, update).await?)
    }

    /// Delete a map the caller owns
    #[instrument(skip(self))]
    pub async fn delete_map(&self, user_id: &str, map_id: &str) -> Result<(), MapServiceError> {
        self.get_map(user_id, map_id).await?;
        Ok(self.store.delete_map(map_id).await?)
    }

    /// Create a node inside a map the caller owns.
    ///
    /// A `parent_id`, when present, must reference a node already in the
    /// map.
    #[instrument(skip(self, params))]
    pub async fn create_node(
        &self,
        user_id: &str,
        map_id: &str,
        params: CreateNodeParams,
    ) -> Result<Node, MapServiceError> {
        let map = self.get_map(user_id, map_id).await?;

        if let Some(parent_id) = &params.parent_id {
            if !map.contains_node(parent_id) {
                return Err(ValidationError::ForeignEntity(format!(
                    "parent node {} is not in map {}",
                    parent_id, map_id
                ))
                .into());
            }
        }

        let node = match params.id {
            Some(id) => Node::new_with_id(id, params.text, params.parent_id, params.position),
            None => Node::new(params.text, params.parent_id, params.position),
        };
        node.validate()?;

        Ok(self.store.create_node(map_id, node).await?)
    }

    /// Apply a partial update to a node.
    ///
    /// Re-parenting validates the new parent exists in the map and is not
    /// the node itself. (A cross-node parent cycle racing in through
    /// concurrent edits is tolerated by the graph layer rather than
    /// prevented here; see `graph::GraphView::depth_of`.)
    #[instrument(skip(self, update))]
    pub async fn update_node(
        &self,
        user_id: &str,
        map_id: &str,
        node_id: &str,
        update: NodeUpdate,
    ) -> Result<Node, MapServiceError> {
        let map = self.get_map(user_id, map_id).await?;
        if !map.contains_node(node_id) {
            return Err(MapServiceError::node_not_found(node_id));
        }

        if let Some(Some(new_parent)) = &update.parent_id {
            if new_parent == node_id {
                return Err(ValidationError::SelfReference(
                    "node cannot be its own parent".to_string(),
                )
                .into());
            }
            if !map.contains_node(new_parent) {
                return Err(ValidationError::ForeignEntity(format!(
                    "parent node {} is not in map {}",
                    new_parent, map_id
                ))
                .into());
            }
        }

        Ok(self.store.update_node(map_id, node_id, update).await?)
    }

    /// Delete a node (storage layer cascades children/connections)
    #[instrument(skip(self))]
    pub async fn delete_node(
        &self,
        user_id: &str,
        map_id: &str,
        node_id: &str,
    ) -> Result<(), MapServiceError> {
        let map = self.get_map(user_id, map_id).await?;
        if !map.contains_node(node_id) {
            return Err(MapServiceError::node_not_found(node_id));
        }
        Ok(self.store.delete_node(map_id, node_id).await?)
    }

    /// Create a connection; both endpoints must exist in the map.
    #[instrument(skip(self))]
    pub async fn create_connection(
        &self,
        user_id: &str,
        map_id: &str,
        source_id: String,
        target_id: String,
    ) -> Result<Connection, MapServiceError> {
        let map = self.get_map(user_id, map_id).await?;

        let connection = Connection::new(source_id, target_id);
        connection.validate()?;

        for endpoint in [&connection.source_id, &connection.target_id] {
            if !map.contains_node(endpoint) {
                return Err(ValidationError::ForeignEntity(format!(
                    "node {} is not in map {}",
                    endpoint, map_id
                ))
                .into());
            }
        }

        Ok(self.store.create_connection(map_id, connection).await?)
    }

    /// Delete a connection
    #[instrument(skip(self))]
    pub async fn delete_connection(
        &self,
        user_id: &str,
        map_id: &str,
        connection_id: &str,
    ) -> Result<(), MapServiceError> {
        let map = self.get_map(user_id, map_id).await?;
        if map.connection(connection_id).is_none() {
            return Err(MapServiceError::connection_not_found(connection_id));
        }
        Ok(self.store.delete_connection(map_id, connection_id).await?)
    }
}
