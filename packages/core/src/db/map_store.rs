//! MapStore Trait - Storage Abstraction Layer
//!
//! Durable storage is an external collaborator; this trait is the narrow
//! interface the core talks to it through. Each method is one atomic commit
//! scope. `get_map` returns nodes and connections eagerly loaded so a
//! `GraphView` can be built from the result without further round trips.
//!
//! # Design decisions
//!
//! 1. **Async-first**: implementations may be embedded or remote
//! 2. **Ownership semantics**: mutating methods take owned values; callers
//!    clone if they need to retain the original
//! 3. **Cascade on node delete**: children are detached (parent link
//!    cleared), touching connections removed - the map never ends up with
//!    references to a node that is gone

use crate::db::error::DatabaseError;
use crate::models::{Connection, MindMap, MindMapUpdate, Node, NodeUpdate};
use async_trait::async_trait;

/// Abstraction over map persistence.
///
/// Implementations must be `Send + Sync`; the hub and API layer share one
/// store behind an `Arc` across concurrent connections.
#[async_trait]
pub trait MapStore: Send + Sync {
    /// Persist a new map
    async fn create_map(&self, map: MindMap) -> Result<MindMap, DatabaseError>;

    /// Fetch a map with nodes and connections eagerly loaded
    async fn get_map(&self, map_id: &str) -> Result<Option<MindMap>, DatabaseError>;

    /// List all maps owned by a user
    async fn list_maps(&self, owner_id: &str) -> Result<Vec<MindMap>, DatabaseError>;

    /// Apply a partial update to map-level fields
    async fn update_map(
        &self,
        map_id: &str,
        update: MindMapUpdate,
    ) -> Result<MindMap, DatabaseError>;

    /// Delete a map and everything in it
    async fn delete_map(&self, map_id: &str) -> Result<(), DatabaseError>;

    /// Add a node to a map
    async fn create_node(&self, map_id: &str, node: Node) -> Result<Node, DatabaseError>;

    /// Apply a partial update to a node
    async fn update_node(
        &self,
        map_id: &str,
        node_id: &str,
        update: NodeUpdate,
    ) -> Result<Node, DatabaseError>;

    /// Remove a node; detaches its tree children and removes connections
    /// touching it
    async fn delete_node(&self, map_id: &str, node_id: &str) -> Result<(), DatabaseError>;

    /// Add a connection to a map
    async fn create_connection(
        &self,
        map_id: &str,
        connection: Connection,
    ) -> Result<Connection, DatabaseError>;

    /// Remove a connection
    async fn delete_connection(
        &self,
        map_id: &str,
        connection_id: &str,
    ) -> Result<(), DatabaseError>;
}
