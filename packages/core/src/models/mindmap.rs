//! Mind Map and Connection Data Structures
//!
//! A `MindMap` owns its nodes and its user-drawn `Connection` edges. The map
//! is the unit of ownership (one owning user), of realtime collaboration
//! (one hub session per map) and of storage atomicity (one commit scope per
//! store call).
//!
//! Connections are directed `source -> target` edges distinct from the
//! `parent_id` hierarchy links: they express explicit user-drawn
//! relationships, and the graph layer derives its "children" view from them.

use crate::models::node::{Node, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed user-drawn edge between two nodes of the same map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Unique identifier (UUID)
    pub id: String,

    /// Origin node
    pub source_id: String,

    /// Destination node
    pub target_id: String,
}

impl Connection {
    /// Create a new connection with an auto-generated UUID
    pub fn new(source_id: String, target_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_id,
            target_id,
        }
    }

    /// Validate connection structure
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` on empty endpoints or a self-loop. Whether
    /// the endpoints actually exist in the map is checked by the service
    /// layer, which has the map in hand.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_id.is_empty() || self.target_id.is_empty() {
            return Err(ValidationError::MissingField(
                "connection endpoints".to_string(),
            ));
        }
        if self.source_id == self.target_id {
            return Err(ValidationError::SelfReference(
                "connection cannot loop onto its own node".to_string(),
            ));
        }
        Ok(())
    }
}

/// A user-owned mind map: nodes plus connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMap {
    /// Unique identifier (UUID)
    pub id: String,

    /// Stable identifier of the owning user (resolved upstream by auth)
    pub owner_id: String,

    /// User-visible title
    pub title: String,

    /// All nodes of the map
    pub nodes: Vec<Node>,

    /// All user-drawn connections of the map
    pub connections: Vec<Connection>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (bumped on node/connection edits too)
    pub modified_at: DateTime<Utc>,
}

impl MindMap {
    /// Create a new empty map
    pub fn new(owner_id: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            title,
            nodes: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Look up a node by id
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// Whether a node id exists in this map
    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node(node_id).is_some()
    }

    /// Look up a connection by id
    pub fn connection(&self, connection_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == connection_id)
    }

    /// Mark the map as modified now
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Partial map update for PATCH operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapUpdate {
    /// Update the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    #[test]
    fn test_map_creation() {
        let map = MindMap::new("user-1".to_string(), "Research".to_string());

        assert!(!map.id.is_empty());
        assert_eq!(map.owner_id, "user-1");
        assert_eq!(map.title, "Research");
        assert!(map.nodes.is_empty());
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_map_node_lookup() {
        let mut map = MindMap::new("user-1".to_string(), "Research".to_string());
        let node = Node::new("A".to_string(), None, Position::default());
        let node_id = node.id.clone();
        map.nodes.push(node);

        assert!(map.contains_node(&node_id));
        assert_eq!(map.node(&node_id).unwrap().text, "A");
        assert!(!map.contains_node("missing"));
        assert!(map.node("missing").is_none());
    }

    #[test]
    fn test_connection_validation() {
        let conn = Connection::new("a".to_string(), "b".to_string());
        assert!(conn.validate().is_ok());

        let self_loop = Connection::new("a".to_string(), "a".to_string());
        assert!(self_loop.validate().is_err());

        let empty = Connection::new(String::new(), "b".to_string());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_map_serialization_camel_case() {
        let mut map = MindMap::new("user-1".to_string(), "Research".to_string());
        map.connections
            .push(Connection::new("a".to_string(), "b".to_string()));

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["ownerId"], "user-1");
        assert_eq!(json["connections"][0]["sourceId"], "a");
        assert_eq!(json["connections"][0]["targetId"], "b");
    }
}
