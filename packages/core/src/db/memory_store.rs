//! In-Memory MapStore
//!
//! Reference `MapStore` implementation backed by a `tokio::sync::RwLock`
//! over a map-id keyed table. Used by tests and the bundled server binary;
//! deployments substitute a durable backend behind the same trait.
//!
//! Each method takes the write lock exactly once, which gives every call the
//! session-scoped atomicity the trait contract requires.

use crate::db::error::DatabaseError;
use crate::db::map_store::MapStore;
use crate::models::{Connection, MindMap, MindMapUpdate, Node, NodeUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory map table
#[derive(Default)]
pub struct MemoryStore {
    maps: RwLock<HashMap<String, MindMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MapStore for MemoryStore {
    async fn create_map(&self, map: MindMap) -> Result<MindMap, DatabaseError> {
        let mut maps = self.maps.write().await;
        if maps.contains_key(&map.id) {
            return Err(DatabaseError::conflict(format!(
                "map {} already exists",
                map.id
            )));
        }
        debug!(map_id = %map.id, "creating map");
        maps.insert(map.id.clone(), map.clone());
        Ok(map)
    }

    async fn get_map(&self, map_id: &str) -> Result<Option<MindMap>, DatabaseError> {
        Ok(self.maps.read().await.get(map_id).cloned())
    }

    async fn list_maps(&self, owner_id: &str) -> Result<Vec<MindMap>, DatabaseError> {
        let maps = self.maps.read().await;
        let mut owned: Vec<MindMap> = maps
            .values()
            .filter(|m| m.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(owned)
    }

    async fn update_map(
        &self,
        map_id: &str,
        update: MindMapUpdate,
    ) -> Result<MindMap, DatabaseError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .get_mut(map_id)
            .ok_or_else(|| DatabaseError::map_not_found(map_id))?;

        if let Some(title) = update.title {
            map.title = title;
        }
        map.touch();
        Ok(map.clone())
    }

    async fn delete_map(&self, map_id: &str) -> Result<(), DatabaseError> {
        let mut maps = self.maps.write().await;
        maps.remove(map_id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::map_not_found(map_id))
    }

    async fn create_node(&self, map_id: &str, node: Node) -> Result<Node, DatabaseError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .get_mut(map_id)
            .ok_or_else(|| DatabaseError::map_not_found(map_id))?;

        if map.contains_node(&node.id) {
            return Err(DatabaseError::conflict(format!(
                "node {} already exists in map {}",
                node.id, map_id
            )));
        }
        map.nodes.push(node.clone());
        map.touch();
        Ok(node)
    }

    async fn update_node(
        &self,
        map_id: &str,
        node_id: &str,
        update: NodeUpdate,
    ) -> Result<Node, DatabaseError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .get_mut(map_id)
            .ok_or_else(|| DatabaseError::map_not_found(map_id))?;

        let node = map
            .nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| DatabaseError::node_not_found(node_id))?;

        if let Some(text) = update.text {
            node.text = text;
        }
        if let Some(parent_id) = update.parent_id {
            node.parent_id = parent_id;
        }
        if let Some(position) = update.position {
            node.position = position;
        }
        node.modified_at = chrono::Utc::now();
        let updated = node.clone();
        map.touch();
        Ok(updated)
    }

    async fn delete_node(&self, map_id: &str, node_id: &str) -> Result<(), DatabaseError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .get_mut(map_id)
            .ok_or_else(|| DatabaseError::map_not_found(map_id))?;

        let before = map.nodes.len();
        map.nodes.retain(|n| n.id != node_id);
        if map.nodes.len() == before {
            return Err(DatabaseError::node_not_found(node_id));
        }

        // Cascade: detach tree children, drop touching connections.
        for node in &mut map.nodes {
            if node.parent_id.as_deref() == Some(node_id) {
                node.parent_id = None;
            }
        }
        map.connections
            .retain(|c| c.source_id != node_id && c.target_id != node_id);
        map.touch();
        Ok(())
    }

    async fn create_connection(
        &self,
        map_id: &str,
        connection: Connection,
    ) -> Result<Connection, DatabaseError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .get_mut(map_id)
            .ok_or_else(|| DatabaseError::map_not_found(map_id))?;

        if map.connection(&connection.id).is_some() {
            return Err(DatabaseError::conflict(format!(
                "connection {} already exists in map {}",
                connection.id, map_id
            )));
        }
        map.connections.push(connection.clone());
        map.touch();
        Ok(connection)
    }

    async fn delete_connection(
        &self,
        map_id: &str,
        connection_id: &str,
    ) -> Result<(), DatabaseError> {
        let mut maps = self.maps.write().await;
        let map = maps
            .get_mut(map_id)
            .ok_or_else(|| DatabaseError::map_not_found(map_id))?;

        let before = map.connections.len();
        map.connections.retain(|c| c.id != connection_id);
        if map.connections.len() == before {
            return Err(DatabaseError::connection_not_found(connection_id));
        }
        map.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn test_node(id: &str, parent: Option<&str>) -> Node {
        Node::new_with_id(
            id.to_string(),
            id.to_string(),
            parent.map(str::to_string),
            Position::default(),
        )
    }

    #[tokio::test]
    async fn test_map_crud_roundtrip() {
        let store = MemoryStore::new();
        let map = MindMap::new("user-1".to_string(), "Research".to_string());
        let map_id = map.id.clone();

        store.create_map(map).await.unwrap();
        let fetched = store.get_map(&map_id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Research");

        let updated = store
            .update_map(
                &map_id,
                MindMapUpdate {
                    title: Some("Renamed".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");

        store.delete_map(&map_id).await.unwrap();
        assert!(store.get_map(&map_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_map_is_conflict() {
        let store = MemoryStore::new();
        let map = MindMap::new("user-1".to_string(), "M".to_string());

        store.create_map(map.clone()).await.unwrap();
        assert!(matches!(
            store.create_map(map).await,
            Err(DatabaseError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_list_maps_filters_by_owner() {
        let store = MemoryStore::new();
        store
            .create_map(MindMap::new("alice".to_string(), "A".to_string()))
            .await
            .unwrap();
        store
            .create_map(MindMap::new("bob".to_string(), "B".to_string()))
            .await
            .unwrap();

        let alices = store.list_maps("alice").await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].title, "A");
    }

    #[tokio::test]
    async fn test_delete_node_cascades() {
        let store = MemoryStore::new();
        let map = MindMap::new("user-1".to_string(), "M".to_string());
        let map_id = map.id.clone();
        store.create_map(map).await.unwrap();

        store
            .create_node(&map_id, test_node("parent", None))
            .await
            .unwrap();
        store
            .create_node(&map_id, test_node("child", Some("parent")))
            .await
            .unwrap();
        store
            .create_connection(
                &map_id,
                Connection::new("parent".to_string(), "child".to_string()),
            )
            .await
            .unwrap();

        store.delete_node(&map_id, "parent").await.unwrap();

        let map = store.get_map(&map_id).await.unwrap().unwrap();
        assert_eq!(map.nodes.len(), 1);
        // Child was detached, not deleted.
        assert!(map.node("child").unwrap().parent_id.is_none());
        // Touching connection removed.
        assert!(map.connections.is_empty());
    }

    #[tokio::test]
    async fn test_update_node_double_option_parent() {
        let store = MemoryStore::new();
        let map = MindMap::new("user-1".to_string(), "M".to_string());
        let map_id = map.id.clone();
        store.create_map(map).await.unwrap();
        store
            .create_node(&map_id, test_node("a", None))
            .await
            .unwrap();
        store
            .create_node(&map_id, test_node("b", Some("a")))
            .await
            .unwrap();

        // Some(None) clears the link
        let updated = store
            .update_node(&map_id, "b", NodeUpdate::new().with_parent(None))
            .await
            .unwrap();
        assert!(updated.parent_id.is_none());

        // None leaves it alone
        let updated = store
            .update_node(
                &map_id,
                "b",
                NodeUpdate::new().with_text("renamed".to_string()),
            )
            .await
            .unwrap();
        assert!(updated.parent_id.is_none());
        assert_eq!(updated.text, "renamed");
    }

    #[tokio::test]
    async fn test_missing_entities_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_map("ghost").await,
            Err(DatabaseError::MapNotFound { .. })
        ));

        let map = MindMap::new("user-1".to_string(), "M".to_string());
        let map_id = map.id.clone();
        store.create_map(map).await.unwrap();

        assert!(matches!(
            store.delete_node(&map_id, "ghost").await,
            Err(DatabaseError::NodeNotFound { .. })
        ));
        assert!(matches!(
            store.delete_connection(&map_id, "ghost").await,
            Err(DatabaseError::ConnectionNotFound { .. })
        ));
    }
}
