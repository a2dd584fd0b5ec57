//! Graph Model - Structural Queries Over a Map Snapshot
//!
//! `GraphView` indexes one `MindMap` snapshot for structural queries: depth,
//! children, neighbors, connection lookups. It is pure data - no I/O, no
//! mutation - so any number of concurrent callers (metrics, analysis,
//! suggestions) can build and query views without coordination.
//!
//! # Two views of "children"
//!
//! The map carries two distinct link kinds and the view exposes both:
//!
//! - [`GraphView::children_of`] follows user-drawn `Connection` edges - this
//!   is the canonical "children" notion used by metrics and analysis
//! - [`GraphView::tree_children_of`] follows `parent_id` hierarchy links
//!
//! # Cycle defense
//!
//! Well-formed edits cannot introduce parent cycles, but concurrent
//! last-writer-wins edits or malformed persisted data can. Depth traversal
//! therefore carries an explicit visited set and short-circuits on the first
//! revisited id, returning the depth accumulated so far. Cyclic data
//! degrades to a finite answer; it never hangs or crashes the engine.

pub mod metrics;

pub use metrics::MetricsError;

use crate::models::{Connection, MindMap, Node};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Graph query errors
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    /// Referenced node id is absent from the snapshot
    #[error("Node not found: {id}")]
    NotFound { id: String },
}

/// Indexed, read-only view over one map snapshot.
pub struct GraphView<'a> {
    nodes: HashMap<&'a str, &'a Node>,
    /// Outgoing connections keyed by source node id
    outgoing: HashMap<&'a str, Vec<&'a Connection>>,
    /// Incoming connections keyed by target node id
    incoming: HashMap<&'a str, Vec<&'a Connection>>,
}

impl<'a> GraphView<'a> {
    /// Index a map snapshot. O(nodes + connections).
    pub fn new(map: &'a MindMap) -> Self {
        let mut nodes = HashMap::with_capacity(map.nodes.len());
        for node in &map.nodes {
            nodes.insert(node.id.as_str(), node);
        }

        let mut outgoing: HashMap<&str, Vec<&Connection>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<&Connection>> = HashMap::new();
        for conn in &map.connections {
            outgoing.entry(conn.source_id.as_str()).or_default().push(conn);
            incoming.entry(conn.target_id.as_str()).or_default().push(conn);
        }

        Self {
            nodes,
            outgoing,
            incoming,
        }
    }

    /// Number of nodes in the snapshot
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a node id exists in the snapshot
    pub fn exists(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Look up a node by id
    pub fn node(&self, node_id: &str) -> Result<&'a Node, GraphError> {
        self.nodes
            .get(node_id)
            .copied()
            .ok_or_else(|| GraphError::NotFound {
                id: node_id.to_string(),
            })
    }

    /// Iterate all nodes of the snapshot (arbitrary order)
    pub fn nodes(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes.values().copied()
    }

    /// Hierarchy depth: `parent_id` hops from `node_id` to a parentless root.
    ///
    /// Iterative with an explicit visited set. Traversal stops - returning
    /// the depth accumulated so far - when it reaches a root, when it
    /// revisits an id (parent cycle) or when a parent reference dangles.
    /// Termination is bounded by the snapshot's node count. The only error
    /// is a missing starting id.
    pub fn depth_of(&self, node_id: &str) -> Result<usize, GraphError> {
        let mut current = self.node(node_id)?;
        let mut visited: HashSet<&str> = HashSet::new();
        let mut depth = 0;

        while let Some(parent_id) = current.parent_id.as_deref() {
            if !visited.insert(current.id.as_str()) {
                // Cycle: stop with the depth accumulated so far.
                break;
            }
            match self.nodes.get(parent_id) {
                Some(parent) => {
                    depth += 1;
                    current = parent;
                }
                // Dangling parent reference: treat the last reachable node
                // as the root rather than failing the whole computation.
                None => break,
            }
        }

        Ok(depth)
    }

    /// Children in the connection view: targets of outgoing connections.
    ///
    /// Dangling targets (connection kept, node deleted concurrently) are
    /// skipped rather than reported as errors.
    pub fn children_of(&self, node_id: &str) -> Result<Vec<&'a Node>, GraphError> {
        if !self.exists(node_id) {
            return Err(GraphError::NotFound {
                id: node_id.to_string(),
            });
        }
        Ok(self
            .outgoing
            .get(node_id)
            .into_iter()
            .flatten()
            .filter_map(|conn| self.nodes.get(conn.target_id.as_str()).copied())
            .collect())
    }

    /// Children in the hierarchy view: nodes whose `parent_id` is `node_id`.
    pub fn tree_children_of(&self, node_id: &str) -> Result<Vec<&'a Node>, GraphError> {
        if !self.exists(node_id) {
            return Err(GraphError::NotFound {
                id: node_id.to_string(),
            });
        }
        Ok(self
            .nodes
            .values()
            .filter(|n| n.parent_id.as_deref() == Some(node_id))
            .copied()
            .collect())
    }

    /// Outgoing connections of a node
    pub fn connections_of(&self, node_id: &str) -> Result<Vec<&'a Connection>, GraphError> {
        if !self.exists(node_id) {
            return Err(GraphError::NotFound {
                id: node_id.to_string(),
            });
        }
        Ok(self.outgoing.get(node_id).cloned().unwrap_or_default())
    }

    /// Nodes adjacent via connections in either direction, deduplicated.
    pub fn neighbors(&self, node_id: &str) -> Result<Vec<&'a Node>, GraphError> {
        if !self.exists(node_id) {
            return Err(GraphError::NotFound {
                id: node_id.to_string(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();

        let outgoing = self.outgoing.get(node_id).into_iter().flatten();
        let incoming = self.incoming.get(node_id).into_iter().flatten();

        for conn in outgoing.chain(incoming) {
            let other = if conn.source_id == node_id {
                conn.target_id.as_str()
            } else {
                conn.source_id.as_str()
            };
            if other != node_id && seen.insert(other) {
                if let Some(node) = self.nodes.get(other) {
                    result.push(*node);
                }
            }
        }

        Ok(result)
    }

    /// Total outgoing connection count across all nodes.
    ///
    /// Counted over the connection list, so edges whose source node has been
    /// concurrently removed still count toward the snapshot's edge total.
    pub fn total_connections(&self) -> usize {
        self.outgoing.values().map(|v| v.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Connection, MindMap, Node, Position};

    fn node(id: &str, parent: Option<&str>) -> Node {
        Node::new_with_id(
            id.to_string(),
            format!("label {}", id),
            parent.map(str::to_string),
            Position::default(),
        )
    }

    fn conn(source: &str, target: &str) -> Connection {
        Connection::new(source.to_string(), target.to_string())
    }

    /// Spec-style fixture: A (root) <- B <- C, connections A->B, B->C.
    fn chain_map() -> MindMap {
        let mut map = MindMap::new("user-1".to_string(), "chain".to_string());
        map.nodes = vec![node("A", None), node("B", Some("A")), node("C", Some("B"))];
        map.connections = vec![conn("A", "B"), conn("B", "C")];
        map
    }

    #[test]
    fn test_depth_of_acyclic_chain() {
        let map = chain_map();
        let view = GraphView::new(&map);

        assert_eq!(view.depth_of("A").unwrap(), 0);
        assert_eq!(view.depth_of("B").unwrap(), 1);
        assert_eq!(view.depth_of("C").unwrap(), 2);
    }

    #[test]
    fn test_depth_of_missing_node() {
        let map = chain_map();
        let view = GraphView::new(&map);

        assert_eq!(
            view.depth_of("missing"),
            Err(GraphError::NotFound {
                id: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_depth_of_terminates_on_cycle() {
        // x -> y -> z -> x: a 3-cycle that well-formed edits cannot create
        // but concurrent last-writer-wins edits can.
        let mut map = MindMap::new("user-1".to_string(), "cyclic".to_string());
        map.nodes = vec![
            node("x", Some("y")),
            node("y", Some("z")),
            node("z", Some("x")),
        ];
        let view = GraphView::new(&map);

        for id in ["x", "y", "z"] {
            let depth = view.depth_of(id).unwrap();
            assert!(depth <= 3, "depth {} exceeds cycle length", depth);
        }
    }

    #[test]
    fn test_depth_of_self_cycle() {
        let mut map = MindMap::new("user-1".to_string(), "self".to_string());
        map.nodes = vec![node("a", Some("a"))];
        let view = GraphView::new(&map);

        assert!(view.depth_of("a").unwrap() <= 1);
    }

    #[test]
    fn test_depth_of_dangling_parent() {
        let mut map = MindMap::new("user-1".to_string(), "dangling".to_string());
        map.nodes = vec![node("a", Some("ghost"))];
        let view = GraphView::new(&map);

        // Dangling parent: the node is as rooted as we can prove it to be.
        assert_eq!(view.depth_of("a").unwrap(), 0);
    }

    #[test]
    fn test_children_follow_connections_not_parents() {
        let map = chain_map();
        let view = GraphView::new(&map);

        let children: Vec<&str> = view
            .children_of("A")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(children, vec!["B"]);

        // C has a parent chain but no outgoing connections
        assert!(view.children_of("C").unwrap().is_empty());
    }

    #[test]
    fn test_tree_children_follow_parent_links() {
        let map = chain_map();
        let view = GraphView::new(&map);

        let children: Vec<&str> = view
            .tree_children_of("A")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(children, vec!["B"]);
    }

    #[test]
    fn test_children_skip_dangling_targets() {
        let mut map = chain_map();
        map.connections.push(conn("A", "deleted-node"));
        let view = GraphView::new(&map);

        let children: Vec<&str> = view
            .children_of("A")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(children, vec!["B"]);
    }

    #[test]
    fn test_neighbors_both_directions_deduplicated() {
        let mut map = chain_map();
        // Add a reverse edge B->A; A's neighbors must still be just B.
        map.connections.push(conn("B", "A"));
        let view = GraphView::new(&map);

        let neighbors: Vec<&str> = view
            .neighbors("B")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&"A"));
        assert!(neighbors.contains(&"C"));
    }

    #[test]
    fn test_lookups() {
        let map = chain_map();
        let view = GraphView::new(&map);

        assert!(view.exists("A"));
        assert!(!view.exists("Z"));
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(view.connections_of("A").unwrap().len(), 1);
        assert_eq!(view.connections_of("C").unwrap().len(), 0);
        assert!(view.connections_of("Z").is_err());
        assert_eq!(view.total_connections(), 2);
    }
}
