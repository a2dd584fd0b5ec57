//! Node Data Structures
//!
//! This module defines the `Node` struct for mind-map vertices plus the
//! partial-update type used by PATCH-style edits.
//!
//! # Architecture
//!
//! - **Label + position**: a node carries user text and an x/y position the
//!   core treats as opaque layout data
//! - **Two link kinds**: the optional `parent_id` hierarchy link lives on the
//!   node; user-drawn `Connection` edges live on the map
//! - **Cycle defense**: a node can never reference itself, but cross-node
//!   parent cycles introduced by concurrent edits are tolerated by the graph
//!   layer (see `graph::GraphView::depth_of`)
//!
//! # Examples
//!
//! ```rust
//! use mindmesh_core::models::{Node, Position};
//!
//! let root = Node::new("Distributed systems".to_string(), None, Position::new(0.0, 0.0));
//! let child = Node::new(
//!     "Consensus".to_string(),
//!     Some(root.id.clone()),
//!     Position::new(120.0, 40.0),
//! );
//!
//! assert!(root.is_root());
//! assert!(!child.is_root());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for map entities
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Self reference: {0}")]
    SelfReference(String),

    #[error("Entity outside map: {0}")]
    ForeignEntity(String),
}

/// Canvas position of a node. Opaque to the core; persisted and broadcast
/// verbatim for clients to lay out the map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A labeled vertex in a mind map.
///
/// # Fields
///
/// - `id`: unique within a map (UUID)
/// - `text`: user-visible label
/// - `parent_id`: optional hierarchy link to another node in the same map;
///   `None` marks a root
/// - `position`: opaque x/y layout data
/// - `created_at` / `modified_at`: timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (UUID)
    pub id: String,

    /// User-visible label
    pub text: String,

    /// Hierarchy link; `None` for roots
    pub parent_id: Option<String>,

    /// Canvas position, opaque to the core
    #[serde(default)]
    pub position: Position,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl Node {
    /// Create a new node with an auto-generated UUID
    pub fn new(text: String, parent_id: Option<String>, position: Position) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), text, parent_id, position)
    }

    /// Create a new node with an explicit ID
    ///
    /// Used when a client pre-generates the ID for optimistic UI updates;
    /// the store enforces uniqueness on insert.
    pub fn new_with_id(
        id: String,
        text: String,
        parent_id: Option<String>,
        position: Position,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            text,
            parent_id,
            position,
            created_at: now,
            modified_at: now,
        }
    }

    /// Validate node structure
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if `id` is empty or the node references
    /// itself as its own parent. Empty `text` is allowed: blank nodes are
    /// created while a user is still typing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if let Some(parent_id) = &self.parent_id {
            if parent_id == &self.id {
                return Err(ValidationError::SelfReference(
                    "node cannot be its own parent".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Whether this node is a root (no parent link)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Update the node's label
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.modified_at = Utc::now();
    }
}

/// Custom deserializer for optional fields that accepts both plain values
/// and null.
///
/// Maps three input formats onto the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (set to NULL)
/// - "value" → Some(Some("value")) (set to value)
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    // Missing field is handled by #[serde(default)] on the struct field
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update for PATCH-style edits
///
/// `parent_id` uses the double-`Option` pattern so "detach from parent" and
/// "leave parent unchanged" stay distinguishable on the wire:
///
/// - `None`: don't change the parent link
/// - `Some(None)`: clear it (node becomes a root)
/// - `Some(Some(id))`: re-parent under `id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    /// Update the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Update the hierarchy link (double-Option, see type docs)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub parent_id: Option<Option<String>>,

    /// Update the canvas position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl NodeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Check if the update contains any changes
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.parent_id.is_none() && self.position.is_none()
    }
}
