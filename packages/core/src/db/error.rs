//! Storage Layer Error Types

use thiserror::Error;

/// Errors surfaced by `MapStore` implementations
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Map not found: {id}")]
    MapNotFound { id: String },

    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    #[error("Connection not found: {id}")]
    ConnectionNotFound { id: String },

    /// Duplicate id or similar uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend-specific failure (connection loss, corrupt state, ...)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl DatabaseError {
    pub fn map_not_found(id: impl Into<String>) -> Self {
        Self::MapNotFound { id: id.into() }
    }

    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    pub fn connection_not_found(id: impl Into<String>) -> Self {
        Self::ConnectionNotFound { id: id.into() }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
