//! Service Layer Error Types
//!
//! High-level error taxonomy for map operations. Two propagation rules are
//! baked into the variants:
//!
//! - "forbidden" is never distinguishable from "absent": ownership checks
//!   produce [`MapServiceError::MapNotFound`], the same error a missing map
//!   produces
//! - inference failures never appear here - orchestrators absorb them and
//!   degrade (empty suggestions, explicit error payload) instead of failing
//!   the request

use crate::db::DatabaseError;
use crate::graph::MetricsError;
use crate::models::ValidationError;
use thiserror::Error;

/// Map service operation errors
#[derive(Error, Debug)]
pub enum MapServiceError {
    /// Map absent, or present but not owned by the caller
    #[error("Mind map not found: {id}")]
    MapNotFound { id: String },

    /// Node absent from the target map
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Connection absent from the target map
    #[error("Connection not found: {id}")]
    ConnectionNotFound { id: String },

    /// Metrics/analysis requested for a map with zero nodes
    #[error("Map has no nodes; structural metrics are undefined")]
    EmptyGraph,

    /// Edit references entities outside the map or is malformed
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Storage collaborator failure
    #[error("Storage operation failed: {0}")]
    Database(DatabaseError),
}

impl MapServiceError {
    pub fn map_not_found(id: impl Into<String>) -> Self {
        Self::MapNotFound { id: id.into() }
    }

    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    pub fn connection_not_found(id: impl Into<String>) -> Self {
        Self::ConnectionNotFound { id: id.into() }
    }
}

impl From<MetricsError> for MapServiceError {
    fn from(err: MetricsError) -> Self {
        match err {
            MetricsError::EmptyGraph => Self::EmptyGraph,
        }
    }
}

impl From<DatabaseError> for MapServiceError {
    fn from(err: DatabaseError) -> Self {
        // Entity-absence from the store keeps its identity; everything else
        // is a storage fault.
        match err {
            DatabaseError::MapNotFound { id } => Self::MapNotFound { id },
            DatabaseError::NodeNotFound { id } => Self::NodeNotFound { id },
            DatabaseError::ConnectionNotFound { id } => Self::ConnectionNotFound { id },
            other => Self::Database(other),
        }
    }
}
