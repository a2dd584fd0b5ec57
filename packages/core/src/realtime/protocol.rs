//! Realtime Wire Protocol
//!
//! JSON messages exchanged over a map's realtime session. Clients send
//! [`ClientMessage`] frames; the hub broadcasts [`MapEvent`] frames to every
//! participant of the same map after an edit is applied.
//!
//! Both directions are internally tagged (`"type"` for the envelope,
//! `"action"` for edit operations) so unknown frames fail deserialization
//! instead of being silently misread.

use crate::models::{Connection, Node, NodeUpdate, Position};
use serde::{Deserialize, Serialize};

/// Close code sent when the session targets a map the caller cannot see
/// (absent or owned by someone else).
pub const CLOSE_NOT_FOUND: u16 = 4004;

/// Close code sent on internal failure while serving the session.
pub const CLOSE_INTERNAL: u16 = 4000;

/// Frames accepted from clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// A mutation request against the session's map
    Edit {
        #[serde(flatten)]
        op: EditOp,
    },
}

/// Edit operations a participant can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum EditOp {
    #[serde(rename_all = "camelCase")]
    CreateNode {
        /// Optional client-generated id; auto-generated when absent
        #[serde(default)]
        id: Option<String>,
        text: String,
        #[serde(default)]
        parent_id: Option<String>,
        #[serde(default)]
        position: Position,
    },
    UpdateNode {
        id: String,
        update: NodeUpdate,
    },
    DeleteNode {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    CreateConnection {
        source_id: String,
        target_id: String,
    },
    DeleteConnection {
        id: String,
    },
}

/// Frames broadcast to every participant of a map after a successful edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapEvent {
    NodeCreated { node: Node },
    NodeUpdated { node: Node },
    NodeDeleted { id: String },
    ConnectionCreated { connection: Connection },
    ConnectionDeleted { id: String },
}
