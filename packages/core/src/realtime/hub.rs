//! Session Hub - Per-Map Realtime Fanout
//!
//! One broadcast channel per open map. Participants join a map's session to
//! get a receiver for its event stream; edits applied through the hub are
//! persisted via the map service and then fanned out to every participant of
//! that map and no other. Sessions are created lazily on first join and torn
//! down when the last participant leaves.

use crate::realtime::protocol::{EditOp, MapEvent, CLOSE_INTERNAL, CLOSE_NOT_FOUND};
use crate::services::{CreateNodeParams, MapService, MapServiceError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, instrument};

/// Broadcast buffer per map session. A receiver that falls further behind
/// than this sees `Lagged` and resumes from the oldest retained event.
const SESSION_CHANNEL_CAPACITY: usize = 128;

/// Errors surfaced to the realtime boundary.
#[derive(Error, Debug)]
pub enum HubError {
    #[error(transparent)]
    Service(#[from] MapServiceError),

    /// Frame parsed but referenced no applicable operation
    #[error("Invalid realtime message: {0}")]
    InvalidMessage(String),
}

impl HubError {
    /// WebSocket close code for this failure: entity absence (including
    /// ownership mismatches, which read as absence) closes with 4004,
    /// anything else with 4000.
    pub fn close_code(&self) -> u16 {
        match self {
            Self::Service(
                MapServiceError::MapNotFound { .. }
                | MapServiceError::NodeNotFound { .. }
                | MapServiceError::ConnectionNotFound { .. },
            ) => CLOSE_NOT_FOUND,
            _ => CLOSE_INTERNAL,
        }
    }
}

struct MapSession {
    events: broadcast::Sender<MapEvent>,
    participants: usize,
}

/// Per-map realtime sessions over a shared [`MapService`].
pub struct SessionHub {
    service: Arc<MapService>,
    sessions: RwLock<HashMap<String, MapSession>>,
}

impl SessionHub {
    pub fn new(service: Arc<MapService>) -> Self {
        Self {
            service,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Join a map's session, creating it on first join.
    ///
    /// The caller's access is checked up front; a map that is absent or
    /// foreign-owned fails here (close code 4004) before any session state
    /// is touched.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        user_id: &str,
        map_id: &str,
    ) -> Result<broadcast::Receiver<MapEvent>, HubError> {
        self.service.get_map(user_id, map_id).await?;

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(map_id.to_string()).or_insert_with(|| {
            debug!(map_id, "opening realtime session");
            let (events, _) = broadcast::channel(SESSION_CHANNEL_CAPACITY);
            MapSession {
                events,
                participants: 0,
            }
        });
        session.participants += 1;
        Ok(session.events.subscribe())
    }

    /// Leave a map's session; the session is dropped with its last
    /// participant. Leaving an unknown session is a no-op.
    #[instrument(skip(self))]
    pub async fn leave(&self, map_id: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(map_id) {
            session.participants = session.participants.saturating_sub(1);
            if session.participants == 0 {
                debug!(map_id, "closing realtime session");
                sessions.remove(map_id);
            }
        }
    }

    /// Current participant count of a map's session (0 when closed).
    pub async fn participant_count(&self, map_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(map_id)
            .map(|s| s.participants)
            .unwrap_or(0)
    }

    /// Apply one edit on behalf of a participant and broadcast the resulting
    /// event to the map's session.
    ///
    /// Persistence happens first; the event is only published after the map
    /// service accepted the edit. Publishing to a session with no receivers
    /// (possible in the window after the last leave) is not an error.
    #[instrument(skip(self, op))]
    pub async fn apply_edit(
        &self,
        user_id: &str,
        map_id: &str,
        op: EditOp,
    ) -> Result<MapEvent, HubError> {
        let event = match op {
            EditOp::CreateNode {
                id,
                text,
                parent_id,
                position,
            } => {
                let node = self
                    .service
                    .create_node(
                        user_id,
                        map_id,
                        CreateNodeParams {
                            id,
                            text,
                            parent_id,
                            position,
                        },
                    )
                    .await?;
                MapEvent::NodeCreated { node }
            }
            EditOp::UpdateNode { id, update } => {
                let node = self.service.update_node(user_id, map_id, &id, update).await?;
                MapEvent::NodeUpdated { node }
            }
            EditOp::DeleteNode { id } => {
                self.service.delete_node(user_id, map_id, &id).await?;
                MapEvent::NodeDeleted { id }
            }
            EditOp::CreateConnection {
                source_id,
                target_id,
            } => {
                let connection = self
                    .service
                    .create_connection(user_id, map_id, source_id, target_id)
                    .await?;
                MapEvent::ConnectionCreated { connection }
            }
            EditOp::DeleteConnection { id } => {
                self.service.delete_connection(user_id, map_id, &id).await?;
                MapEvent::ConnectionDeleted { id }
            }
        };

        let sessions = self.sessions.read().await;
        if let Some(session) = sessions.get(map_id) {
            let _ = session.events.send(event.clone());
        }
        Ok(event)
    }
}
