//! WebSocket Endpoint for Map Sessions
//!
//! `GET /api/v1/ws/maps/:id` upgrades into a realtime session on one map.
//! Session membership is checked right after the upgrade; a map the caller
//! cannot see closes with 4004 before any frame is exchanged. After that the
//! connection runs a select loop between inbound client frames and the map's
//! broadcast stream.
//!
//! An inbound edit is applied and broadcast to completion before the next
//! frame is read, so an edit accepted from the socket survives the client
//! disconnecting right after sending it.

use crate::api::AppState;
use crate::realtime::{ClientMessage, CLOSE_INTERNAL};
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

pub async fn ws_map_handler(
    ws: WebSocketUpgrade,
    Path(map_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    // Anonymous upgrades are refused at the HTTP layer, 404-shaped like
    // every other identity failure.
    let user_id = match state.identity.resolve(&headers) {
        Some(user) => user,
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    ws.on_upgrade(move |socket| handle_map_socket(socket, state, user_id, map_id))
}

async fn handle_map_socket(
    mut socket: WebSocket,
    state: Arc<AppState>,
    user_id: String,
    map_id: String,
) {
    let mut events = match state.hub.join(&user_id, &map_id).await {
        Ok(rx) => rx,
        Err(err) => {
            debug!(map_id, error = %err, "session join refused");
            close_with(&mut socket, err.close_code(), err.to_string()).await;
            return;
        }
    };
    info!(map_id, "realtime participant joined");

    let failure = loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let msg = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => msg,
                            Err(err) => {
                                // Unreadable frames are dropped, not fatal.
                                debug!(map_id, error = %err, "ignoring malformed frame");
                                continue;
                            }
                        };
                        let ClientMessage::Edit { op } = msg;
                        if let Err(err) = state.hub.apply_edit(&user_id, &map_id, op).await {
                            warn!(map_id, error = %err, "edit rejected, closing session");
                            break Some((err.close_code(), err.to_string()));
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break None;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break None,
                    Some(Err(err)) => {
                        debug!(map_id, error = %err, "socket error");
                        break None;
                    }
                    _ => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(err) => {
                                warn!(map_id, error = %err, "event serialization failed");
                                break Some((CLOSE_INTERNAL, "internal error".to_string()));
                            }
                        };
                        if socket.send(Message::Text(json)).await.is_err() {
                            break None;
                        }
                    }
                    // A slow consumer resumes from the oldest retained
                    // event; other participants are unaffected.
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(map_id, skipped, "participant lagged behind event stream");
                    }
                    Err(RecvError::Closed) => break None,
                }
            }
        }
    };

    state.hub.leave(&map_id).await;
    if let Some((code, reason)) = failure {
        close_with(&mut socket, code, reason).await;
    }
    info!(map_id, "realtime participant left");
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: String) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}
