/**
 * WebSocket Endpoint
 *
 * `GET /api/socket?token=<jwt>` upgrades to a WebSocket carrying JSON
 * frames of the form `{"event": "<name>", "data": {...}}`.
 *
 * # Handshake
 *
 * The token is verified right after the upgrade. On failure the server
 * sends a single `connect_error` frame and closes the socket.
 *
 * # Tasks
 *
 * Each connection runs two tasks, following the split reader/writer
 * pattern:
 * - writer: drains the hub queue for this socket into the WebSocket
 * - reader: decodes `ClientEvent` frames and dispatches them
 *
 * When either task ends the other is aborted and the socket is removed
 * from the hub.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::backend::chat::service as chat_service;
use crate::backend::error::BackendError;
use crate::backend::middleware::{authenticate_token, AuthenticatedUser, Query};
use crate::backend::realtime::hub::{Room, SocketId};
use crate::backend::server::state::AppState;
use crate::shared::{ClientEvent, ServerEvent};

#[derive(Debug, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
}

/// Handle WebSocket upgrade (GET /api/socket)
pub async fn socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SocketQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.token))
}

async fn handle_socket(socket: WebSocket, state: AppState, token: Option<String>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let authenticated = match token.as_deref() {
        Some(token) => authenticate_token(&state, token).await,
        None => Err(BackendError::auth("Missing token")),
    };

    let user = match authenticated {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("[Socket] Rejected connection: {}", e);
            let event = ServerEvent::ConnectError { message: e.message() };
            if let Ok(frame) = event.to_json() {
                let _ = ws_tx.send(Message::Text(frame.into())).await;
            }
            let _ = ws_tx.send(Message::Close(None)).await;
            return;
        }
    };

    let (socket_id, mut events) = state.hub.connect().await;
    tracing::info!("[Socket] {} connected as user {}", socket_id, user.user_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let frame = match event.to_json() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("[Socket] Failed to encode {}: {}", event.name(), e);
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                tracing::debug!("[Socket] Send failed, closing writer: {}", e);
                break;
            }
        }
    });

    let reader_state = state.clone();
    let reader_user = user.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(Message::Text(text)) => match ClientEvent::from_json(text.as_str()) {
                    Ok(event) => handle_client_event(&reader_state, socket_id, &reader_user, event).await,
                    Err(e) => tracing::warn!("[Socket] {} sent an unreadable frame: {}", socket_id, e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("[Socket] {} read error: {}", socket_id, e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.hub.disconnect(socket_id).await;
    tracing::info!("[Socket] {} disconnected (user {})", socket_id, user.user_id);
}

/// Dispatch one client event for an authenticated socket
pub async fn handle_client_event(
    state: &AppState,
    socket_id: SocketId,
    user: &AuthenticatedUser,
    event: ClientEvent,
) {
    match event {
        ClientEvent::RegisterUser { user_id } => {
            if user_id != user.user_id {
                tracing::warn!(
                    "[Socket] {} tried to register as {} but is {}",
                    socket_id,
                    user_id,
                    user.user_id
                );
                let rejection = ServerEvent::ConnectError {
                    message: "Cannot register as another user".to_string(),
                };
                state.hub.send_to(socket_id, rejection).await;
                return;
            }
            state.hub.register_user(socket_id, user_id).await;
        }
        ClientEvent::JoinChat { chat_id } => {
            match chat_service::require_participant(&state.db, chat_id, user.user_id).await {
                Ok(_) => {
                    state.hub.join_chat(socket_id, chat_id).await;
                }
                Err(e) => {
                    tracing::warn!("[Socket] {} cannot join chat {}: {}", socket_id, chat_id, e);
                }
            }
        }
        ClientEvent::LeaveChat { chat_id } => {
            state.hub.leave_chat(socket_id, chat_id).await;
        }
        ClientEvent::Typing { chat_id, is_typing } => {
            if !state.hub.is_member(socket_id, Room::Chat(chat_id)).await {
                tracing::debug!("[Socket] {} typing in unjoined chat {}", socket_id, chat_id);
                return;
            }
            let event = ServerEvent::Typing {
                chat_id,
                user_id: user.user_id,
                is_typing,
            };
            state.hub.publish_except(Room::Chat(chat_id), event, Some(socket_id)).await;
        }
        ClientEvent::ReadMessage { chat_id } => {
            if let Err(e) =
                chat_service::mark_chat_read(&state.db, &state.hub, chat_id, user.user_id, Some(socket_id)).await
            {
                tracing::warn!("[Socket] read_message for {} failed: {}", chat_id, e);
            }
        }
    }
}
