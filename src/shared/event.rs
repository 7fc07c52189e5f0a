//! Real-time Event Types
//!
//! Events exchanged over the WebSocket channel. Both directions are closed
//! tagged unions, so adding an event kind is a compile-time-checked change on
//! every `match` that handles them.
//!
//! # Wire Format
//!
//! Each frame is a JSON object with the event name and its payload:
//!
//! ```json
//! {"event": "join_chat", "data": {"chat_id": "..."}}
//! {"event": "notification", "data": {"id": "...", "type": "like", ...}}
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::models::{ChatMessage, Notification};

/// Events sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join the room of the authenticated user
    RegisterUser { user_id: Uuid },
    /// Start receiving events for a conversation
    JoinChat { chat_id: Uuid },
    /// Stop receiving events for a conversation
    LeaveChat { chat_id: Uuid },
    /// The sender started or stopped typing
    Typing { chat_id: Uuid, is_typing: bool },
    /// The sender has read the conversation
    ReadMessage { chat_id: Uuid },
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// New notification, delivered to the recipient's room
    Notification(Notification),
    /// New chat message, delivered to the chat room
    Message(ChatMessage),
    /// Every notification of `user_id` was marked read
    NotificationsRead { user_id: Uuid },
    /// Typing indicator relayed to the other sockets in a chat room
    Typing {
        chat_id: Uuid,
        user_id: Uuid,
        is_typing: bool,
    },
    /// `reader_id` read the messages addressed to them in `chat_id`
    MessagesRead { chat_id: Uuid, reader_id: Uuid },
    /// Connection was rejected (bad or missing credential)
    ConnectError { message: String },
}

impl ClientEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterUser { .. } => "register_user",
            Self::JoinChat { .. } => "join_chat",
            Self::LeaveChat { .. } => "leave_chat",
            Self::Typing { .. } => "typing",
            Self::ReadMessage { .. } => "read_message",
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(frame: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(frame)?)
    }
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::Notification(_) => "notification",
            Self::Message(_) => "message",
            Self::NotificationsRead { .. } => "notifications_read",
            Self::Typing { .. } => "typing",
            Self::MessagesRead { .. } => "messages_read",
            Self::ConnectError { .. } => "connect_error",
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(frame: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(frame)?)
    }
}
