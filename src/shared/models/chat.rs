//! Chat and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::PublicUser;
use crate::shared::error::SharedError;

/// Maximum length of a chat message in characters
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Two-party conversation
///
/// `participants[0]` is the user who initiated the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub participants: Vec<Uuid>,
    pub last_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    /// The participant that is not `user_id`
    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        self.participants.iter().copied().find(|p| *p != user_id)
    }
}

/// Order-independent key for a participant pair
pub fn pair_key(a: Uuid, b: Uuid) -> String {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    format!("{}:{}", low, high)
}

/// Message inside a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Get a preview of the message (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// Conversation as listed for one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: Uuid,
    /// The other participant
    pub participant: PublicUser,
    pub last_message: Option<ChatMessage>,
    /// Messages from the other participant not yet read
    pub unread_count: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.content.trim().is_empty() {
            return Err(SharedError::validation("content", "Message content is required"));
        }
        if self.content.chars().count() > MAX_MESSAGE_LEN {
            return Err(SharedError::validation(
                "content",
                format!("Message must be at most {} characters", MAX_MESSAGE_LEN),
            ));
        }
        Ok(())
    }
}

/// Returned by mark-chat-read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReadResponse {
    pub chat_id: Uuid,
    pub updated: u64,
}
