//! # State Reconciliation
//!
//! Merges REST-fetched state with live socket events.
//!
//! ## Rules
//!
//! - **Equality check**: a fetched or received value that is structurally
//!   equal to the current one is not applied, so late REST responses that
//!   race live events cause no re-render.
//! - **Identity dedup**: a live message is appended only if no local message
//!   carries the same server id.
//! - **Pending messages**: a message the local user just sent gets a
//!   timestamp-derived placeholder key until the server echo or the REST
//!   response confirms it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::models::ChatMessage;

/// Replace `current` with `incoming` unless they are equal
///
/// Returns `true` when the value changed (the view should re-render).
pub fn replace_if_changed<T: PartialEq>(current: &mut T, incoming: T) -> bool {
    if *current == incoming {
        false
    } else {
        *current = incoming;
        true
    }
}

/// Identity of a message in local state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Confirmed by the server
    Server(Uuid),
    /// Sent locally, awaiting confirmation; milliseconds since the epoch
    Pending(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMessage {
    pub key: MessageKey,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl LocalMessage {
    pub fn is_pending(&self) -> bool {
        matches!(self.key, MessageKey::Pending(_))
    }
}

impl From<ChatMessage> for LocalMessage {
    fn from(message: ChatMessage) -> Self {
        Self {
            key: MessageKey::Server(message.id),
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            content: message.content,
            is_read: message.is_read,
            created_at: message.created_at,
        }
    }
}

/// Messages of the open conversation, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageList {
    entries: Vec<LocalMessage>,
    last_pending: i64,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LocalMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, message_id: Uuid) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.key == MessageKey::Server(message_id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a locally sent message under a placeholder key
    pub fn push_pending(
        &mut self,
        chat_id: Uuid,
        sender_id: Uuid,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> MessageKey {
        // Keys stay unique when several messages are sent within one millisecond
        let stamp = now.timestamp_millis().max(self.last_pending + 1);
        self.last_pending = stamp;
        let key = MessageKey::Pending(stamp);
        self.entries.push(LocalMessage {
            key,
            chat_id,
            sender_id,
            content: content.into(),
            is_read: false,
            created_at: now,
        });
        key
    }

    /// Swap a pending entry for the server's copy
    ///
    /// A no-op if the server copy is already present (the echo won).
    pub fn confirm(&mut self, pending: MessageKey, message: ChatMessage) -> bool {
        if self.contains(message.id) {
            let before = self.entries.len();
            self.entries.retain(|entry| entry.key != pending);
            return self.entries.len() != before;
        }
        match self.entries.iter_mut().find(|entry| entry.key == pending) {
            Some(entry) => {
                *entry = message.into();
                true
            }
            None => {
                self.entries.push(message.into());
                true
            }
        }
    }

    /// Drop a pending entry whose send failed
    pub fn discard(&mut self, pending: MessageKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != pending);
        self.entries.len() != before
    }

    /// Apply a live `message` event
    ///
    /// Duplicates of a known id are ignored. The echo of our own message
    /// confirms the oldest matching pending entry instead of appending.
    pub fn apply_live(&mut self, message: ChatMessage) -> bool {
        if self.contains(message.id) {
            return false;
        }
        let echo = self.entries.iter_mut().find(|entry| {
            entry.is_pending() && entry.sender_id == message.sender_id && entry.content == message.content
        });
        match echo {
            Some(entry) => *entry = message.into(),
            None => self.entries.push(message.into()),
        }
        true
    }

    /// Replace with a REST listing, keeping still-unconfirmed sends at the end
    pub fn replace_with(&mut self, messages: Vec<ChatMessage>) -> bool {
        let mut next: Vec<LocalMessage> = messages.into_iter().map(LocalMessage::from).collect();
        // A listed message confirms at most one pending entry, and only one
        // sent no earlier than it
        let mut claimed = vec![false; next.len()];
        let pending: Vec<LocalMessage> = self
            .entries
            .iter()
            .filter(|entry| entry.is_pending())
            .filter(|entry| {
                let confirmed = next.iter().enumerate().position(|(i, confirmed)| {
                    !claimed[i]
                        && confirmed.sender_id == entry.sender_id
                        && confirmed.content == entry.content
                        && confirmed.created_at >= entry.created_at
                });
                match confirmed {
                    Some(i) => {
                        claimed[i] = true;
                        false
                    }
                    None => true,
                }
            })
            .cloned()
            .collect();
        next.extend(pending);
        replace_if_changed(&mut self.entries, next)
    }

    /// Mark every message sent by `sender_id` as read
    pub fn mark_read_from(&mut self, sender_id: Uuid) -> bool {
        let mut changed = false;
        for entry in self
            .entries
            .iter_mut()
            .filter(|entry| entry.sender_id == sender_id && !entry.is_read)
        {
            entry.is_read = true;
            changed = true;
        }
        changed
    }
}
