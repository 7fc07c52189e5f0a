//! Chat View State
//!
//! The conversation list and the open conversation of the local user,
//! kept in sync from REST listings and live `message`, `typing` and
//! `messages_read` events.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::client::state::reconcile::{replace_if_changed, MessageKey, MessageList};
use crate::client::state::typing::TypingIndicators;
use crate::shared::models::{ChatMessage, ChatSummary};

#[derive(Debug, Clone)]
pub struct ChatState {
    local_user: Uuid,
    chats: Vec<ChatSummary>,
    active: Option<Uuid>,
    messages: MessageList,
    typing: TypingIndicators,
}

impl ChatState {
    pub fn new(local_user: Uuid) -> Self {
        Self {
            local_user,
            chats: Vec::new(),
            active: None,
            messages: MessageList::new(),
            typing: TypingIndicators::default(),
        }
    }

    pub fn local_user(&self) -> Uuid {
        self.local_user
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn active_chat(&self) -> Option<Uuid> {
        self.active
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn typing(&self) -> &TypingIndicators {
        &self.typing
    }

    pub fn summary(&self, chat_id: Uuid) -> Option<&ChatSummary> {
        self.chats.iter().find(|chat| chat.id == chat_id)
    }

    pub fn set_chats(&mut self, chats: Vec<ChatSummary>) -> bool {
        replace_if_changed(&mut self.chats, chats)
    }

    /// Make `chat_id` the open conversation; returns the previous one
    pub fn open(&mut self, chat_id: Uuid) -> Option<Uuid> {
        let previous = self.active.replace(chat_id);
        if previous != Some(chat_id) {
            self.messages.clear();
            self.typing.clear();
        }
        previous
    }

    pub fn close(&mut self) -> Option<Uuid> {
        self.messages.clear();
        self.typing.clear();
        self.active.take()
    }

    /// Apply a REST message listing; stale listings for another chat are ignored
    pub fn set_messages(&mut self, chat_id: Uuid, messages: Vec<ChatMessage>) -> bool {
        if self.active != Some(chat_id) {
            tracing::debug!("[Chat] Ignoring listing for inactive chat {}", chat_id);
            return false;
        }
        self.messages.replace_with(messages)
    }

    /// Optimistically append a message typed by the local user
    pub fn push_pending(&mut self, content: &str, now: DateTime<Utc>) -> Option<MessageKey> {
        let chat_id = self.active?;
        Some(self.messages.push_pending(chat_id, self.local_user, content, now))
    }

    pub fn confirm_sent(&mut self, key: MessageKey, message: ChatMessage) -> bool {
        let summary_changed = self.touch_summary(&message);
        if self.active != Some(message.chat_id) {
            return summary_changed;
        }
        self.messages.confirm(key, message) || summary_changed
    }

    pub fn discard_pending(&mut self, key: MessageKey) -> bool {
        self.messages.discard(key)
    }

    /// Live `message` event
    pub fn apply_message(&mut self, message: ChatMessage) -> bool {
        let mut changed = self.touch_summary(&message);
        if self.active == Some(message.chat_id) {
            changed |= self.typing.clear_user(message.chat_id, message.sender_id);
            changed |= self.messages.apply_live(message);
        }
        changed
    }

    /// Live `typing` event
    pub fn apply_typing(&mut self, chat_id: Uuid, user_id: Uuid, is_typing: bool) -> bool {
        if self.active != Some(chat_id) {
            return false;
        }
        self.typing.apply(chat_id, user_id, is_typing, self.local_user)
    }

    /// Live `messages_read` event
    ///
    /// The counterpart reading the open chat flips our sent messages to
    /// read. Our own read from another session clears the unread badge.
    pub fn apply_messages_read(&mut self, chat_id: Uuid, reader_id: Uuid) -> bool {
        if reader_id == self.local_user {
            return self.clear_unread(chat_id);
        }
        if self.active != Some(chat_id) {
            return false;
        }
        self.messages.mark_read_from(self.local_user)
    }

    /// Local bookkeeping after the open chat was marked read
    pub fn mark_active_read(&mut self) -> bool {
        let Some(chat_id) = self.active else {
            return false;
        };
        let counterpart_read = self
            .summary(chat_id)
            .map(|summary| summary.participant.id)
            .is_some_and(|counterpart| self.messages.mark_read_from(counterpart));
        self.clear_unread(chat_id) || counterpart_read
    }

    fn clear_unread(&mut self, chat_id: Uuid) -> bool {
        match self.chats.iter_mut().find(|chat| chat.id == chat_id) {
            Some(summary) if summary.unread_count > 0 => {
                summary.unread_count = 0;
                true
            }
            _ => false,
        }
    }

    /// Move the chat to the top with `message` as its preview
    fn touch_summary(&mut self, message: &ChatMessage) -> bool {
        let Some(index) = self.chats.iter().position(|chat| chat.id == message.chat_id) else {
            return false;
        };
        if self.chats[index].last_message.as_ref().map(|m| m.id) == Some(message.id) {
            return false;
        }

        let mut summary = self.chats.remove(index);
        summary.last_message = Some(message.clone());
        summary.updated_at = message.created_at;
        if message.sender_id != self.local_user && self.active != Some(message.chat_id) {
            summary.unread_count += 1;
        }
        self.chats.insert(0, summary);
        true
    }
}
