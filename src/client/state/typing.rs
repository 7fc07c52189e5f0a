//! Typing Indicators
//!
//! Outgoing: keystrokes are debounced per chat. The first keystroke emits
//! `typing: true`; further keystrokes are silent; once no keystroke has been
//! seen for the debounce interval a `typing: false` is emitted.
//!
//! Incoming: only the counterpart's typing state is shown, never the local
//! user's own (another session of the same user may relay it).

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::shared::ClientEvent;

pub const TYPING_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct TypingDebouncer {
    interval: Duration,
    last_keystroke: HashMap<Uuid, Instant>,
}

impl Default for TypingDebouncer {
    fn default() -> Self {
        Self::new(TYPING_DEBOUNCE)
    }
}

impl TypingDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_keystroke: HashMap::new(),
        }
    }

    /// Record a keystroke in `chat_id`
    pub fn keystroke(&mut self, chat_id: Uuid, now: Instant) -> Option<ClientEvent> {
        let started = self.last_keystroke.insert(chat_id, now).is_none();
        started.then_some(ClientEvent::Typing {
            chat_id,
            is_typing: true,
        })
    }

    /// Stop events for every chat idle for at least the interval
    pub fn poll(&mut self, now: Instant) -> Vec<ClientEvent> {
        let idle: Vec<Uuid> = self
            .last_keystroke
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= self.interval)
            .map(|(chat_id, _)| *chat_id)
            .collect();
        idle.into_iter().filter_map(|chat_id| self.stop(chat_id)).collect()
    }

    /// Stop immediately (message sent or chat closed)
    pub fn stop(&mut self, chat_id: Uuid) -> Option<ClientEvent> {
        self.last_keystroke.remove(&chat_id).map(|_| ClientEvent::Typing {
            chat_id,
            is_typing: false,
        })
    }

    pub fn is_typing(&self, chat_id: Uuid) -> bool {
        self.last_keystroke.contains_key(&chat_id)
    }
}

/// Who is typing where, as seen by the local user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingIndicators {
    typing: HashMap<Uuid, HashSet<Uuid>>,
}

impl TypingIndicators {
    /// Apply a relayed typing event; returns whether the view changed
    pub fn apply(&mut self, chat_id: Uuid, user_id: Uuid, is_typing: bool, local_user: Uuid) -> bool {
        if user_id == local_user {
            return false;
        }
        if is_typing {
            self.typing.entry(chat_id).or_default().insert(user_id)
        } else {
            let Some(users) = self.typing.get_mut(&chat_id) else {
                return false;
            };
            let removed = users.remove(&user_id);
            if users.is_empty() {
                self.typing.remove(&chat_id);
            }
            removed
        }
    }

    pub fn is_typing(&self, chat_id: Uuid, user_id: Uuid) -> bool {
        self.typing
            .get(&chat_id)
            .is_some_and(|users| users.contains(&user_id))
    }

    pub fn anyone_typing(&self, chat_id: Uuid) -> bool {
        self.typing.contains_key(&chat_id)
    }

    /// A message from `user_id` ends their typing state
    pub fn clear_user(&mut self, chat_id: Uuid, user_id: Uuid) -> bool {
        self.apply(chat_id, user_id, false, Uuid::nil())
    }

    pub fn clear(&mut self) {
        self.typing.clear();
    }
}
