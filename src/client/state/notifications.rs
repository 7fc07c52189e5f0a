//! Notification View State

use uuid::Uuid;

use crate::client::state::reconcile::replace_if_changed;
use crate::shared::models::Notification;

/// Notifications of the local user, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    items: Vec<Notification>,
}

impl NotificationState {
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    pub fn set_all(&mut self, items: Vec<Notification>) -> bool {
        replace_if_changed(&mut self.items, items)
    }

    /// Live `notification` event; duplicates by id are ignored
    pub fn apply_new(&mut self, notification: Notification) -> bool {
        if self.items.iter().any(|n| n.id == notification.id) {
            return false;
        }
        self.items.insert(0, notification);
        true
    }

    /// Replace one record with the server's copy (mark-one-read response)
    pub fn apply_update(&mut self, notification: Notification) -> bool {
        match self.items.iter_mut().find(|n| n.id == notification.id) {
            Some(current) => replace_if_changed(current, notification),
            None => false,
        }
    }

    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.is_read => {
                n.is_read = true;
                true
            }
            _ => false,
        }
    }

    /// Live `notifications_read` event
    pub fn mark_all_read(&mut self) -> bool {
        let mut changed = false;
        for n in self.items.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            changed = true;
        }
        changed
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
