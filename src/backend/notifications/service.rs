/**
 * Notification Service
 *
 * Creates notifications as a side effect of social actions and pushes them
 * to the recipient's user room.
 *
 * # Producers
 *
 * | Action   | Type      | Post reference |
 * |----------|-----------|----------------|
 * | follow   | `follow`  | no             |
 * | like     | `like`    | yes            |
 * | comment  | `comment` | yes            |
 * | share    | `share`   | yes            |
 * | message  | `message` | no             |
 *
 * Self-actions never notify. The store write is part of the request and its
 * failure fails the request; the hub publish afterwards is best-effort.
 */

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::backend::notifications::db;
use crate::backend::realtime::{EventHub, Room};
use crate::shared::models::{Notification, NotificationType, PublicUser};
use crate::shared::ServerEvent;

/// Persist one notification for `recipient` and publish it
///
/// Returns `None` without touching the store when `sender` is the recipient.
pub async fn notify(
    pool: &SqlitePool,
    hub: &EventHub,
    recipient: Uuid,
    sender: &PublicUser,
    kind: NotificationType,
    post_id: Option<Uuid>,
) -> BackendResult<Option<Notification>> {
    if recipient == sender.id {
        tracing::debug!("[Notifications] Skipping {} notification for self-action by {}", kind, sender.id);
        return Ok(None);
    }

    let message = kind.describe(&sender.full_name);
    let notification = db::insert_notification(pool, recipient, sender, kind, post_id, &message).await?;

    let delivered = hub
        .publish(Room::User(recipient), ServerEvent::Notification(notification.clone()))
        .await;
    tracing::info!(
        "[Notifications] {} notification for {} delivered to {} sockets",
        kind,
        recipient,
        delivered
    );

    Ok(Some(notification))
}

/// Bulk-read every notification of `user_id` and tell their other sessions
pub async fn mark_all_read(pool: &SqlitePool, hub: &EventHub, user_id: Uuid) -> BackendResult<u64> {
    let updated = db::mark_all_read(pool, user_id).await?;
    hub.publish(Room::User(user_id), ServerEvent::NotificationsRead { user_id })
        .await;
    tracing::info!("[Notifications] {} marked {} notifications read", user_id, updated);
    Ok(updated)
}
