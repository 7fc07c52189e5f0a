//! Database operations for notifications
//!
//! Notifications are joined with their sender's `users` row so every record
//! leaves the store with the sender's public profile populated.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::backend::error::BackendResult;
use crate::shared::models::{Notification, NotificationType, PublicUser};

const SELECT_NOTIFICATION: &str = r#"
    SELECT n.id, n.user_id, n.kind, n.post_id, n.message, n.is_read, n.created_at, n.updated_at,
           u.id AS sender_id, u.full_name AS sender_name, u.headline AS sender_headline,
           u.profile_image AS sender_image
    FROM notifications n
    JOIN users u ON u.id = n.sender_id
"#;

fn notification_from_row(row: &SqliteRow) -> BackendResult<Notification> {
    let kind: String = row.try_get("kind")?;
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        sender: PublicUser {
            id: row.try_get("sender_id")?,
            full_name: row.try_get("sender_name")?,
            headline: row.try_get("sender_headline")?,
            profile_image: row.try_get("sender_image")?,
        },
        kind: kind.parse::<NotificationType>()?,
        post_id: row.try_get("post_id")?,
        message: row.try_get("message")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Persist a new unread notification
pub async fn insert_notification(
    pool: &SqlitePool,
    recipient: Uuid,
    sender: &PublicUser,
    kind: NotificationType,
    post_id: Option<Uuid>,
    message: &str,
) -> Result<Notification, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, sender_id, kind, post_id, message, is_read, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(id)
    .bind(recipient)
    .bind(sender.id)
    .bind(kind.as_str())
    .bind(post_id)
    .bind(message)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Notification {
        id,
        user_id: recipient,
        sender: sender.clone(),
        kind,
        post_id,
        message: message.to_string(),
        is_read: false,
        created_at: now,
        updated_at: now,
    })
}

/// Notifications addressed to `user_id`, newest first
pub async fn list_for_user(pool: &SqlitePool, user_id: Uuid) -> BackendResult<Vec<Notification>> {
    let rows = sqlx::query(&format!(
        "{} WHERE n.user_id = ? ORDER BY n.created_at DESC, n.rowid DESC",
        SELECT_NOTIFICATION
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(notification_from_row).collect()
}

/// A single notification, only if it belongs to `user_id`
pub async fn get_owned(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
) -> BackendResult<Option<Notification>> {
    let row = sqlx::query(&format!("{} WHERE n.id = ? AND n.user_id = ?", SELECT_NOTIFICATION))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(notification_from_row).transpose()
}

/// Flip the read flag on one notification; returns rows changed
pub async fn mark_read(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = 1, updated_at = ? WHERE id = ? AND user_id = ? AND is_read = 0",
    )
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Flip every unread notification of `user_id`; returns rows changed
pub async fn mark_all_read(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE notifications SET is_read = 1, updated_at = ? WHERE user_id = ? AND is_read = 0",
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn count_unread(pool: &SqlitePool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
