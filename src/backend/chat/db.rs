/**
 * Database Operations for Chats and Messages
 *
 * A chat row stores its two participants in initiator order
 * (`participant_a` first) and a `pair_key` made of both ids in sorted
 * order. The UNIQUE constraint on `pair_key` is what guarantees a single
 * conversation per unordered pair; callers that lose an insert race see a
 * unique violation and re-read the winner's row.
 */

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::models::{pair_key, Chat, ChatMessage};

const SELECT_CHAT: &str =
    "SELECT id, participant_a, participant_b, last_message_id, created_at, updated_at FROM chats";

const SELECT_MESSAGE: &str =
    "SELECT id, chat_id, sender_id, content, is_read, created_at FROM messages";

fn chat_from_row(row: &SqliteRow) -> Result<Chat, sqlx::Error> {
    Ok(Chat {
        id: row.try_get("id")?,
        participants: vec![
            row.try_get::<Uuid, _>("participant_a")?,
            row.try_get::<Uuid, _>("participant_b")?,
        ],
        last_message_id: row.try_get("last_message_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage, sqlx::Error> {
    Ok(ChatMessage {
        id: row.try_get("id")?,
        chat_id: row.try_get("chat_id")?,
        sender_id: row.try_get("sender_id")?,
        content: row.try_get("content")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn get_chat(pool: &SqlitePool, id: Uuid) -> Result<Option<Chat>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_CHAT))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(chat_from_row).transpose()
}

/// The conversation between `a` and `b`, in either order
pub async fn find_by_pair(pool: &SqlitePool, a: Uuid, b: Uuid) -> Result<Option<Chat>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE pair_key = ?", SELECT_CHAT))
        .bind(pair_key(a, b))
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(chat_from_row).transpose()
}

/// Insert a new chat with `initiator` first
///
/// Fails with a unique violation if the pair already has a chat.
pub async fn insert_chat(pool: &SqlitePool, initiator: Uuid, target: Uuid) -> Result<Chat, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO chats (id, participant_a, participant_b, pair_key, last_message_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, NULL, ?, ?)
        "#,
    )
    .bind(id)
    .bind(initiator)
    .bind(target)
    .bind(pair_key(initiator, target))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Chat {
        id,
        participants: vec![initiator, target],
        last_message_id: None,
        created_at: now,
        updated_at: now,
    })
}

/// Chats containing `user_id`, most recently active first
pub async fn list_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Chat>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{} WHERE participant_a = ? OR participant_b = ? ORDER BY updated_at DESC, rowid DESC",
        SELECT_CHAT
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(chat_from_row).collect()
}

/// Persist a message and make it the chat's last message
pub async fn insert_message(
    pool: &SqlitePool,
    chat_id: Uuid,
    sender_id: Uuid,
    content: &str,
) -> Result<ChatMessage, sqlx::Error> {
    let message = ChatMessage {
        id: Uuid::new_v4(),
        chat_id,
        sender_id,
        content: content.to_string(),
        is_read: false,
        created_at: Utc::now(),
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO messages (id, chat_id, sender_id, content, is_read, created_at) VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(message.id)
    .bind(chat_id)
    .bind(sender_id)
    .bind(&message.content)
    .bind(message.created_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE chats SET last_message_id = ?, updated_at = ? WHERE id = ?")
        .bind(message.id)
        .bind(message.created_at)
        .bind(chat_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(message)
}

pub async fn get_message(pool: &SqlitePool, id: Uuid) -> Result<Option<ChatMessage>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_MESSAGE))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(message_from_row).transpose()
}

/// Every message of a chat in send order
pub async fn list_messages(pool: &SqlitePool, chat_id: Uuid) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{} WHERE chat_id = ? ORDER BY created_at ASC, rowid ASC",
        SELECT_MESSAGE
    ))
    .bind(chat_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(message_from_row).collect()
}

/// Messages in `chat_id` that `reader` has not read yet
pub async fn unread_count(pool: &SqlitePool, chat_id: Uuid, reader: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM messages WHERE chat_id = ? AND sender_id <> ? AND is_read = 0",
    )
    .bind(chat_id)
    .bind(reader)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Mark every message not sent by `reader` as read; returns rows changed
pub async fn mark_read(pool: &SqlitePool, chat_id: Uuid, reader: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET is_read = 1 WHERE chat_id = ? AND sender_id <> ? AND is_read = 0",
    )
    .bind(chat_id)
    .bind(reader)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
