/**
 * Chat Domain Service
 *
 * Shared by the HTTP handlers and the WebSocket `read_message` event.
 *
 * # Operations
 *
 * - `initiate_chat` - get-or-create the conversation for an unordered pair
 * - `list_chats` - caller's conversations with preview and unread count
 * - `list_messages` - full history, participants only
 * - `send_message` - persist, publish `message`, notify the other side
 * - `mark_chat_read` - read every incoming message, publish `messages_read`
 *
 * # Concurrency
 *
 * No in-process lock guards `initiate_chat`. Two concurrent requests for the
 * same pair both miss the lookup and race to insert; the UNIQUE `pair_key`
 * lets exactly one win and the loser re-reads the winner's row.
 */

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::{get_public_user, require_user};
use crate::backend::chat::db;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::notifications::notify;
use crate::backend::realtime::{EventHub, Room, SocketId};
use crate::shared::models::{Chat, ChatMessage, ChatSummary, NotificationType, SendMessageRequest};
use crate::shared::ServerEvent;

/// Return the conversation between `caller` and `target`, creating it if needed
pub async fn initiate_chat(pool: &SqlitePool, caller: Uuid, target: Uuid) -> BackendResult<Chat> {
    if caller == target {
        return Err(BackendError::invalid_operation("You cannot start a chat with yourself"));
    }
    require_user(pool, target).await?;

    if let Some(chat) = db::find_by_pair(pool, caller, target).await? {
        return Ok(chat);
    }

    match db::insert_chat(pool, caller, target).await {
        Ok(chat) => {
            tracing::info!("[Chat] Created chat {} between {} and {}", chat.id, caller, target);
            Ok(chat)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::debug!("[Chat] Lost creation race for {} / {}, re-reading", caller, target);
            db::find_by_pair(pool, caller, target)
                .await?
                .ok_or_else(|| BackendError::internal("Chat vanished after unique violation"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Load a chat and check that `caller` takes part in it
pub async fn require_participant(pool: &SqlitePool, chat_id: Uuid, caller: Uuid) -> BackendResult<Chat> {
    let chat = db::get_chat(pool, chat_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Chat not found"))?;
    if !chat.has_participant(caller) {
        return Err(BackendError::forbidden("You are not a participant in this chat"));
    }
    Ok(chat)
}

pub async fn list_chats(pool: &SqlitePool, caller: Uuid) -> BackendResult<Vec<ChatSummary>> {
    let chats = db::list_for_user(pool, caller).await?;

    let mut summaries = Vec::with_capacity(chats.len());
    for chat in chats {
        let Some(other) = chat.other_participant(caller) else {
            continue;
        };
        let Some(participant) = get_public_user(pool, other).await? else {
            tracing::warn!("[Chat] Chat {} references missing user {}", chat.id, other);
            continue;
        };
        let last_message = match chat.last_message_id {
            Some(id) => db::get_message(pool, id).await?,
            None => None,
        };
        let unread_count = db::unread_count(pool, chat.id, caller).await?.max(0) as u64;

        summaries.push(ChatSummary {
            id: chat.id,
            participant,
            last_message,
            unread_count,
            updated_at: chat.updated_at,
        });
    }
    Ok(summaries)
}

pub async fn list_messages(pool: &SqlitePool, chat_id: Uuid, caller: Uuid) -> BackendResult<Vec<ChatMessage>> {
    require_participant(pool, chat_id, caller).await?;
    Ok(db::list_messages(pool, chat_id).await?)
}

/// Persist a message from `caller` and fan it out
///
/// The chat room receives the `message` event (the sender's own sockets
/// included, so their optimistic copy is confirmed); the other participant
/// additionally gets a `message` notification in their user room.
pub async fn send_message(
    pool: &SqlitePool,
    hub: &EventHub,
    chat_id: Uuid,
    caller: Uuid,
    request: &SendMessageRequest,
) -> BackendResult<ChatMessage> {
    let chat = require_participant(pool, chat_id, caller).await?;
    request.validate()?;

    let message = db::insert_message(pool, chat_id, caller, request.content.trim()).await?;

    let delivered = hub
        .publish(Room::Chat(chat_id), ServerEvent::Message(message.clone()))
        .await;
    tracing::info!("[Chat] Message {} in {} delivered to {} sockets", message.id, chat_id, delivered);

    if let Some(recipient) = chat.other_participant(caller) {
        // The message is stored and delivered; a failed notification does not undo that
        if let Err(e) = notify_recipient(pool, hub, caller, recipient).await {
            tracing::error!("[Chat] Message {} stored but notifying {} failed: {}", message.id, recipient, e);
        }
    }

    Ok(message)
}

async fn notify_recipient(pool: &SqlitePool, hub: &EventHub, caller: Uuid, recipient: Uuid) -> BackendResult<()> {
    let sender = require_user(pool, caller).await?.public();
    notify(pool, hub, recipient, &sender, NotificationType::Message, None).await?;
    Ok(())
}

/// Mark every message the caller received in this chat as read
///
/// `origin` is the socket that asked, if any; it is left out of the
/// `messages_read` fan-out.
pub async fn mark_chat_read(
    pool: &SqlitePool,
    hub: &EventHub,
    chat_id: Uuid,
    caller: Uuid,
    origin: Option<SocketId>,
) -> BackendResult<u64> {
    require_participant(pool, chat_id, caller).await?;
    let updated = db::mark_read(pool, chat_id, caller).await?;

    hub.publish_except(
        Room::Chat(chat_id),
        ServerEvent::MessagesRead {
            chat_id,
            reader_id: caller,
        },
        origin,
    )
    .await;
    tracing::debug!("[Chat] {} read {} messages in {}", caller, updated, chat_id);

    Ok(updated)
}
