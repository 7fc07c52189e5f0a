//! Chat API integration tests

use devconnect::backend::chat::service;
use devconnect::shared::models::{Chat, ChatMessage, ChatReadResponse, ChatSummary};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{data, failure, register_user, spawn_test_app, TestUser};

async fn initiate(server: &axum_test::TestServer, caller: &TestUser, target: Uuid) -> Chat {
    data(
        server
            .post(&format!("/api/chats/initiate/{}", target))
            .authorization_bearer(&caller.token)
            .await,
    )
}

async fn send(server: &axum_test::TestServer, sender: &TestUser, chat: Uuid, content: &str) -> ChatMessage {
    data(
        server
            .post(&format!("/api/chats/{}/messages", chat))
            .authorization_bearer(&sender.token)
            .json(&serde_json::json!({ "content": content }))
            .await,
    )
}

async fn chats_of(server: &axum_test::TestServer, user: &TestUser) -> Vec<ChatSummary> {
    data(server.get("/api/chats").authorization_bearer(&user.token).await)
}

#[tokio::test]
async fn test_initiate_returns_one_chat_per_pair() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;

    let first = initiate(&app.server, &ada, grace.id).await;
    let again = initiate(&app.server, &ada, grace.id).await;
    let reversed = initiate(&app.server, &grace, ada.id).await;

    assert_eq!(first.participants, vec![ada.id, grace.id]);
    assert_eq!(again.id, first.id);
    assert_eq!(reversed.id, first.id);
    assert_eq!(chats_of(&app.server, &ada).await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_initiate_creates_single_chat() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;

    let (left, right) = tokio::join!(
        service::initiate_chat(&app.state.db, ada.id, grace.id),
        service::initiate_chat(&app.state.db, grace.id, ada.id),
    );
    assert_eq!(left.unwrap().id, right.unwrap().id);
    assert_eq!(chats_of(&app.server, &grace).await.len(), 1);
}

#[tokio::test]
async fn test_initiate_rejects_self_and_unknown_target() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;

    let own = app
        .server
        .post(&format!("/api/chats/initiate/{}", ada.id))
        .authorization_bearer(&ada.token)
        .await;
    failure(own, 400);

    let unknown = app
        .server
        .post(&format!("/api/chats/initiate/{}", Uuid::new_v4()))
        .authorization_bearer(&ada.token)
        .await;
    failure(unknown, 404);
}

#[tokio::test]
async fn test_message_updates_preview_and_unread() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let chat = initiate(&app.server, &ada, grace.id).await;

    let message = send(&app.server, &ada, chat.id, "hi").await;
    assert_eq!(message.sender_id, ada.id);
    assert!(!message.is_read);

    let inbox = chats_of(&app.server, &grace).await;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].participant.id, ada.id);
    assert_eq!(inbox[0].last_message.as_ref().map(|m| m.id), Some(message.id));
    assert_eq!(inbox[0].unread_count, 1);

    // The sender's own message never counts as unread for them
    assert_eq!(chats_of(&app.server, &ada).await[0].unread_count, 0);
}

#[tokio::test]
async fn test_history_is_oldest_first_for_both_sides() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let chat = initiate(&app.server, &ada, grace.id).await;

    send(&app.server, &ada, chat.id, "one").await;
    send(&app.server, &grace, chat.id, "two").await;
    send(&app.server, &ada, chat.id, "three").await;

    for user in [&ada, &grace] {
        let history: Vec<ChatMessage> = data(
            app.server
                .get(&format!("/api/chats/{}/messages", chat.id))
                .authorization_bearer(&user.token)
                .await,
        );
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }
}

#[tokio::test]
async fn test_outsiders_cannot_read_or_write() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let linus = register_user(&app.server, "Linus").await;
    let chat = initiate(&app.server, &ada, grace.id).await;

    let write = app
        .server
        .post(&format!("/api/chats/{}/messages", chat.id))
        .authorization_bearer(&linus.token)
        .json(&serde_json::json!({ "content": "hello?" }))
        .await;
    failure(write, 403);

    let read = app
        .server
        .get(&format!("/api/chats/{}/messages", chat.id))
        .authorization_bearer(&linus.token)
        .await;
    failure(read, 403);

    let missing = app
        .server
        .get(&format!("/api/chats/{}/messages", Uuid::new_v4()))
        .authorization_bearer(&ada.token)
        .await;
    failure(missing, 404);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let chat = initiate(&app.server, &ada, grace.id).await;

    let response = app
        .server
        .post(&format!("/api/chats/{}/messages", chat.id))
        .authorization_bearer(&ada.token)
        .json(&serde_json::json!({ "content": "   " }))
        .await;
    failure(response, 400);
}

#[tokio::test]
async fn test_mark_read_clears_unread() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let chat = initiate(&app.server, &ada, grace.id).await;
    send(&app.server, &ada, chat.id, "one").await;
    send(&app.server, &ada, chat.id, "two").await;

    let response: ChatReadResponse = data(
        app.server
            .patch(&format!("/api/chats/{}/read", chat.id))
            .authorization_bearer(&grace.token)
            .await,
    );
    assert_eq!(response, ChatReadResponse { chat_id: chat.id, updated: 2 });
    assert_eq!(chats_of(&app.server, &grace).await[0].unread_count, 0);

    let history: Vec<ChatMessage> = data(
        app.server
            .get(&format!("/api/chats/{}/messages", chat.id))
            .authorization_bearer(&ada.token)
            .await,
    );
    assert!(history.iter().all(|m| m.is_read));
}
