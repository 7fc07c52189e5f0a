//! Notification API integration tests

use devconnect::backend::realtime::Room;
use devconnect::shared::models::{MarkAllReadResponse, Notification};
use devconnect::shared::ServerEvent;
use pretty_assertions::assert_eq;

use crate::common::{data, failure, follow, register_user, spawn_test_app};

#[tokio::test]
async fn test_mark_one_read_is_idempotent() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    follow(&app.server, &grace, &ada).await;

    let list: Vec<Notification> = data(
        app.server
            .get("/api/notifications")
            .authorization_bearer(&ada.token)
            .await,
    );
    let id = list[0].id;
    assert!(!list[0].is_read);

    let url = format!("/api/notifications/mark-read/{}", id);
    let first: Notification = data(app.server.patch(&url).authorization_bearer(&ada.token).await);
    let second: Notification = data(app.server.patch(&url).authorization_bearer(&ada.token).await);
    assert!(first.is_read);
    assert!(second.is_read);
    assert_eq!(second.id, id);
}

#[tokio::test]
async fn test_mark_read_requires_ownership() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    follow(&app.server, &grace, &ada).await;

    let list: Vec<Notification> = data(
        app.server
            .get("/api/notifications")
            .authorization_bearer(&ada.token)
            .await,
    );

    let stolen = app
        .server
        .patch(&format!("/api/notifications/mark-read/{}", list[0].id))
        .authorization_bearer(&grace.token)
        .await;
    failure(stolen, 404);

    let unknown = app
        .server
        .patch(&format!("/api/notifications/mark-read/{}", uuid::Uuid::new_v4()))
        .authorization_bearer(&ada.token)
        .await;
    failure(unknown, 404);
}

#[tokio::test]
async fn test_mark_all_read_clears_unread_and_publishes() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    for name in ["Grace", "Linus", "Barbara"] {
        let fan = register_user(&app.server, name).await;
        follow(&app.server, &fan, &ada).await;
    }

    let (socket, mut events) = app.state.hub.connect().await;
    app.state.hub.register_user(socket, ada.id).await;

    let response: MarkAllReadResponse = data(
        app.server
            .patch("/api/notifications/mark-all-read")
            .authorization_bearer(&ada.token)
            .await,
    );
    assert_eq!(response.updated, 3);

    let list: Vec<Notification> = data(
        app.server
            .get("/api/notifications")
            .authorization_bearer(&ada.token)
            .await,
    );
    assert_eq!(list.len(), 3);
    assert!(list.iter().all(|n| n.is_read));

    assert_eq!(
        events.recv().await,
        Some(ServerEvent::NotificationsRead { user_id: ada.id })
    );
    assert_eq!(app.state.hub.room_size(Room::User(ada.id)).await, 1);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let linus = register_user(&app.server, "Linus").await;
    follow(&app.server, &grace, &ada).await;
    follow(&app.server, &linus, &ada).await;

    let list: Vec<Notification> = data(
        app.server
            .get("/api/notifications")
            .authorization_bearer(&ada.token)
            .await,
    );
    let senders: Vec<_> = list.iter().map(|n| n.sender.id).collect();
    assert_eq!(senders, vec![linus.id, grace.id]);
    assert_eq!(list[0].message, "Linus started following you");
}
