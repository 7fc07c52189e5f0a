//! Post API integration tests
//!
//! Feed, engagement and the notifications engagement produces.

use devconnect::backend::realtime::Room;
use devconnect::shared::models::{DeletedPost, Notification, NotificationType, Post};
use devconnect::shared::ServerEvent;
use pretty_assertions::assert_eq;

use crate::common::{data, failure, follow, register_user, spawn_test_app, TestUser};

async fn create_post(server: &axum_test::TestServer, author: &TestUser, text: &str) -> Post {
    data(
        server
            .post("/api/post/create")
            .authorization_bearer(&author.token)
            .json(&serde_json::json!({ "text": text }))
            .await,
    )
}

async fn notifications_of(server: &axum_test::TestServer, user: &TestUser) -> Vec<Notification> {
    data(
        server
            .get("/api/notifications")
            .authorization_bearer(&user.token)
            .await,
    )
}

#[tokio::test]
async fn test_like_scenario_notifies_owner_room() {
    let app = spawn_test_app().await;
    let u1 = register_user(&app.server, "Ada").await;
    let u2 = register_user(&app.server, "Grace").await;
    follow(&app.server, &u2, &u1).await;

    let (socket, mut events) = app.state.hub.connect().await;
    app.state.hub.register_user(socket, u1.id).await;

    let post = create_post(&app.server, &u1, "Hello").await;
    let liked: Post = data(
        app.server
            .post(&format!("/api/post/like/{}", post.id))
            .authorization_bearer(&u2.token)
            .await,
    );
    assert_eq!(liked.likes, vec![u2.id]);

    let like_notifications: Vec<Notification> = notifications_of(&app.server, &u1)
        .await
        .into_iter()
        .filter(|n| n.kind == NotificationType::Like)
        .collect();
    assert_eq!(like_notifications.len(), 1);
    assert_eq!(like_notifications[0].user_id, u1.id);
    assert_eq!(like_notifications[0].sender.id, u2.id);
    assert_eq!(like_notifications[0].post_id, Some(post.id));

    match events.recv().await {
        Some(ServerEvent::Notification(n)) => assert_eq!(n.id, like_notifications[0].id),
        other => panic!("expected notification event, got {:?}", other),
    }
    assert_eq!(app.state.hub.room_size(Room::User(u1.id)).await, 1);
}

#[tokio::test]
async fn test_like_twice_rejected_without_duplicate_notification() {
    let app = spawn_test_app().await;
    let owner = register_user(&app.server, "Ada").await;
    let fan = register_user(&app.server, "Grace").await;
    let post = create_post(&app.server, &owner, "Hello").await;

    let like_url = format!("/api/post/like/{}", post.id);
    app.server
        .post(&like_url)
        .authorization_bearer(&fan.token)
        .await
        .assert_status_ok();
    let again = app.server.post(&like_url).authorization_bearer(&fan.token).await;
    assert_eq!(failure(again, 400), "Post already liked");

    let notifications = notifications_of(&app.server, &owner).await;
    assert_eq!(notifications.len(), 1);
}

#[tokio::test]
async fn test_self_engagement_never_notifies() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let post = create_post(&app.server, &ada, "Talking to myself").await;

    for action in ["like", "share"] {
        app.server
            .post(&format!("/api/post/{}/{}", action, post.id))
            .authorization_bearer(&ada.token)
            .await
            .assert_status_ok();
    }
    app.server
        .post(&format!("/api/post/comment/{}", post.id))
        .authorization_bearer(&ada.token)
        .json(&serde_json::json!({ "text": "nice" }))
        .await
        .assert_status_ok();

    assert!(notifications_of(&app.server, &ada).await.is_empty());
}

#[tokio::test]
async fn test_comment_and_share_each_notify_once() {
    let app = spawn_test_app().await;
    let owner = register_user(&app.server, "Ada").await;
    let fan = register_user(&app.server, "Grace").await;
    let post = create_post(&app.server, &owner, "Notes on the engine").await;

    let commented: Post = data(
        app.server
            .post(&format!("/api/post/comment/{}", post.id))
            .authorization_bearer(&fan.token)
            .json(&serde_json::json!({ "text": "Brilliant" }))
            .await,
    );
    assert_eq!(commented.comments.len(), 1);
    assert_eq!(commented.comments[0].user.id, fan.id);
    assert_eq!(commented.comments[0].text, "Brilliant");

    let shared: Post = data(
        app.server
            .post(&format!("/api/post/share/{}", post.id))
            .authorization_bearer(&fan.token)
            .await,
    );
    assert_ne!(shared.id, post.id);
    assert_eq!(shared.user.id, fan.id);
    assert_eq!(shared.text, "Shared from Ada: Notes on the engine");
    assert_eq!(shared.shared_from, Some(post.id));
    assert!(shared.likes.is_empty());
    assert!(shared.comments.is_empty());

    let mut kinds: Vec<_> = notifications_of(&app.server, &owner)
        .await
        .into_iter()
        .map(|n| n.kind.as_str())
        .collect();
    kinds.sort();
    assert_eq!(kinds, vec!["comment", "share"]);
}

#[tokio::test]
async fn test_feed_contains_own_and_followed_posts_newest_first() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let grace = register_user(&app.server, "Grace").await;
    let stranger = register_user(&app.server, "Linus").await;
    follow(&app.server, &ada, &grace).await;

    let first = create_post(&app.server, &grace, "first").await;
    let second = create_post(&app.server, &ada, "second").await;
    create_post(&app.server, &stranger, "unseen").await;

    let feed: Vec<Post> = data(
        app.server
            .get("/api/post/feed")
            .authorization_bearer(&ada.token)
            .await,
    );
    let ids: Vec<_> = feed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let graces: Vec<Post> = data(
        app.server
            .get(&format!("/api/post/user/{}", grace.id))
            .authorization_bearer(&stranger.token)
            .await,
    );
    assert_eq!(graces.len(), 1);
}

#[tokio::test]
async fn test_only_owner_can_edit_or_delete() {
    let app = spawn_test_app().await;
    let owner = register_user(&app.server, "Ada").await;
    let other = register_user(&app.server, "Grace").await;
    let post = create_post(&app.server, &owner, "draft").await;
    let url = format!("/api/post/{}", post.id);

    let edit = app
        .server
        .put(&url)
        .authorization_bearer(&other.token)
        .json(&serde_json::json!({ "text": "hijacked" }))
        .await;
    failure(edit, 403);
    let delete = app.server.delete(&url).authorization_bearer(&other.token).await;
    failure(delete, 403);

    let edited: Post = data(
        app.server
            .put(&url)
            .authorization_bearer(&owner.token)
            .json(&serde_json::json!({ "text": "final" }))
            .await,
    );
    assert_eq!(edited.text, "final");

    let deleted: DeletedPost = data(app.server.delete(&url).authorization_bearer(&owner.token).await);
    assert_eq!(deleted.id, post.id);

    let gone = app
        .server
        .post(&format!("/api/post/like/{}", post.id))
        .authorization_bearer(&other.token)
        .await;
    failure(gone, 404);
}

#[tokio::test]
async fn test_empty_post_rejected() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;
    let response = app
        .server
        .post("/api/post/create")
        .authorization_bearer(&ada.token)
        .json(&serde_json::json!({ "text": "   " }))
        .await;
    failure(response, 400);
}

#[tokio::test]
async fn test_text_edit_keeps_image_and_empty_image_removes_it() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;

    let post: Post = data(
        app.server
            .post("/api/post/create")
            .authorization_bearer(&ada.token)
            .json(&serde_json::json!({ "text": "Diagram", "image": "https://img.example/x.png" }))
            .await,
    );

    let edited: Post = data(
        app.server
            .put(&format!("/api/post/{}", post.id))
            .authorization_bearer(&ada.token)
            .json(&serde_json::json!({ "text": "Edited" }))
            .await,
    );
    assert_eq!(edited.text, "Edited");
    assert_eq!(edited.image.as_deref(), Some("https://img.example/x.png"));

    let cleared: Post = data(
        app.server
            .put(&format!("/api/post/{}", post.id))
            .authorization_bearer(&ada.token)
            .json(&serde_json::json!({ "text": "Edited", "image": "" }))
            .await,
    );
    assert_eq!(cleared.image, None);
}

#[tokio::test]
async fn test_bad_path_id_and_body_use_error_envelope() {
    let app = spawn_test_app().await;
    let ada = register_user(&app.server, "Ada").await;

    let bad_id = app
        .server
        .post("/api/post/like/not-a-uuid")
        .authorization_bearer(&ada.token)
        .await;
    failure(bad_id, 400);

    let missing_text = app
        .server
        .post("/api/post/create")
        .authorization_bearer(&ada.token)
        .json(&serde_json::json!({ "image": "https://img.example/x.png" }))
        .await;
    let message = failure(missing_text, 400);
    assert!(message.contains("text"), "{}", message);
}
