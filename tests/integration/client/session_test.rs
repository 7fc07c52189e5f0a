//! ClientSession end to end against a live server

use devconnect::backend::realtime::Room;
use devconnect::client::{ClientConfig, ClientSession, ConnectionState, RealtimeConnection, RetryPolicy};
use devconnect::shared::models::{NotificationType, RegisterRequest};
use devconnect::shared::ServerEvent;
use pretty_assertions::assert_eq;
use std::time::Duration;
use uuid::Uuid;

use crate::common::{LiveServer, TEST_PASSWORD};

const WAIT: Duration = Duration::from_secs(3);

async fn signed_in(server: &LiveServer, name: &str) -> ClientSession {
    let config = ClientConfig::with_server_url(server.http_url()).expect("valid url");
    let mut session = ClientSession::new(config);
    let request = RegisterRequest {
        full_name: name.to_string(),
        email: format!("{}.{}@example.com", name, Uuid::new_v4().simple()),
        password: TEST_PASSWORD.to_string(),
        headline: None,
        location: None,
        skills: None,
        category: None,
    };
    let user = session.register(&request).await.expect("register");
    wait_connected(&session).await;
    server.wait_for_room(Room::User(user.id), 1).await;
    session
}

async fn wait_connected(session: &ClientSession) {
    let mut status = session.connection().expect("connection").watch_status();
    tokio::time::timeout(WAIT, status.wait_for(|s| s.state == ConnectionState::Connected))
        .await
        .expect("never connected")
        .expect("connection task ended");
}

/// Apply events until one matches `want`
async fn pump_until(session: &mut ClientSession, want: impl Fn(&ServerEvent) -> bool) -> ServerEvent {
    tokio::time::timeout(WAIT, async {
        loop {
            let event = session.next_event().await.expect("event stream ended");
            let matched = want(&event);
            session.handle_event(event.clone()).await;
            if matched {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn test_message_reaches_open_chat_of_peer() {
    let server = LiveServer::spawn().await;
    let mut ada = signed_in(&server, "ada").await;
    let mut grace = signed_in(&server, "grace").await;
    let grace_id = grace.user().expect("signed in").id;

    let chat_id = ada.start_chat(grace_id).await.expect("start chat");
    server.wait_for_room(Room::Chat(chat_id), 1).await;
    ada.send_message("hi").await.expect("send");

    // Grace is not in the chat yet: the message arrives as a notification
    let event = pump_until(&mut grace, |e| matches!(e, ServerEvent::Notification(_))).await;
    match event {
        ServerEvent::Notification(n) => assert_eq!(n.kind, NotificationType::Message),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(grace.notifications().unread_count(), 1);

    // The message notification pulled the new conversation into the list
    let listed = grace.chat().expect("chat state").summary(chat_id).expect("chat listed");
    assert_eq!(listed.unread_count, 1);
    assert_eq!(listed.last_message.as_ref().map(|m| m.content.as_str()), Some("hi"));

    grace.open_chat(chat_id).await.expect("open");
    server.wait_for_room(Room::Chat(chat_id), 2).await;
    let opened = grace.chat().expect("chat state");
    assert_eq!(opened.messages().len(), 1);
    assert_eq!(opened.summary(chat_id).map(|s| s.unread_count), Some(0));

    let sent = ada.send_message("second").await.expect("send");
    pump_until(&mut grace, |e| matches!(e, ServerEvent::Message(m) if m.id == sent.id)).await;

    let chat = grace.chat().expect("chat state");
    let contents: Vec<&str> = chat.messages().entries().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hi", "second"]);

    // Ada's own copy is confirmed exactly once
    let ada_chat = ada.chat().expect("chat state");
    assert_eq!(ada_chat.messages().len(), 2);
    assert!(ada_chat.messages().entries().iter().all(|m| !m.is_pending()));
}

#[tokio::test]
async fn test_live_message_for_unlisted_chat_reloads_list() {
    let server = LiveServer::spawn().await;
    let mut ada = signed_in(&server, "ada").await;
    let mut grace = signed_in(&server, "grace").await;
    let grace_id = grace.user().expect("signed in").id;

    let chat_id = ada.start_chat(grace_id).await.expect("start chat");
    // Grace opens the room straight away, before her list knows the chat
    grace.open_chat(chat_id).await.expect("open");
    assert!(grace.chat().expect("chat state").summary(chat_id).is_none());
    server.wait_for_room(Room::Chat(chat_id), 2).await;

    let sent = ada.send_message("hello there").await.expect("send");
    pump_until(&mut grace, |e| matches!(e, ServerEvent::Message(m) if m.id == sent.id)).await;

    let chat = grace.chat().expect("chat state");
    assert!(chat.summary(chat_id).is_some());
    assert_eq!(chat.messages().len(), 1);
}

#[tokio::test]
async fn test_notifications_refresh_and_mark_all() {
    let server = LiveServer::spawn().await;
    let mut ada = signed_in(&server, "ada").await;
    let grace = signed_in(&server, "grace").await;
    let ada_id = ada.user().expect("signed in").id;

    grace.api().follow(ada_id).await.expect("follow");
    pump_until(&mut ada, |e| matches!(e, ServerEvent::Notification(_))).await;
    assert_eq!(ada.notifications().unread_count(), 1);

    ada.refresh_notifications().await.expect("refresh");
    assert_eq!(ada.notifications().items().len(), 1);

    assert!(ada.mark_all_notifications_read().await.expect("mark all"));
    assert_eq!(ada.notifications().unread_count(), 0);
}

#[tokio::test]
async fn test_logout_disconnects_and_clears_state() {
    let server = LiveServer::spawn().await;
    let mut ada = signed_in(&server, "ada").await;
    let ada_id = ada.user().expect("signed in").id;

    ada.logout().await;

    assert_eq!(ada.connection_state(), ConnectionState::Disconnected);
    assert!(ada.user().is_none());
    assert!(ada.chat().is_none());
    assert!(ada.next_event().await.is_none());

    tokio::time::timeout(WAIT, async {
        while server.state.hub.room_size(Room::User(ada_id)).await > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("server never dropped the socket");
}

#[tokio::test]
async fn test_rejected_token_is_not_retried() {
    let server = LiveServer::spawn().await;
    let policy = RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(10),
    };
    let (connection, mut events) =
        RealtimeConnection::connect(server.http_url(), "forged-token", Uuid::new_v4(), policy);

    let event = tokio::time::timeout(WAIT, events.recv())
        .await
        .expect("no event")
        .expect("event stream ended");
    assert!(matches!(event, ServerEvent::ConnectError { .. }));

    let mut status = connection.watch_status();
    let status = tokio::time::timeout(WAIT, status.wait_for(|s| s.gave_up))
        .await
        .expect("never gave up")
        .map(|s| *s)
        .expect("connection task ended");
    assert_eq!(status.state, ConnectionState::Disconnected);
    assert_eq!(status.attempts, 0);
    connection.disconnect().await;
}
