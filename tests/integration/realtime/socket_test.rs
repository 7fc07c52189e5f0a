//! Socket handshake, rooms and event relay

use assert_matches::assert_matches;
use devconnect::backend::realtime::Room;
use devconnect::shared::models::{CreatePostRequest, NotificationType};
use devconnect::shared::{ClientEvent, ServerEvent};
use futures_util::StreamExt;
use pretty_assertions::assert_eq;
use tokio_tungstenite::tungstenite::Message;

use crate::common::{assert_silent, next_event, send_event, LiveServer};

#[tokio::test]
async fn test_bad_token_gets_connect_error() {
    let server = LiveServer::spawn().await;
    let mut socket = server.connect("not-a-jwt").await;

    assert_matches!(next_event(&mut socket).await, ServerEvent::ConnectError { .. });
    let closed = tokio::time::timeout(std::time::Duration::from_secs(3), socket.next())
        .await
        .expect("server never closed the socket");
    assert_matches!(closed, None | Some(Ok(Message::Close(_))) | Some(Err(_)));
    assert_eq!(server.state.hub.connection_count().await, 0);
}

#[tokio::test]
async fn test_missing_token_gets_connect_error() {
    let server = LiveServer::spawn().await;
    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/api/socket", server.addr))
        .await
        .expect("socket connect");

    assert_matches!(next_event(&mut socket).await, ServerEvent::ConnectError { .. });
}

#[tokio::test]
async fn test_registered_socket_receives_notifications() {
    let server = LiveServer::spawn().await;
    let (ada_api, ada) = server.register("ada").await;
    let (grace_api, grace) = server.register("grace").await;

    let mut socket = server.connect(&ada.token).await;
    send_event(&mut socket, &ClientEvent::RegisterUser { user_id: ada.user.id }).await;
    server.wait_for_room(Room::User(ada.user.id), 1).await;

    let post = ada_api
        .create_post(&CreatePostRequest {
            text: "Shipping the socket layer".to_string(),
            image: None,
        })
        .await
        .unwrap();
    grace_api.like_post(post.id).await.unwrap();

    match next_event(&mut socket).await {
        ServerEvent::Notification(n) => {
            assert_eq!(n.kind, NotificationType::Like);
            assert_eq!(n.sender.id, grace.user.id);
            assert_eq!(n.post_id, Some(post.id));
        }
        other => panic!("expected notification, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cannot_register_as_another_user() {
    let server = LiveServer::spawn().await;
    let (_, ada) = server.register("ada").await;
    let (_, grace) = server.register("grace").await;

    let mut socket = server.connect(&ada.token).await;
    send_event(&mut socket, &ClientEvent::RegisterUser { user_id: grace.user.id }).await;

    assert_matches!(next_event(&mut socket).await, ServerEvent::ConnectError { .. });
    assert_eq!(server.state.hub.room_size(Room::User(grace.user.id)).await, 0);
}

#[tokio::test]
async fn test_joined_socket_receives_messages() {
    let server = LiveServer::spawn().await;
    let (ada_api, ada) = server.register("ada").await;
    let (_, grace) = server.register("grace").await;
    let chat = ada_api.initiate_chat(grace.user.id).await.unwrap();

    let mut socket = server.connect(&grace.token).await;
    send_event(&mut socket, &ClientEvent::JoinChat { chat_id: chat.id }).await;
    server.wait_for_room(Room::Chat(chat.id), 1).await;

    let sent = ada_api.send_message(chat.id, "hi").await.unwrap();
    assert_eq!(next_event(&mut socket).await, ServerEvent::Message(sent));
}

#[tokio::test]
async fn test_outsider_cannot_join_chat() {
    let server = LiveServer::spawn().await;
    let (ada_api, _) = server.register("ada").await;
    let (_, grace) = server.register("grace").await;
    let (_, linus) = server.register("linus").await;
    let chat = ada_api.initiate_chat(grace.user.id).await.unwrap();

    let mut socket = server.connect(&linus.token).await;
    send_event(&mut socket, &ClientEvent::JoinChat { chat_id: chat.id }).await;
    // Registration is processed after the join, so once it lands the join was handled
    send_event(&mut socket, &ClientEvent::RegisterUser { user_id: linus.user.id }).await;
    server.wait_for_room(Room::User(linus.user.id), 1).await;

    assert_eq!(server.state.hub.room_size(Room::Chat(chat.id)).await, 0);
    ada_api.send_message(chat.id, "private").await.unwrap();
    assert_silent(&mut socket).await;
}

#[tokio::test]
async fn test_typing_is_relayed_to_peer_only() {
    let server = LiveServer::spawn().await;
    let (ada_api, ada) = server.register("ada").await;
    let (_, grace) = server.register("grace").await;
    let chat = ada_api.initiate_chat(grace.user.id).await.unwrap();

    let mut ada_socket = server.connect(&ada.token).await;
    let mut grace_socket = server.connect(&grace.token).await;
    send_event(&mut ada_socket, &ClientEvent::JoinChat { chat_id: chat.id }).await;
    send_event(&mut grace_socket, &ClientEvent::JoinChat { chat_id: chat.id }).await;
    server.wait_for_room(Room::Chat(chat.id), 2).await;

    let typing = ClientEvent::Typing {
        chat_id: chat.id,
        is_typing: true,
    };
    send_event(&mut ada_socket, &typing).await;

    assert_eq!(
        next_event(&mut grace_socket).await,
        ServerEvent::Typing {
            chat_id: chat.id,
            user_id: ada.user.id,
            is_typing: true,
        }
    );
    assert_silent(&mut ada_socket).await;
}

#[tokio::test]
async fn test_read_message_notifies_peer() {
    let server = LiveServer::spawn().await;
    let (ada_api, ada) = server.register("ada").await;
    let (grace_api, grace) = server.register("grace").await;
    let chat = ada_api.initiate_chat(grace.user.id).await.unwrap();
    ada_api.send_message(chat.id, "hi").await.unwrap();

    let mut ada_socket = server.connect(&ada.token).await;
    let mut grace_socket = server.connect(&grace.token).await;
    send_event(&mut ada_socket, &ClientEvent::JoinChat { chat_id: chat.id }).await;
    send_event(&mut grace_socket, &ClientEvent::JoinChat { chat_id: chat.id }).await;
    server.wait_for_room(Room::Chat(chat.id), 2).await;

    send_event(&mut grace_socket, &ClientEvent::ReadMessage { chat_id: chat.id }).await;

    assert_eq!(
        next_event(&mut ada_socket).await,
        ServerEvent::MessagesRead {
            chat_id: chat.id,
            reader_id: grace.user.id,
        }
    );
    assert_silent(&mut grace_socket).await;

    let inbox = grace_api.chats().await.unwrap();
    assert_eq!(inbox[0].unread_count, 0);
}
