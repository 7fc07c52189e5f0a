//! Live server fixture
//!
//! WebSocket tests need a real listener: the app is served with
//! `axum::serve` on an ephemeral port and driven with `tokio-tungstenite`
//! or the crate's own client.

use devconnect::backend::realtime::Room;
use devconnect::backend::server::{build_app, AppState};
use devconnect::client::{ApiClient, ClientConfig, Toasts};
use devconnect::shared::models::{AuthResponse, RegisterRequest};
use devconnect::shared::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use super::auth_helpers::TEST_PASSWORD;
use super::database::test_state;

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_TIMEOUT: Duration = Duration::from_secs(3);

pub struct LiveServer {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl LiveServer {
    pub async fn spawn() -> Self {
        let state = test_state().await;
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = build_app(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });
        Self { addr, state, handle }
    }

    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn socket_url(&self, token: &str) -> String {
        format!("ws://{}/api/socket?token={}", self.addr, token)
    }

    /// API client with no token, sharing a fresh toast queue
    pub fn api(&self) -> ApiClient {
        let config = ClientConfig::with_server_url(self.http_url()).expect("valid url");
        ApiClient::new(config, Toasts::new())
    }

    /// Register `name` and return an authenticated client
    pub async fn register(&self, name: &str) -> (ApiClient, AuthResponse) {
        let mut api = self.api();
        let request = RegisterRequest {
            full_name: name.to_string(),
            email: format!("{}.{}@example.com", name.to_lowercase(), Uuid::new_v4().simple()),
            password: TEST_PASSWORD.to_string(),
            headline: None,
            location: None,
            skills: None,
            category: None,
        };
        let auth = api.register(&request).await.expect("register");
        api.set_token(Some(auth.token.clone()));
        (api, auth)
    }

    pub async fn connect(&self, token: &str) -> TestSocket {
        let (socket, _) = tokio_tungstenite::connect_async(self.socket_url(token))
            .await
            .expect("socket connect");
        socket
    }

    /// Wait until `room` has at least `size` sockets
    pub async fn wait_for_room(&self, room: Room, size: usize) {
        let hub = self.state.hub.clone();
        tokio::time::timeout(EVENT_TIMEOUT, async move {
            while hub.room_size(room).await < size {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("room never reached expected size");
    }
}

pub async fn send_event(socket: &mut TestSocket, event: &ClientEvent) {
    let frame = event.to_json().expect("encode");
    socket.send(Message::Text(frame.into())).await.expect("send");
}

/// Next decoded server event, skipping control frames
pub async fn next_event(socket: &mut TestSocket) -> ServerEvent {
    tokio::time::timeout(EVENT_TIMEOUT, async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => {
                    return ServerEvent::from_json(text.as_str()).expect("decode");
                }
                Some(Ok(_)) => continue,
                other => panic!("socket ended: {:?}", other),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Assert nothing arrives within a short window
pub async fn assert_silent(socket: &mut TestSocket) {
    let result = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(result.is_err(), "unexpected frame: {:?}", result);
}
