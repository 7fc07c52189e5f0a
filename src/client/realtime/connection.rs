/**
 * Real-time Connection
 *
 * One long-lived WebSocket per logged-in session, owned by a background
 * task. The handle talks to the task over an mpsc command channel and
 * observes its state through a `watch` channel; decoded server events are
 * forwarded on a second mpsc channel in arrival order.
 *
 * # Lifecycle
 *
 * ```text
 * Disconnected -> Connecting -> Connected -> (lost) -> Connecting ...
 *                                         -> (retries exhausted) -> Disconnected, gave_up
 * ```
 *
 * On every (re)connect the task sends `register_user` and re-joins the
 * active chat room. Switching chats leaves the previous room before joining
 * the next. A token change closes the socket and connects again with the
 * new credential. A `connect_error` followed by a close is treated as a
 * rejected credential and is not retried.
 */

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use crate::client::config::socket_url_for;
use crate::client::realtime::retry::RetryPolicy;
use crate::shared::{ClientEvent, ServerEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Snapshot published by the connection task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Failed attempts since the last successful connect
    pub attempts: u32,
    /// Retries are exhausted or the credential was rejected
    pub gave_up: bool,
}

impl ConnectionStatus {
    fn new(state: ConnectionState, attempts: u32, gave_up: bool) -> Self {
        Self {
            state,
            attempts,
            gave_up,
        }
    }
}

#[derive(Debug)]
enum Command {
    Send(ClientEvent),
    SetActiveChat(Option<Uuid>),
    UpdateToken(String),
    Shutdown,
}

/// Handle to the session's WebSocket task
#[derive(Debug)]
pub struct RealtimeConnection {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<ConnectionStatus>,
    task: JoinHandle<()>,
}

impl RealtimeConnection {
    /// Spawn the connection task
    ///
    /// Must be called from within a tokio runtime. The returned receiver
    /// yields every server event in the order the server emitted it.
    pub fn connect(
        server_url: impl Into<String>,
        token: impl Into<String>,
        user_id: Uuid,
        policy: RetryPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) =
            watch::channel(ConnectionStatus::new(ConnectionState::Disconnected, 0, false));

        let worker = Worker {
            server_url: server_url.into(),
            token: token.into(),
            user_id,
            active_chat: None,
            policy,
            commands: command_rx,
            events: event_tx,
            status: status_tx,
        };
        let task = tokio::spawn(worker.run());

        let connection = Self {
            commands: command_tx,
            status: status_rx,
            task,
        };
        (connection, event_rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.status.borrow().state
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Subscribe to state changes
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Queue an event; dropped if the socket is not connected when the task
    /// gets to it
    pub fn send(&self, event: ClientEvent) -> bool {
        self.commands.send(Command::Send(event)).is_ok()
    }

    /// Leave the current chat room (if any) and join `chat_id`
    pub fn set_active_chat(&self, chat_id: Option<Uuid>) {
        let _ = self.commands.send(Command::SetActiveChat(chat_id));
    }

    /// Reconnect with a new credential
    pub fn update_token(&self, token: impl Into<String>) {
        let _ = self.commands.send(Command::UpdateToken(token.into()));
    }

    /// Close the socket and wait for the task to finish
    pub async fn disconnect(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!("[Realtime] Connection task ended abnormally: {}", e);
        }
    }
}

enum Exit {
    Shutdown,
    Lost,
    Rejected,
    Restart,
}

struct Worker {
    server_url: String,
    token: String,
    user_id: Uuid,
    active_chat: Option<Uuid>,
    policy: RetryPolicy,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<ServerEvent>,
    status: watch::Sender<ConnectionStatus>,
}

impl Worker {
    fn publish(&self, state: ConnectionState, attempts: u32, gave_up: bool) {
        self.status.send_replace(ConnectionStatus::new(state, attempts, gave_up));
    }

    async fn run(mut self) {
        let mut attempts = 0;
        loop {
            self.publish(ConnectionState::Connecting, attempts, false);
            let url = socket_url_for(&self.server_url, &self.token);

            match connect_async(url.as_str()).await {
                Ok((stream, _)) => {
                    attempts = 0;
                    self.publish(ConnectionState::Connected, 0, false);
                    tracing::info!("[Realtime] Connected as {}", self.user_id);

                    match self.drive(stream).await {
                        Exit::Shutdown => break,
                        Exit::Restart => continue,
                        Exit::Rejected => {
                            tracing::warn!("[Realtime] Credential rejected, not retrying");
                            self.publish(ConnectionState::Disconnected, 0, true);
                            match self.idle(None).await {
                                Exit::Restart => continue,
                                _ => break,
                            }
                        }
                        Exit::Lost => tracing::info!("[Realtime] Connection lost"),
                    }
                }
                Err(e) => tracing::debug!("[Realtime] Connect failed: {}", e),
            }

            attempts += 1;
            let delay = self.policy.delay_for(attempts);
            let gave_up = delay.is_none();
            if gave_up {
                tracing::warn!("[Realtime] Giving up after {} attempts", attempts - 1);
            }
            self.publish(ConnectionState::Disconnected, attempts, gave_up);

            match self.idle(delay).await {
                Exit::Restart => attempts = 0,
                Exit::Shutdown => break,
                _ => {}
            }
        }

        self.publish(ConnectionState::Disconnected, 0, false);
        tracing::info!("[Realtime] Connection closed");
    }

    /// Wait out a backoff (or forever when `delay` is `None`) while still
    /// accepting commands
    async fn idle(&mut self, delay: Option<Duration>) -> Exit {
        let sleep = async move {
            match delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return Exit::Lost,
                command = self.commands.recv() => match command {
                    Some(Command::UpdateToken(token)) => {
                        self.token = token;
                        return Exit::Restart;
                    }
                    Some(Command::SetActiveChat(chat_id)) => self.active_chat = chat_id,
                    Some(Command::Send(event)) => {
                        tracing::debug!("[Realtime] Dropping {} while disconnected", event.name());
                    }
                    Some(Command::Shutdown) | None => return Exit::Shutdown,
                },
            }
        }
    }

    async fn drive(&mut self, stream: WsStream) -> Exit {
        let (mut sink, mut source) = stream.split();

        let mut greeting = vec![ClientEvent::RegisterUser {
            user_id: self.user_id,
        }];
        if let Some(chat_id) = self.active_chat {
            greeting.push(ClientEvent::JoinChat { chat_id });
        }
        // A failed greeting still drains the reader: a rejecting server may
        // already have queued its connect_error before closing
        for event in &greeting {
            if let Err(e) = send_event(&mut sink, event).await {
                tracing::debug!("[Realtime] Greeting failed: {}", e);
                break;
            }
        }

        let mut rejected = false;
        let ended = |rejected: bool| if rejected { Exit::Rejected } else { Exit::Lost };

        loop {
            tokio::select! {
                frame = source.next() => match frame {
                    Some(Ok(Message::Text(text))) => match ServerEvent::from_json(text.as_str()) {
                        Ok(event) => {
                            if matches!(event, ServerEvent::ConnectError { .. }) {
                                rejected = true;
                            }
                            if self.events.send(event).is_err() {
                                tracing::debug!("[Realtime] Event receiver dropped");
                            }
                        }
                        Err(e) => tracing::warn!("[Realtime] Unreadable frame: {}", e),
                    },
                    Some(Ok(Message::Close(_))) | None => return ended(rejected),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("[Realtime] Read error: {}", e);
                        return ended(rejected);
                    }
                },
                command = self.commands.recv() => match command {
                    Some(Command::Send(event)) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            return Exit::Lost;
                        }
                    }
                    Some(Command::SetActiveChat(chat_id)) => {
                        if self.switch_chat(&mut sink, chat_id).await.is_err() {
                            return Exit::Lost;
                        }
                    }
                    Some(Command::UpdateToken(token)) => {
                        tracing::info!("[Realtime] Token changed, reconnecting");
                        self.token = token;
                        let _ = sink.close().await;
                        return Exit::Restart;
                    }
                    Some(Command::Shutdown) | None => {
                        let _ = sink.close().await;
                        return Exit::Shutdown;
                    }
                },
            }
        }
    }

    async fn switch_chat(
        &mut self,
        sink: &mut WsSink,
        chat_id: Option<Uuid>,
    ) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        if self.active_chat == chat_id {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.active_chat, chat_id);
        if let Some(previous) = previous {
            send_event(sink, &ClientEvent::LeaveChat { chat_id: previous }).await?;
        }
        if let Some(next) = chat_id {
            send_event(sink, &ClientEvent::JoinChat { chat_id: next }).await?;
        }
        Ok(())
    }
}

async fn send_event(
    sink: &mut WsSink,
    event: &ClientEvent,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    match event.to_json() {
        Ok(frame) => sink.send(Message::Text(frame.into())).await,
        Err(e) => {
            tracing::error!("[Realtime] Failed to encode {}: {}", event.name(), e);
            Ok(())
        }
    }
}
