/**
 * Client Session
 *
 * The application context of one signed-in user. It owns the API client,
 * the real-time connection and the view state, so their lifetimes follow
 * login and logout explicitly instead of living in globals.
 *
 * # Lifecycle
 *
 * 1. `login` / `register` store the token and spawn the connection
 * 2. `next_event` + `handle_event` drive live updates into the state
 * 3. `open_chat` switches rooms (leave, then join) and reconciles messages
 * 4. `logout` closes the connection and drops all state
 */

use chrono::Utc;
use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::client::api::ApiClient;
use crate::client::config::ClientConfig;
use crate::client::realtime::{ConnectionState, RealtimeConnection, RetryPolicy};
use crate::client::state::{ChatState, NotificationState, TypingDebouncer};
use crate::client::toast::Toasts;
use crate::shared::models::{AuthResponse, ChatMessage, NotificationType, RegisterRequest, UserProfile};
use crate::shared::{ApiResult, ClientEvent, ErrorInfo, ServerEvent};

pub struct ClientSession {
    api: ApiClient,
    toasts: Toasts,
    policy: RetryPolicy,
    user: Option<UserProfile>,
    connection: Option<RealtimeConnection>,
    events: Option<mpsc::UnboundedReceiver<ServerEvent>>,
    chat: Option<ChatState>,
    notifications: NotificationState,
    typing: TypingDebouncer,
}

impl ClientSession {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    pub fn with_retry_policy(config: ClientConfig, policy: RetryPolicy) -> Self {
        let toasts = Toasts::new();
        Self {
            api: ApiClient::new(config, toasts.clone()),
            toasts,
            policy,
            user: None,
            connection: None,
            events: None,
            chat: None,
            notifications: NotificationState::default(),
            typing: TypingDebouncer::default(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn chat(&self) -> Option<&ChatState> {
        self.chat.as_ref()
    }

    pub fn notifications(&self) -> &NotificationState {
        &self.notifications
    }

    pub fn connection(&self) -> Option<&RealtimeConnection> {
        self.connection.as_ref()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
            .as_ref()
            .map(RealtimeConnection::state)
            .unwrap_or(ConnectionState::Disconnected)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<UserProfile> {
        let auth = self.api.login(email, password).await?;
        Ok(self.start(auth).await)
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> ApiResult<UserProfile> {
        let auth = self.api.register(request).await?;
        Ok(self.start(auth).await)
    }

    async fn start(&mut self, auth: AuthResponse) -> UserProfile {
        self.stop().await;

        let AuthResponse { token, user } = auth;
        tracing::info!("[Session] Signed in as {}", user.id);
        self.api.set_token(Some(token.clone()));

        let (connection, events) = RealtimeConnection::connect(
            self.api.config().server_url(),
            token,
            user.id,
            self.policy,
        );
        self.connection = Some(connection);
        self.events = Some(events);
        self.chat = Some(ChatState::new(user.id));
        self.user = Some(user.clone());
        user
    }

    async fn stop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.disconnect().await;
        }
        self.events = None;
        self.chat = None;
        self.user = None;
        self.notifications.clear();
        self.typing = TypingDebouncer::default();
    }

    pub async fn logout(&mut self) {
        self.stop().await;
        self.api.set_token(None);
        tracing::info!("[Session] Signed out");
    }

    /// Swap in a refreshed token and reconnect the socket with it
    pub fn set_token(&mut self, token: String) {
        self.api.set_token(Some(token.clone()));
        if let Some(connection) = &self.connection {
            connection.update_token(token);
        }
    }

    fn send(&self, event: ClientEvent) {
        if let Some(connection) = &self.connection {
            connection.send(event);
        }
    }

    pub async fn refresh_notifications(&mut self) -> ApiResult<bool> {
        let items = self.api.notifications().await?;
        Ok(self.notifications.set_all(items))
    }

    pub async fn mark_notification_read(&mut self, id: Uuid) -> ApiResult<bool> {
        let notification = self.api.mark_notification_read(id).await?;
        Ok(self.notifications.apply_update(notification))
    }

    pub async fn mark_all_notifications_read(&mut self) -> ApiResult<bool> {
        self.api.mark_all_notifications_read().await?;
        Ok(self.notifications.mark_all_read())
    }

    pub async fn refresh_chats(&mut self) -> ApiResult<bool> {
        let chats = self.api.chats().await?;
        Ok(self.chat_state_mut()?.set_chats(chats))
    }

    /// Start (or reopen) a conversation with `target` and open it
    pub async fn start_chat(&mut self, target: Uuid) -> ApiResult<Uuid> {
        let chat = self.api.initiate_chat(target).await?;
        self.refresh_chats().await?;
        self.open_chat(chat.id).await?;
        Ok(chat.id)
    }

    /// Open a conversation: switch rooms, load its messages, mark it read
    pub async fn open_chat(&mut self, chat_id: Uuid) -> ApiResult<bool> {
        let previous = self.chat_state_mut()?.open(chat_id);
        if let Some(previous) = previous.filter(|p| *p != chat_id) {
            if let Some(stop) = self.typing.stop(previous) {
                self.send(stop);
            }
        }
        if let Some(connection) = &self.connection {
            connection.set_active_chat(Some(chat_id));
        }

        let messages = self.api.messages(chat_id).await?;
        let mut changed = self.chat_state_mut()?.set_messages(chat_id, messages);

        if self.connection_state() == ConnectionState::Connected {
            self.send(ClientEvent::ReadMessage { chat_id });
        } else {
            self.api.mark_chat_read(chat_id).await?;
        }
        changed |= self.chat_state_mut()?.mark_active_read();
        Ok(changed)
    }

    pub fn close_chat(&mut self) {
        let closed = self.chat.as_mut().and_then(ChatState::close);
        if let Some(chat_id) = closed {
            if let Some(stop) = self.typing.stop(chat_id) {
                self.send(stop);
            }
        }
        if let Some(connection) = &self.connection {
            connection.set_active_chat(None);
        }
    }

    /// Send a message in the open conversation
    ///
    /// The message shows immediately under a placeholder key and is
    /// confirmed (or dropped) when the request completes.
    pub async fn send_message(&mut self, content: &str) -> ApiResult<ChatMessage> {
        let state = self.chat_state_mut()?;
        let Some(chat_id) = state.active_chat() else {
            let error = ErrorInfo::new(None, "No conversation is open");
            self.toasts.error(error.message.clone());
            return Err(error);
        };
        let key = state.push_pending(content, Utc::now());

        if let Some(stop) = self.typing.stop(chat_id) {
            self.send(stop);
        }

        let result = self.api.send_message(chat_id, content).await;
        let state = self.chat_state_mut()?;
        match (&result, key) {
            (Ok(message), Some(key)) => {
                state.confirm_sent(key, message.clone());
            }
            (Err(_), Some(key)) => {
                state.discard_pending(key);
            }
            _ => {}
        }
        result
    }

    /// Keystroke in the open conversation
    pub fn keystroke(&mut self, now: Instant) {
        let Some(chat_id) = self.chat.as_ref().and_then(ChatState::active_chat) else {
            return;
        };
        if let Some(event) = self.typing.keystroke(chat_id, now) {
            self.send(event);
        }
    }

    /// Emit pending typing-stopped events; call periodically
    pub fn flush_typing(&mut self, now: Instant) {
        for event in self.typing.poll(now) {
            self.send(event);
        }
    }

    /// Next live event, `None` when logged out or the connection task ended
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.events.as_mut()?.recv().await
    }

    /// Apply one live event; returns whether the view changed
    ///
    /// A message in a conversation missing from the list (a peer just
    /// started it) reloads the list before the event is applied.
    pub async fn handle_event(&mut self, event: ServerEvent) -> bool {
        match event {
            ServerEvent::Notification(notification) => {
                let is_message = notification.kind == NotificationType::Message;
                let mut changed = self.notifications.apply_new(notification);
                if is_message && self.chat.is_some() {
                    changed |= self.refresh_chats_quietly().await;
                }
                changed
            }
            ServerEvent::Message(message) => {
                let unlisted = self
                    .chat
                    .as_ref()
                    .is_some_and(|chat| chat.summary(message.chat_id).is_none());
                let mut changed = false;
                if unlisted {
                    tracing::debug!("[Session] Message for unlisted chat {}", message.chat_id);
                    changed = self.refresh_chats_quietly().await;
                }

                let Some(chat) = self.chat.as_mut() else {
                    return changed;
                };
                let chat_id = message.chat_id;
                let from_counterpart = message.sender_id != chat.local_user();
                let applied = chat.apply_message(message);
                if applied && from_counterpart && chat.active_chat() == Some(chat_id) {
                    self.send(ClientEvent::ReadMessage { chat_id });
                }
                changed || applied
            }
            ServerEvent::NotificationsRead { user_id } => {
                if self.user.as_ref().map(|u| u.id) != Some(user_id) {
                    return false;
                }
                self.notifications.mark_all_read()
            }
            ServerEvent::Typing {
                chat_id,
                user_id,
                is_typing,
            } => self
                .chat
                .as_mut()
                .is_some_and(|chat| chat.apply_typing(chat_id, user_id, is_typing)),
            ServerEvent::MessagesRead { chat_id, reader_id } => self
                .chat
                .as_mut()
                .is_some_and(|chat| chat.apply_messages_read(chat_id, reader_id)),
            ServerEvent::ConnectError { message } => {
                tracing::warn!("[Session] Real-time connection rejected: {}", message);
                self.toasts.error(message);
                false
            }
        }
    }

    async fn refresh_chats_quietly(&mut self) -> bool {
        match self.refresh_chats().await {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!("[Session] Chat list refresh failed: {}", e.message);
                false
            }
        }
    }

    fn chat_state_mut(&mut self) -> ApiResult<&mut ChatState> {
        if self.chat.is_none() {
            self.toasts.error("Not signed in");
        }
        self.chat
            .as_mut()
            .ok_or_else(|| ErrorInfo::new(Some(401), "Not signed in"))
    }
}
