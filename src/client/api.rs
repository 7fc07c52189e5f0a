//! REST API Client
//!
//! Async wrappers over every `/api` endpoint. Each call returns
//! `ApiResult<T>`; on failure the error message is also pushed to the
//! shared [`Toasts`] queue before it is returned, so callers can simply
//! propagate or ignore it.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::client::config::ClientConfig;
use crate::client::toast::Toasts;
use crate::shared::models::{
    AuthResponse, Chat, ChatMessage, ChatReadResponse, ChatSummary, CommentRequest,
    CreatePostRequest, DeletedPost, DeveloperCategory, FollowResponse, LoginRequest,
    MarkAllReadResponse, Notification, Post, RegisterRequest, SendMessageRequest,
    UpdatePostRequest, UpdateProfileRequest, UserProfile,
};
use crate::shared::{ApiResponse, ApiResult, ErrorInfo};

/// DevConnect REST client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
    toasts: Toasts,
}

impl ApiClient {
    pub fn new(config: ClientConfig, toasts: Toasts) -> Self {
        Self {
            config,
            client: Client::new(),
            toasts,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.config.set_token(token);
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.send(method.clone(), path, body).await;
        if let Err(e) = &result {
            tracing::warn!("[Api] {} {} failed: {}", method, path, e.message);
            self.toasts.error(e.message.clone());
        }
        result
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.request(method, self.config.api_url(path));
        if let Some(token) = self.config.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ErrorInfo::transport(format!("Network error: {}", e)))?;
        let status = response.status().as_u16();

        let envelope = response.json::<ApiResponse<T>>().await.map_err(|e| {
            ErrorInfo::new(Some(status), format!("Failed to parse response: {}", e))
        })?;
        envelope.into_result(Some(status))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::POST, path, None).await
    }

    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::PATCH, path, None).await
    }

    // Users

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.request(Method::POST, "/api/user/register", Some(request)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.request(Method::POST, "/api/user/login", Some(&request)).await
    }

    pub async fn get_profile(&self) -> ApiResult<UserProfile> {
        self.get("/api/user/profile").await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ApiResult<UserProfile> {
        self.request(Method::PUT, "/api/user/profile", Some(request)).await
    }

    pub async fn get_profile_by_id(&self, user_id: Uuid) -> ApiResult<UserProfile> {
        self.get(&format!("/api/user/profile/{}", user_id)).await
    }

    pub async fn list_developers(&self, category: Option<DeveloperCategory>) -> ApiResult<Vec<UserProfile>> {
        match category {
            Some(category) => {
                self.get(&format!("/api/user/developers?category={}", category.as_str()))
                    .await
            }
            None => self.get("/api/user/developers").await,
        }
    }

    pub async fn follow(&self, user_id: Uuid) -> ApiResult<FollowResponse> {
        self.post_empty(&format!("/api/user/follow/{}", user_id)).await
    }

    pub async fn unfollow(&self, user_id: Uuid) -> ApiResult<FollowResponse> {
        self.post_empty(&format!("/api/user/unfollow/{}", user_id)).await
    }

    // Posts

    pub async fn create_post(&self, request: &CreatePostRequest) -> ApiResult<Post> {
        self.request(Method::POST, "/api/post/create", Some(request)).await
    }

    pub async fn feed(&self) -> ApiResult<Vec<Post>> {
        self.get("/api/post/feed").await
    }

    pub async fn user_posts(&self, user_id: Uuid) -> ApiResult<Vec<Post>> {
        self.get(&format!("/api/post/user/{}", user_id)).await
    }

    pub async fn like_post(&self, post_id: Uuid) -> ApiResult<Post> {
        self.post_empty(&format!("/api/post/like/{}", post_id)).await
    }

    pub async fn comment_post(&self, post_id: Uuid, text: &str) -> ApiResult<Post> {
        let request = CommentRequest {
            text: text.to_string(),
        };
        self.request(Method::POST, &format!("/api/post/comment/{}", post_id), Some(&request))
            .await
    }

    pub async fn share_post(&self, post_id: Uuid) -> ApiResult<Post> {
        self.post_empty(&format!("/api/post/share/{}", post_id)).await
    }

    pub async fn update_post(&self, post_id: Uuid, request: &UpdatePostRequest) -> ApiResult<Post> {
        self.request(Method::PUT, &format!("/api/post/{}", post_id), Some(request)).await
    }

    pub async fn delete_post(&self, post_id: Uuid) -> ApiResult<DeletedPost> {
        self.request::<_, ()>(Method::DELETE, &format!("/api/post/{}", post_id), None)
            .await
    }

    // Notifications

    pub async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        self.get("/api/notifications").await
    }

    pub async fn mark_notification_read(&self, notification_id: Uuid) -> ApiResult<Notification> {
        self.patch_empty(&format!("/api/notifications/mark-read/{}", notification_id))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResult<MarkAllReadResponse> {
        self.patch_empty("/api/notifications/mark-all-read").await
    }

    // Chats

    pub async fn chats(&self) -> ApiResult<Vec<ChatSummary>> {
        self.get("/api/chats").await
    }

    pub async fn initiate_chat(&self, target: Uuid) -> ApiResult<Chat> {
        self.post_empty(&format!("/api/chats/initiate/{}", target)).await
    }

    pub async fn messages(&self, chat_id: Uuid) -> ApiResult<Vec<ChatMessage>> {
        self.get(&format!("/api/chats/{}/messages", chat_id)).await
    }

    pub async fn send_message(&self, chat_id: Uuid, content: &str) -> ApiResult<ChatMessage> {
        let request = SendMessageRequest {
            content: content.to_string(),
        };
        self.request(Method::POST, &format!("/api/chats/{}/messages", chat_id), Some(&request))
            .await
    }

    pub async fn mark_chat_read(&self, chat_id: Uuid) -> ApiResult<ChatReadResponse> {
        self.patch_empty(&format!("/api/chats/{}/read", chat_id)).await
    }
}
