//! Chat HTTP Handlers
//!
//! Thin wrappers over `chat::service`; every route requires authentication.
//!
//! - `GET /api/chats`
//! - `POST /api/chats/initiate/{target}`
//! - `GET /api/chats/{id}/messages`
//! - `POST /api/chats/{id}/messages`
//! - `PATCH /api/chats/{id}/read`

use axum::extract::State;
use uuid::Uuid;

use crate::backend::chat::service;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::server::state::AppState;
use crate::shared::models::{Chat, ChatMessage, ChatReadResponse, ChatSummary, SendMessageRequest};
use crate::shared::ApiResponse;

pub async fn list_chats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ChatSummary>>>, BackendError> {
    let chats = service::list_chats(&state.db, auth.id()).await?;
    Ok(Json(ApiResponse::ok(chats)))
}

pub async fn initiate_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target): Path<Uuid>,
) -> Result<Json<ApiResponse<Chat>>, BackendError> {
    let chat = service::initiate_chat(&state.db, auth.id(), target).await?;
    Ok(Json(ApiResponse::ok(chat)))
}

pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, BackendError> {
    let messages = service::list_messages(&state.db, chat_id, auth.id()).await?;
    Ok(Json(ApiResponse::ok(messages)))
}

pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<ChatMessage>>, BackendError> {
    let message = service::send_message(&state.db, &state.hub, chat_id, auth.id(), &request).await?;
    Ok(Json(ApiResponse::ok(message)))
}

pub async fn mark_chat_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ChatReadResponse>>, BackendError> {
    let updated = service::mark_chat_read(&state.db, &state.hub, chat_id, auth.id(), None).await?;
    Ok(Json(ApiResponse::ok(ChatReadResponse { chat_id, updated })))
}
