/**
 * Post HTTP Handlers
 *
 * # Routes
 *
 * - `POST /api/post/create` - create a post
 * - `GET /api/post/feed` - own and followed users' posts, newest first
 * - `GET /api/post/user/{id}` - one user's posts, newest first
 * - `POST /api/post/like/{id}` - like once; notifies the owner
 * - `POST /api/post/comment/{id}` - append a comment; notifies the owner
 * - `POST /api/post/share/{id}` - clone with attribution; notifies the owner
 * - `PUT /api/post/{id}` / `DELETE /api/post/{id}` - owner only
 *
 * Engagement handlers return the updated post; share returns the new clone.
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::require_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::notifications::notify;
use crate::backend::posts::db;
use crate::backend::server::state::AppState;
use crate::shared::models::{
    share_text, CommentRequest, CreatePostRequest, DeletedPost, NotificationType, Post,
    UpdatePostRequest,
};
use crate::shared::ApiResponse;

async fn require_post(state: &AppState, id: Uuid) -> BackendResult<Post> {
    db::get_post(&state.db, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))
}

fn clean_image(image: Option<String>) -> Option<String> {
    image.map(|url| url.trim().to_string()).filter(|url| !url.is_empty())
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<ApiResponse<Post>>, BackendError> {
    request.validate()?;
    let image = clean_image(request.image);
    let id = db::insert_post(&state.db, auth.id(), request.text.trim(), image.as_deref(), None).await?;
    tracing::info!("Post {} created by {}", id, auth.id());

    Ok(Json(ApiResponse::ok(require_post(&state, id).await?)))
}

pub async fn get_feed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Post>>>, BackendError> {
    let posts = db::list_feed(&state.db, auth.id()).await?;
    Ok(Json(ApiResponse::ok(posts)))
}

pub async fn get_user_posts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Post>>>, BackendError> {
    require_user(&state.db, user_id).await?;
    let posts = db::list_by_user(&state.db, user_id).await?;
    Ok(Json(ApiResponse::ok(posts)))
}

/// Like a post
///
/// A second like by the same user is rejected and produces no notification.
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Post>>, BackendError> {
    let post = require_post(&state, id).await?;
    if post.is_liked_by(auth.id()) {
        return Err(BackendError::invalid_operation("Post already liked"));
    }
    // Unique (post, user) key catches a concurrent duplicate
    if !db::add_like(&state.db, id, auth.id()).await? {
        return Err(BackendError::invalid_operation("Post already liked"));
    }

    let liker = require_user(&state.db, auth.id()).await?;
    notify(&state.db, &state.hub, post.user.id, &liker.public(), NotificationType::Like, Some(id)).await?;

    Ok(Json(ApiResponse::ok(require_post(&state, id).await?)))
}

pub async fn comment_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<ApiResponse<Post>>, BackendError> {
    request.validate()?;
    let post = require_post(&state, id).await?;

    db::add_comment(&state.db, id, auth.id(), request.text.trim()).await?;

    let commenter = require_user(&state.db, auth.id()).await?;
    notify(&state.db, &state.hub, post.user.id, &commenter.public(), NotificationType::Comment, Some(id)).await?;

    Ok(Json(ApiResponse::ok(require_post(&state, id).await?)))
}

/// Share a post as a new post owned by the caller
///
/// The clone has its own identity, likes and comments; `shared_from` points
/// at the source post.
pub async fn share_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Post>>, BackendError> {
    let original = require_post(&state, id).await?;
    let text = share_text(&original.user.full_name, &original.text);

    let clone_id = db::insert_post(&state.db, auth.id(), &text, original.image.as_deref(), Some(id)).await?;
    tracing::info!("Post {} shared by {} as {}", id, auth.id(), clone_id);

    let sharer = require_user(&state.db, auth.id()).await?;
    notify(&state.db, &state.hub, original.user.id, &sharer.public(), NotificationType::Share, Some(id)).await?;

    Ok(Json(ApiResponse::ok(require_post(&state, clone_id).await?)))
}

pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<ApiResponse<Post>>, BackendError> {
    let post = require_post(&state, id).await?;
    if !post.is_owned_by(auth.id()) {
        return Err(BackendError::forbidden("You can only edit your own posts"));
    }
    request.validate()?;

    // Omitted image keeps the current one; an empty string removes it
    let image = match request.image {
        Some(raw) => clean_image(Some(raw)),
        None => post.image.clone(),
    };
    db::update_post(&state.db, id, request.text.trim(), image.as_deref()).await?;
    tracing::info!("Post {} edited", id);

    Ok(Json(ApiResponse::ok(require_post(&state, id).await?)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedPost>>, BackendError> {
    let post = require_post(&state, id).await?;
    if !post.is_owned_by(auth.id()) {
        return Err(BackendError::forbidden("You can only delete your own posts"));
    }

    db::delete_post(&state.db, id).await?;
    tracing::info!("Post {} deleted", id);

    Ok(Json(ApiResponse::ok(DeletedPost { id })))
}
