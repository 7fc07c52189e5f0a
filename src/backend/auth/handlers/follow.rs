/**
 * Follow Graph Handlers
 *
 * - `POST /api/user/follow/{id}` - add the edge caller -> id and notify id
 * - `POST /api/user/unfollow/{id}` - remove the edge caller -> id
 *
 * Self-follow, following twice, and unfollowing a user that is not followed
 * are all rejected as invalid operations.
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::{follow, require_user, unfollow};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::notifications::notify;
use crate::backend::server::state::AppState;
use crate::shared::models::{FollowResponse, NotificationType};
use crate::shared::ApiResponse;

pub async fn follow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target): Path<Uuid>,
) -> Result<Json<ApiResponse<FollowResponse>>, BackendError> {
    if target == auth.id() {
        return Err(BackendError::invalid_operation("You cannot follow yourself"));
    }
    require_user(&state.db, target).await?;
    let follower = require_user(&state.db, auth.id()).await?;

    if !follow(&state.db, auth.id(), target).await? {
        return Err(BackendError::invalid_operation("You are already following this user"));
    }
    tracing::info!("{} now follows {}", auth.id(), target);

    notify(&state.db, &state.hub, target, &follower.public(), NotificationType::Follow, None).await?;

    Ok(Json(ApiResponse::ok(FollowResponse {
        user_id: target,
        following: true,
    })))
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(target): Path<Uuid>,
) -> Result<Json<ApiResponse<FollowResponse>>, BackendError> {
    if target == auth.id() {
        return Err(BackendError::invalid_operation("You cannot unfollow yourself"));
    }
    require_user(&state.db, target).await?;

    if !unfollow(&state.db, auth.id(), target).await? {
        return Err(BackendError::invalid_operation("You are not following this user"));
    }
    tracing::info!("{} unfollowed {}", auth.id(), target);

    Ok(Json(ApiResponse::ok(FollowResponse {
        user_id: target,
        following: false,
    })))
}
