/**
 * Profile Handlers
 *
 * - `GET /api/user/profile` - the caller's own profile
 * - `PUT /api/user/profile` - partial edit of the caller's profile
 * - `GET /api/user/profile/{id}` - another user's profile
 * - `GET /api/user/developers?category=` - directory of other developers
 *
 * Profiles always carry follower/following lists derived from the follow
 * graph at read time.
 */

use axum::extract::State;
use uuid::Uuid;

use crate::backend::auth::users::{list_users, load_profile, profile_from_user, update_user};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path, Query};
use crate::backend::server::state::AppState;
use crate::shared::models::{DevelopersQuery, UpdateProfileRequest, UserProfile};
use crate::shared::ApiResponse;

/// Get current user handler
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, BackendError> {
    let profile = load_profile(&state.db, auth.id()).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// Edit the caller's profile
///
/// Only fields present in the body change. An empty `profile_image`
/// clears the stored image reference.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, BackendError> {
    request.validate()?;
    let user = update_user(&state.db, auth.id(), &request).await?;
    tracing::info!("Profile updated for {}", auth.id());

    let profile = profile_from_user(&state.db, user).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn get_profile_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfile>>, BackendError> {
    let profile = load_profile(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// List developers other than the caller, optionally by category
pub async fn list_developers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DevelopersQuery>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, BackendError> {
    let users = list_users(&state.db, query.category, Some(auth.id())).await?;

    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        profiles.push(profile_from_user(&state.db, user).await?);
    }
    Ok(Json(ApiResponse::ok(profiles)))
}
