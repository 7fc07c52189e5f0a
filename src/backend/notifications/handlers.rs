//! Notification HTTP Handlers
//!
//! - `GET /api/notifications` - caller's notifications, newest first
//! - `PATCH /api/notifications/mark-read/{id}` - mark one read (idempotent)
//! - `PATCH /api/notifications/mark-all-read` - mark all read and publish

use axum::extract::State;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::notifications::{db, service};
use crate::backend::server::state::AppState;
use crate::shared::models::{MarkAllReadResponse, Notification};
use crate::shared::ApiResponse;

pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Notification>>>, BackendError> {
    let notifications = db::list_for_user(&state.db, auth.id()).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

/// Mark one of the caller's notifications read
///
/// Notifications owned by someone else are reported as missing.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, BackendError> {
    db::get_owned(&state.db, id, auth.id())
        .await?
        .ok_or_else(|| BackendError::not_found("Notification not found"))?;

    db::mark_read(&state.db, id, auth.id(), Utc::now()).await?;

    let notification = db::get_owned(&state.db, id, auth.id())
        .await?
        .ok_or_else(|| BackendError::not_found("Notification not found"))?;
    Ok(Json(ApiResponse::ok(notification)))
}

pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>, BackendError> {
    let updated = service::mark_all_read(&state.db, &state.hub, auth.id()).await?;
    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}
