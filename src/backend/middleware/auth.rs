/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the caller identity to handlers.
 *
 * The same verification (`authenticate_token`) is used by the WebSocket
 * handshake, which carries the token in its query string instead.
 */

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::user_exists;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Verify a raw token and confirm its user still exists
pub async fn authenticate_token(state: &AppState, token: &str) -> BackendResult<AuthenticatedUser> {
    let claims = verify_token(&state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::auth("Invalid or expired token")
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        BackendError::auth("Invalid or expired token")
    })?;

    if !user_exists(&state.db, user_id).await? {
        tracing::warn!("Token for unknown user {}", user_id);
        return Err(BackendError::auth("User no longer exists"));
    }

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

/// Pull the token out of a `Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the JWT from the Authorization header
/// 2. Verifies the token and that its user exists
/// 3. Attaches `AuthenticatedUser` to the request extensions
///
/// Missing or invalid tokens are rejected with 401.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::auth("Missing authorization token")
        })?;

    let token = bearer_token(header).ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::auth("Malformed authorization header")
    })?;

    let user = authenticate_token(&app_state, token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// Reads the identity that `auth_middleware` attached to the request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.user_id
    }
}

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::auth("Authentication required")
            })?;

        Ok(AuthUser(user))
    }
}
