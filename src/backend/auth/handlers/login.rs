/**
 * Login Handler
 *
 * This module implements the user authentication handler for
 * POST /api/user/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and profile
 *
 * # Security
 *
 * - Unknown email and wrong password produce the same 401 message
 * - Password hashes are never returned in responses
 */

use axum::extract::State;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, profile_from_user};
use crate::backend::error::BackendError;
use crate::backend::middleware::Json;
use crate::backend::server::state::AppState;
use crate::shared::models::{AuthResponse, LoginRequest};
use crate::shared::ApiResponse;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing email or password
/// * `401 Unauthorized` - Unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, BackendError> {
    request.validate()?;
    let email = request.email.trim().to_lowercase();
    tracing::info!("Login request for: {}", email);

    let user = get_user_by_email(&state.db, &email).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", email);
        BackendError::auth(INVALID_CREDENTIALS)
    })?;

    let valid = bcrypt::verify(&request.password, &user.password_hash)
        .map_err(|e| BackendError::internal(format!("Password verification error: {}", e)))?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::auth(INVALID_CREDENTIALS));
    }

    let token = create_token(&state.config.jwt_secret, state.config.token_ttl_days, user.id, &user.email)
        .map_err(|e| BackendError::internal(format!("Failed to create token: {}", e)))?;

    tracing::info!("User logged in successfully: {} ({})", user.full_name, user.email);

    let profile = profile_from_user(&state.db, user).await?;
    Ok(Json(ApiResponse::ok(AuthResponse { token, user: profile })))
}
