/**
 * Register Handler
 *
 * This module implements the user registration handler for
 * POST /api/user/register.
 *
 * # Registration Process
 *
 * 1. Validate name, email format and password length
 * 2. Hash password using bcrypt (work factor from `ServerConfig`)
 * 3. Create user in database (duplicate email is a 409)
 * 4. Generate JWT token
 * 5. Return token and profile
 */

use axum::extract::State;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, profile_from_user, NewUser};
use crate::backend::error::BackendError;
use crate::backend::middleware::Json;
use crate::backend::server::state::AppState;
use crate::shared::models::{AuthResponse, RegisterRequest};
use crate::shared::ApiResponse;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid name, email or password
/// * `409 Conflict` - Email already registered
/// * `500 Internal Server Error` - Hashing, token or database failure
///
/// # Example Request
///
/// ```http
/// POST /api/user/register HTTP/1.1
/// Content-Type: application/json
///
/// {"full_name": "Ada Lovelace", "email": "ada@example.com", "password": "analytical"}
/// ```
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, BackendError> {
    request.validate()?;
    let email = request.email.trim().to_lowercase();
    tracing::info!("Registration request for: {}", email);

    let password_hash = bcrypt::hash(&request.password, state.config.bcrypt_cost).map_err(|e| {
        BackendError::internal(format!("Password hashing failed: {}", e))
    })?;

    let user = create_user(
        &state.db,
        NewUser {
            full_name: request.full_name.trim().to_string(),
            email,
            password_hash,
            headline: request.headline.unwrap_or_default(),
            location: request.location.unwrap_or_default(),
            skills: request.skills.unwrap_or_default(),
            category: request.category.unwrap_or_default(),
        },
    )
    .await?;

    let token = create_token(&state.config.jwt_secret, state.config.token_ttl_days, user.id, &user.email)
        .map_err(|e| BackendError::internal(format!("Failed to create token: {}", e)))?;

    tracing::info!("User registered: {} ({})", user.full_name, user.id);

    let profile = profile_from_user(&state.db, user).await?;
    Ok(Json(ApiResponse::ok(AuthResponse { token, user: profile })))
}
