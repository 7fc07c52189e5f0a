/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * The signing secret and token lifetime come from `ServerConfig`, so the
 * same functions serve the HTTP middleware and the WebSocket handshake.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `secret` - HMAC signing secret
/// * `ttl_days` - Token lifetime in days
/// * `user_id` - User ID (UUID)
/// * `email` - User email
pub fn create_token(
    secret: &str,
    ttl_days: i64,
    user_id: Uuid,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::days(ttl_days);

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: exp.timestamp().max(0) as u64,
        iat: now.timestamp().max(0) as u64,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// Rejects tampered signatures and expired tokens.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Extract the user ID from a token
pub fn get_user_id_from_token(secret: &str, token: &str) -> Result<Uuid, String> {
    let claims = verify_token(secret, token)
        .map_err(|e| format!("Token verification failed: {}", e))?;
    claims
        .user_id()
        .map_err(|e| format!("Invalid user ID in token: {}", e))
}
