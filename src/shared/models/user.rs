//! User profile types
//!
//! `UserProfile` is the full record returned to its owner and to other
//! authenticated users (never the credential hash). `PublicUser` is the
//! slimmed-down view embedded in posts, comments, notifications and chats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Developer category used to filter the developer directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeveloperCategory {
    Frontend,
    Backend,
    Fullstack,
    Mobile,
    Devops,
    Data,
    Ml,
    Security,
    Game,
    #[default]
    Other,
}

impl DeveloperCategory {
    pub const ALL: [DeveloperCategory; 10] = [
        Self::Frontend,
        Self::Backend,
        Self::Fullstack,
        Self::Mobile,
        Self::Devops,
        Self::Data,
        Self::Ml,
        Self::Security,
        Self::Game,
        Self::Other,
    ];

    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Fullstack => "fullstack",
            Self::Mobile => "mobile",
            Self::Devops => "devops",
            Self::Data => "data",
            Self::Ml => "ml",
            Self::Security => "security",
            Self::Game => "game",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DeveloperCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeveloperCategory {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SharedError::validation("category", format!("Unknown category '{}'", s)))
    }
}

/// Public profile fields embedded in other records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub headline: String,
    pub profile_image: Option<String>,
}

/// Full user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub headline: String,
    pub location: String,
    pub email: String,
    pub skills: Vec<String>,
    pub category: DeveloperCategory,
    pub profile_image: Option<String>,
    pub experience: String,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            full_name: self.full_name.clone(),
            headline: self.headline.clone(),
            profile_image: self.profile_image.clone(),
        }
    }

    pub fn is_following(&self, user_id: Uuid) -> bool {
        self.following.contains(&user_id)
    }
}

/// Basic email shape check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
            .unwrap_or(false)
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<DeveloperCategory>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.full_name.trim().is_empty() {
            return Err(SharedError::validation("full_name", "Full name is required"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(SharedError::validation("email", "Invalid email format"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SharedError::validation(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.email.trim().is_empty() {
            return Err(SharedError::validation("email", "Email is required"));
        }
        if self.password.is_empty() {
            return Err(SharedError::validation("password", "Password is required"));
        }
        Ok(())
    }
}

/// Returned by register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token
    pub token: String,
    pub user: UserProfile,
}

/// Partial profile edit; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<DeveloperCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err(SharedError::validation("full_name", "Full name cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Query string for the developer directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevelopersQuery {
    #[serde(default)]
    pub category: Option<DeveloperCategory>,
}

/// Result of a follow/unfollow call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowResponse {
    pub user_id: Uuid,
    pub following: bool,
}
