//! Post and comment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::PublicUser;
use crate::shared::error::SharedError;

/// Maximum length of a post body in characters
pub const MAX_POST_LEN: usize = 5000;

/// Comment embedded in a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: PublicUser,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Authored post
///
/// `likes` keeps the order in which users liked the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: PublicUser,
    pub text: String,
    pub image: Option<String>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    /// Original post when this post is a shared copy
    pub shared_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user.id == user_id
    }
}

/// Text of a shared copy, attributed to the original author
pub fn share_text(original_author: &str, original_text: &str) -> String {
    format!("Shared from {}: {}", original_author, original_text)
}

fn validate_text(field: &str, text: &str, max: usize) -> Result<(), SharedError> {
    if text.trim().is_empty() {
        return Err(SharedError::validation(field, "Text is required"));
    }
    if text.chars().count() > max {
        return Err(SharedError::validation(
            field,
            format!("Text must be at most {} characters", max),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_text("text", &self.text, MAX_POST_LEN)
    }
}

/// Edit of an existing post; `image: None` keeps the current image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_text("text", &self.text, MAX_POST_LEN)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_text("text", &self.text, MAX_POST_LEN)
    }
}

/// Returned by post deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedPost {
    pub id: Uuid,
}
