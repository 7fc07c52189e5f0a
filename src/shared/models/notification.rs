//! Notification types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::PublicUser;
use crate::shared::error::SharedError;

/// What triggered a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Follow,
    Like,
    Comment,
    ProjectLike,
    Message,
    Share,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::ProjectLike => "project_like",
            Self::Message => "message",
            Self::Share => "share",
        }
    }

    /// Human-readable message shown to the recipient
    pub fn describe(&self, sender_name: &str) -> String {
        match self {
            Self::Follow => format!("{} started following you", sender_name),
            Self::Like => format!("{} liked your post", sender_name),
            Self::Comment => format!("{} commented on your post", sender_name),
            Self::ProjectLike => format!("{} liked your project", sender_name),
            Self::Message => format!("{} sent you a message", sender_name),
            Self::Share => format!("{} shared your post", sender_name),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(Self::Follow),
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            "project_like" => Ok(Self::ProjectLike),
            "message" => Ok(Self::Message),
            "share" => Ok(Self::Share),
            other => Err(SharedError::validation(
                "type",
                format!("Unknown notification type '{}'", other),
            )),
        }
    }
}

/// One-way event record addressed to `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient
    pub user_id: Uuid,
    pub sender: PublicUser,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub post_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returned by mark-all-read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
