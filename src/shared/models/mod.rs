//! Domain Models
//!
//! Records exchanged over the REST API and the real-time channel:
//!
//! - `UserProfile` / `PublicUser` - developer profiles
//! - `Post` / `Comment` - feed content
//! - `Notification` - one-way event records
//! - `Chat` / `ChatMessage` / `ChatSummary` - direct messaging

pub mod chat;
pub mod notification;
pub mod post;
pub mod user;

pub use chat::{pair_key, Chat, ChatMessage, ChatReadResponse, ChatSummary, SendMessageRequest};
pub use notification::{MarkAllReadResponse, Notification, NotificationType};
pub use post::{share_text, Comment, CommentRequest, CreatePostRequest, DeletedPost, Post, UpdatePostRequest};
pub use user::{
    AuthResponse, DeveloperCategory, DevelopersQuery, FollowResponse, LoginRequest, PublicUser,
    RegisterRequest, UpdateProfileRequest, UserProfile,
};
