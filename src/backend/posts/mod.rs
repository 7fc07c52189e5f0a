//! Posts Module
//!
//! Posts, likes, comments and shares. Engagement by anyone other than the
//! post owner produces exactly one notification for the owner.

pub mod db;
pub mod handlers;

pub use handlers::{
    comment_post, create_post, delete_post, get_feed, get_user_posts, like_post, share_post,
    update_post,
};
