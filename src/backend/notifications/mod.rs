//! Notifications Module
//!
//! One-way event records addressed to a single user. They are created only
//! as side effects of other domain actions (`service::notify`) and mutated
//! only by read transitions.

pub mod db;
pub mod handlers;
pub mod service;

pub use handlers::{list_notifications, mark_all_notifications_read, mark_notification_read};
pub use service::notify;
