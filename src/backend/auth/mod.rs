//! Authentication Module
//!
//! This module handles user accounts, the follow graph, and session tokens.
//!
//! # Architecture
//!
//! - **`users`** - User rows, follow edges, and profile hydration
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for `/api/user/...`
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Tokens expire after `token_ttl_days` (7 by default)
//! - Invalid credentials return 401 with a single generic message

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for user endpoints
pub mod handlers;

pub use handlers::{
    follow_user, get_profile, get_profile_by_id, list_developers, login, register, unfollow_user,
    update_profile,
};
