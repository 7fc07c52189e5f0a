//! Authentication and Profile Handlers Module
//!
//! This module contains the HTTP handlers for the `/api/user` routes.
//! Handlers are organized into focused submodules for maintainability.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── register.rs  - Account creation
//! ├── login.rs     - Credential check and token issuance
//! ├── profile.rs   - Own/other profile, profile edit, developer directory
//! └── follow.rs    - Follow graph mutation
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: name, email and password -> user created -> JWT returned
//! 2. **Login**: email and password -> credentials verified -> JWT returned
//! 3. Every other route requires `Authorization: Bearer <token>`

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Profile and directory handlers
pub mod profile;

/// Follow/unfollow handlers
pub mod follow;

pub use follow::{follow_user, unfollow_user};
pub use login::login;
pub use profile::{get_profile, get_profile_by_id, list_developers, update_profile};
pub use register::register;
