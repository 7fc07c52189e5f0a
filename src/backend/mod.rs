//! Backend Module
//!
//! This module contains all server-side code for DevConnect: an Axum HTTP
//! API over SQLite plus a WebSocket channel for live notifications and
//! chat.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Accounts, follow graph, JWT tokens, `/api/user` handlers
//! - **`posts`** - Posts, likes, comments, shares
//! - **`notifications`** - Notification records and read transitions
//! - **`chat`** - One-to-one conversations and messages
//! - **`realtime`** - Event hub and WebSocket endpoint
//! - **`middleware`** - Bearer-token authentication
//! - **`error`** - Backend error type and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs            - Module exports and documentation
//! ├── main.rs           - devconnect-server binary
//! ├── server/           - Server initialization and state
//! ├── routes/           - Route configuration
//! ├── auth/             - Users and authentication
//! ├── posts/            - Feed and engagement
//! ├── notifications/    - Notification lifecycle
//! ├── chat/             - Direct messaging
//! ├── realtime/         - Rooms and sockets
//! ├── middleware/       - Request middleware
//! └── error/            - Error types
//! ```
//!
//! # Request Flow
//!
//! HTTP request → `auth_middleware` → handler → domain service → SQLite
//! → optional `EventHub::publish` → socket writer task → client.
//!
//! # Thread Safety
//!
//! - `SqlitePool` and `EventHub` are cheap to clone and shared by all handlers
//! - The hub guards its registry with a `tokio::sync::RwLock`
//! - Each socket owns an unbounded mpsc queue, so publishing never blocks

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Posts and engagement
pub mod posts;

/// Notification records
pub mod notifications;

/// Direct messaging
pub mod chat;

/// Real-time update system
pub mod realtime;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use realtime::EventHub;
pub use server::{build_app, create_app, AppState, ServerConfig};
