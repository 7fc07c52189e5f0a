//! DevConnect - Main Library
//!
//! DevConnect is a social network for developers: profiles, a follow graph,
//! a post feed with likes, comments and shares, real-time notifications and
//! one-to-one chat.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and backend
//!   - Domain records, socket events, the REST envelope
//!   - Shared error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP API over SQLite
//!   - JWT authentication middleware
//!   - Real-time event hub and WebSocket endpoint
//!
//! - **`client`** - Client data-access and real-time layers
//!   - `ApiClient` for the REST API with transient error toasts
//!   - `RealtimeConnection` with bounded reconnect
//!   - View state reconciled from REST fetches and live events
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the `backend` module and the
//!   `devconnect-server` binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use devconnect::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::load()?).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client-Side
//!
//! ```rust,no_run
//! use devconnect::client::{ClientConfig, ClientSession};
//!
//! # async fn example() {
//! let mut session = ClientSession::new(ClientConfig::from_env());
//! if session.login("ada@example.com", "hunter22").await.is_ok() {
//!     while let Some(event) = session.next_event().await {
//!         session.handle_event(event).await;
//!     }
//! }
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Client data-access, real-time and state layers
pub mod client;
