/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool (the authoritative store)
 * - The real-time event hub (socket registry and rooms)
 * - The resolved server configuration
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and safe to share between handlers:
 * `SqlitePool` and `EventHub` are internally reference counted and the
 * configuration is immutable behind an `Arc`.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::backend::realtime::EventHub;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every request handler
///
/// # Usage
///
/// ```rust,no_run
/// use axum::extract::State;
/// use devconnect::backend::server::state::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let secret = &state.config.jwt_secret;
///     let _ = secret;
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool holding every entity
    pub db: SqlitePool,

    /// Per-process registry of connected sockets and their rooms
    pub hub: EventHub,

    /// Resolved configuration (JWT secret, token lifetime, bcrypt cost)
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        Self {
            db,
            hub: EventHub::new(),
            config: Arc::new(config),
        }
    }
}

/// Lets handlers extract the pool alone with `State(SqlitePool)`
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for EventHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
