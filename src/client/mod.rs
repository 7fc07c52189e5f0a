//! Client Module
//!
//! Everything a DevConnect front end needs below the UI: REST access,
//! the real-time connection and reconciled view state.
//!
//! # Architecture
//!
//! - **`config`** - server URL, token, socket URL derivation
//! - **`api`** - `ApiClient`; every call returns `ApiResult<T>`
//! - **`toast`** - transient error notices pushed by `ApiClient`
//! - **`realtime`** - `RealtimeConnection` with bounded reconnect
//! - **`state`** - view state and reconciliation rules
//! - **`session`** - `ClientSession`, the owner of all of the above
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs       - Module exports and documentation
//! ├── config.rs    - ClientConfig
//! ├── api.rs       - ApiClient
//! ├── toast.rs     - Toasts
//! ├── session.rs   - ClientSession
//! ├── realtime/    - WebSocket connection
//! └── state/       - View state
//! ```

pub mod api;
pub mod config;
pub mod realtime;
pub mod session;
pub mod state;
pub mod toast;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use realtime::{ConnectionState, ConnectionStatus, RealtimeConnection, RetryPolicy};
pub use session::ClientSession;
pub use toast::{Toast, ToastLevel, Toasts};
