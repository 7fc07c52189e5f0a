//! Chat Module
//!
//! Direct messaging between two users.
//!
//! # Architecture
//!
//! - **`db`** - chat and message persistence (unique pair key)
//! - **`service`** - domain operations shared by HTTP and WebSocket paths
//! - **`handlers`** - `/api/chats` HTTP handlers
//!
//! # Module Structure
//!
//! ```text
//! chat/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - SQLite queries
//! ├── service.rs   - initiate/list/send/mark-read
//! └── handlers.rs  - Axum handlers
//! ```

pub mod db;
pub mod handlers;
pub mod service;
