//! Real-time Update Module
//!
//! Room-based publish/subscribe over WebSockets for notifications, chat
//! messages, typing indicators and read receipts.
//!
//! # Architecture
//!
//! - **`hub`** - per-process registry of sockets and their rooms
//! - **`socket`** - WebSocket endpoint and client event dispatch
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs      - Module exports and documentation
//! ├── hub.rs      - EventHub, Room, SocketId
//! └── socket.rs   - GET /api/socket handler
//! ```
//!
//! # Event Flow
//!
//! 1. A domain service mutates the store
//! 2. It publishes a `ServerEvent` to a user room or chat room
//! 3. Each socket in the room gets a copy on its own queue
//! 4. The socket's writer task serializes it as a JSON frame
//!
//! Events published while a client is disconnected are lost; clients
//! catch up through the REST endpoints.

/// Socket and room registry
pub mod hub;

/// WebSocket endpoint
pub mod socket;

pub use hub::{EventHub, Room, SocketId};
pub use socket::socket_handler;
