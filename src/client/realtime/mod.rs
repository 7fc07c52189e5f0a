//! Client Real-time Layer
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── connection.rs   - RealtimeConnection task and handle
//! └── retry.rs        - Bounded reconnect policy
//! ```

pub mod connection;
pub mod retry;

pub use connection::{ConnectionState, ConnectionStatus, RealtimeConnection};
pub use retry::RetryPolicy;
