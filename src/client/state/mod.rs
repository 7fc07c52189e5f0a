//! Client View State
//!
//! Plain data structures updated from REST responses and live events.
//! Every mutator returns `true` only when something visible changed.
//!
//! # Module Structure
//!
//! ```text
//! state/
//! ├── mod.rs             - Module exports and documentation
//! ├── reconcile.rs       - Equality check, message identity and dedup
//! ├── typing.rs          - Outgoing debounce, incoming indicators
//! ├── chat.rs            - Conversation list and open conversation
//! └── notifications.rs   - Notification list
//! ```

pub mod chat;
pub mod notifications;
pub mod reconcile;
pub mod typing;

pub use chat::ChatState;
pub use notifications::NotificationState;
pub use reconcile::{replace_if_changed, LocalMessage, MessageKey, MessageList};
pub use typing::{TypingDebouncer, TypingIndicators};
