//! Transient Notices
//!
//! Failed data-access calls push a short-lived toast; the view layer reads
//! the active set and expired entries drop out on their own.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long a toast stays visible
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Shared toast queue; clones push into the same list
#[derive(Debug, Clone)]
pub struct Toasts {
    entries: Arc<Mutex<Vec<Toast>>>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TOAST_TTL)
    }
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Error, Instant::now());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Info, Instant::now());
    }

    fn push(&self, message: String, level: ToastLevel, now: Instant) {
        let toast = Toast {
            message,
            level,
            expires_at: now + self.ttl,
        };
        // A poisoned lock only means another thread panicked mid-push
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(toast);
    }

    /// Toasts still visible at `now`; expired ones are discarded
    pub fn active_at(&self, now: Instant) -> Vec<Toast> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|toast| toast.expires_at > now);
        entries.clone()
    }

    pub fn active(&self) -> Vec<Toast> {
        self.active_at(Instant::now())
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
