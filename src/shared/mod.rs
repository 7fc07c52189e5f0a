//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client layer and the backend. These types are used for serialization
//! over the REST API and the real-time WebSocket channel.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP.

/// Domain records (users, posts, notifications, chats)
pub mod models;

/// Real-time event system
pub mod event;

/// Uniform REST response envelope
pub mod api;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use api::{ApiResponse, ApiResult, ErrorInfo};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{ClientEvent, ServerEvent};
