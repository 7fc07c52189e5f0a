//! Middleware Module
//!
//! This module contains all HTTP middleware for the backend server.
//! Middleware functions are used to process requests before they reach
//! handlers.
//!
//! # Architecture
//!
//! The middleware module currently provides:
//!
//! - **`auth`** - Bearer-token authentication for protected routes
//! - **`extract`** - `Json`, `Path` and `Query` that reject with the error envelope

pub mod auth;
pub mod extract;

pub use auth::{auth_middleware, authenticate_token, AuthUser, AuthenticatedUser};
pub use extract::{Json, Path, Query};
