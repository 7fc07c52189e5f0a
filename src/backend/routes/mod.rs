//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Top-level router, health check, layers
//! └── api_routes.rs   - `/api/...` route table and auth layering
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use devconnect::backend::routes::create_router;
//! use devconnect::backend::server::{config::load_database, AppState, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::default();
//! let pool = load_database(&config.database_url).await?;
//! let router = create_router(AppState::new(pool, config));
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint table
pub mod api_routes;

pub use router::create_router;
