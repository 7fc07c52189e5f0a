/**
 * Server Initialization
 *
 * Builds the Axum application from a resolved `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and run migrations
 * 2. Create the shared `AppState` (pool, event hub, config)
 * 3. Create and configure the router
 *
 * Unlike optional add-on services, a database failure is fatal: the
 * error is returned to `main` and the process exits.
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing DevConnect backend server");

    let pool = load_database(&config.database_url).await?;
    let app_state = AppState::new(pool, config);

    tracing::info!("Router configured");
    Ok(build_app(app_state))
}

/// Build the router around an existing state
///
/// Tests use this to keep a handle on the pool and hub behind the app.
pub fn build_app(app_state: AppState) -> Router<()> {
    create_router(app_state)
}
