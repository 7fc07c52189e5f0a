/**
 * Router Configuration
 *
 * Combines the API route table with the liveness probe and the
 * cross-cutting layers.
 *
 * # Layers
 *
 * - `TraceLayer` - one span per request, logged through `tracing`
 * - `CorsLayer` - the browser client is served from another origin
 *
 * Unknown paths fall through to a JSON 404 in the same envelope as every
 * other failure.
 */

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", configure_api_routes(&app_state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> BackendError {
    BackendError::not_found("Route not found")
}
