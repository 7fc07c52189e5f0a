//! Integration tests
//!
//! - `api` - HTTP endpoints through `axum-test`
//! - `realtime` - WebSocket delivery against a live server
//! - `client` - client layer against `wiremock` and a live server

mod client;
