//! Client layer tests
//!
//! `api_test` runs against `wiremock`; `session_test` drives full sessions
//! against a live server.

mod api_test;
mod connection_test;
#[cfg(feature = "ssr")]
mod session_test;
