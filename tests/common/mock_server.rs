//! Mock server helpers for client tests
//!
//! Builds `wiremock` responses in the API envelope format.

use serde::Serialize;
use wiremock::ResponseTemplate;

pub fn envelope_ok<T: Serialize>(data: T) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "data": data,
    }))
}

pub fn envelope_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "success": false,
        "message": message,
    }))
}
