//! ApiClient against a mocked server

use devconnect::client::{ApiClient, ClientConfig, ToastLevel, Toasts};
use devconnect::shared::models::{DeveloperCategory, MarkAllReadResponse, UserProfile};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer};

use crate::assert_ok;
use crate::common::{envelope_error, envelope_ok};

fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
    let mut config = ClientConfig::with_server_url(server.uri()).expect("valid url");
    config.set_token(token.map(str::to_string));
    ApiClient::new(config, Toasts::new())
}

#[tokio::test]
async fn test_success_envelope_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/notifications/mark-all-read"))
        .respond_with(envelope_ok(MarkAllReadResponse { updated: 3 }))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("token"));
    let response = assert_ok!(api.mark_all_notifications_read().await);
    assert_eq!(response.updated, 3);
    assert!(api.toasts().active().is_empty());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(envelope_ok(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("secret-token"));
    let chats = assert_ok!(api.chats().await);
    assert!(chats.is_empty());
}

#[tokio::test]
async fn test_category_filter_becomes_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/developers"))
        .and(query_param("category", "backend"))
        .respond_with(envelope_ok(Vec::<UserProfile>::new()))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("token"));
    assert_ok!(api.list_developers(Some(DeveloperCategory::Backend)).await);
}

#[tokio::test]
async fn test_error_envelope_is_returned_and_toasted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(envelope_error(401, "Invalid credentials"))
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let error = api.login("ada@example.com", "wrong-password").await.unwrap_err();

    assert_eq!(error.status, Some(401));
    assert_eq!(error.message, "Invalid credentials");
    assert!(error.is_unauthorized());

    let toasts = api.toasts().active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Invalid credentials");
    assert_eq!(toasts[0].level, ToastLevel::Error);
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    // Nothing listens on the discard port
    let config = ClientConfig::with_server_url("http://127.0.0.1:9").expect("valid url");
    let api = ApiClient::new(config, Toasts::new());

    let error = api.notifications().await.unwrap_err();
    assert_eq!(error.status, None);
    assert!(error.message.starts_with("Network error"));
    assert_eq!(api.toasts().active().len(), 1);
}
