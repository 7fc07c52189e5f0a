//! Authentication test helpers
//!
//! Provides an `axum-test` server over a fresh app and helpers that create
//! accounts through the public registration endpoint.

use axum_test::TestServer;
use devconnect::backend::server::{build_app, AppState};
use devconnect::shared::models::{AuthResponse, UserProfile};
use uuid::Uuid;

use super::assertions::data;
use super::database::test_state;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// App under test plus direct access to its pool and hub
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub async fn spawn_test_app() -> TestApp {
    let state = test_state().await;
    let server = TestServer::new(build_app(state.clone())).expect("Failed to start test server");
    TestApp { server, state }
}

/// Registered account with its bearer token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub profile: UserProfile,
}

/// Register `name` with a unique email
pub async fn register_user(server: &TestServer, name: &str) -> TestUser {
    let email = format!(
        "{}.{}@example.com",
        name.to_lowercase().replace(' ', "."),
        &Uuid::new_v4().simple().to_string()[..8]
    );
    let response = server
        .post("/api/user/register")
        .json(&serde_json::json!({
            "full_name": name,
            "email": email,
            "password": TEST_PASSWORD,
            "headline": format!("{} the developer", name),
            "category": "backend",
        }))
        .await;
    let auth: AuthResponse = data(response);

    TestUser {
        id: auth.user.id,
        email,
        token: auth.token,
        profile: auth.user,
    }
}

/// `follower` follows `followee`
pub async fn follow(server: &TestServer, follower: &TestUser, followee: &TestUser) {
    server
        .post(&format!("/api/user/follow/{}", followee.id))
        .authorization_bearer(&follower.token)
        .await
        .assert_status_ok();
}
