//! Envelope assertions
//!
//! Every endpoint answers with `{"success", "data" | "message"}`; these
//! helpers unwrap that envelope with readable failure output.

#[cfg(feature = "ssr")]
use axum_test::TestResponse;
#[cfg(feature = "ssr")]
use devconnect::shared::ApiResponse;
#[cfg(feature = "ssr")]
use serde::de::DeserializeOwned;

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert a successful envelope and return its data
#[cfg(feature = "ssr")]
#[track_caller]
pub fn data<T: DeserializeOwned>(response: TestResponse) -> T {
    let status = response.status_code();
    let envelope: ApiResponse<T> = response.json();
    assert!(
        envelope.success,
        "Expected success, got {}: {:?}",
        status,
        envelope.message
    );
    envelope.data.expect("Successful envelope without data")
}

/// Assert a failed envelope with `status` and return its message
#[cfg(feature = "ssr")]
#[track_caller]
pub fn failure(response: TestResponse, status: u16) -> String {
    assert_eq!(response.status_code().as_u16(), status);
    let envelope: ApiResponse<serde_json::Value> = response.json();
    assert!(!envelope.success, "Expected failure envelope");
    envelope.message.expect("Failure envelope without message")
}
