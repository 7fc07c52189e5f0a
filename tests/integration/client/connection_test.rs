//! RealtimeConnection retry behaviour

use devconnect::client::{ConnectionState, RealtimeConnection, RetryPolicy};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_gives_up_after_bounded_retries() {
    let policy = RetryPolicy {
        max_attempts: 2,
        backoff: Duration::from_millis(10),
    };
    let (connection, _events) =
        RealtimeConnection::connect("http://127.0.0.1:9", "token", Uuid::new_v4(), policy);

    let mut status = connection.watch_status();
    let final_status = tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| s.gave_up))
        .await
        .expect("connection never gave up")
        .map(|s| *s)
        .expect("connection task ended");

    assert_eq!(final_status.state, ConnectionState::Disconnected);
    assert_eq!(final_status.attempts, 3);

    // Nothing is retried once exhausted
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(connection.status().gave_up);
    connection.disconnect().await;
}
