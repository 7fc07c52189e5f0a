//! Property-based tests for wire events and pair keys

use devconnect::shared::models::pair_key;
use devconnect::shared::{ClientEvent, ServerEvent};
use proptest::prelude::*;
use uuid::Uuid;

fn uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #[test]
    fn test_pair_key_ignores_order(a in uuid(), b in uuid()) {
        prop_assert_eq!(pair_key(a, b), pair_key(b, a));
    }

    #[test]
    fn test_distinct_pairs_have_distinct_keys(a in uuid(), b in uuid(), c in uuid()) {
        prop_assume!(c != a && c != b);
        prop_assert_ne!(pair_key(a, b), pair_key(a, c));
    }

    #[test]
    fn test_typing_frame_names_the_event(chat_id in uuid(), is_typing in any::<bool>()) {
        let event = ClientEvent::Typing { chat_id, is_typing };
        let frame: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        prop_assert_eq!(frame["event"].as_str(), Some("typing"));
        prop_assert_eq!(frame["data"]["is_typing"].as_bool(), Some(is_typing));
    }

    #[test]
    fn test_connect_error_message_survives_the_wire(message in ".*") {
        let event = ServerEvent::ConnectError { message: message.clone() };
        let decoded = ServerEvent::from_json(&event.to_json().unwrap()).unwrap();
        prop_assert_eq!(decoded, ServerEvent::ConnectError { message });
    }
}
