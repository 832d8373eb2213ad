//! Property-based tests for the gateway wire envelopes

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use huddle::shared::messages::{ChatMessage, NotificationPayload};
use huddle::shared::{ClientEvent, ServerEvent};

fn timestamp(seconds: i64, nanos: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, nanos).unwrap()
}

proptest! {
    #[test]
    fn test_client_event_round_trip(
        channel_id in 1i64..1_000_000,
        message_id in 1i64..1_000_000,
        content in ".{0,64}",
    ) {
        let events = vec![
            ClientEvent::Join { channel_id },
            ClientEvent::Leave { channel_id },
            ClientEvent::Message { channel_id, content: content.clone() },
            ClientEvent::UpdateMessage { channel_id, message_id, content },
            ClientEvent::DeleteMessage { channel_id, message_id },
        ];

        for event in events {
            let json = serde_json::to_string(&event).unwrap();
            let back: ClientEvent = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, event);
        }
    }

    #[test]
    fn test_client_event_keeps_camel_case_keys(
        channel_id in 1i64..1_000_000,
        content in ".{0,64}",
    ) {
        let json = serde_json::to_value(ClientEvent::Message { channel_id, content }).unwrap();

        prop_assert_eq!(json["type"].as_str(), Some("message"));
        prop_assert!(json.get("channelId").is_some());
        prop_assert!(json.get("channel_id").is_none());
    }

    #[test]
    fn test_server_message_events_round_trip(
        id in 1i64..1_000_000,
        channel_id in 1i64..1_000_000,
        author_name in "[a-z]{1,16}",
        content in prop::option::of(".{0,64}"),
        seconds in 0i64..4_000_000_000,
        nanos in 0u32..1_000_000_000,
    ) {
        let message = ChatMessage {
            id,
            channel_id,
            author_id: 1,
            author_name,
            author_avatar: None,
            content,
            image_urls: vec!["/uploads/a.png".to_string()],
            created_at: timestamp(seconds, nanos),
            updated_at: timestamp(seconds, nanos),
        };

        for event in [
            ServerEvent::Message(message.clone()),
            ServerEvent::MessageUpdated(message),
            ServerEvent::MessageDeleted { id },
        ] {
            let json = serde_json::to_string(&event).unwrap();
            let back: ServerEvent = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, event);
        }
    }

    #[test]
    fn test_notification_aliases_round_trip_distinctly(
        workspace_id in 1i64..1_000_000,
        workspace_name in "[a-z ]{1,24}",
        sender_name in "[a-z]{1,16}",
        token in "[a-f0-9]{32}",
        seconds in 0i64..4_000_000_000,
    ) {
        let payload = NotificationPayload {
            kind: "workspace_invitation".to_string(),
            workspace_id,
            workspace_name,
            sender_name,
            token,
            created_at: timestamp(seconds, 0),
        };

        for event in [
            ServerEvent::Notification(payload.clone()),
            ServerEvent::Invitation(payload.clone()),
            ServerEvent::GlobalInvitation(payload),
        ] {
            let json = serde_json::to_string(&event).unwrap();
            let back: ServerEvent = serde_json::from_str(&json).unwrap();
            // Aliases carry the same payload but must keep their own tag
            prop_assert_eq!(back, event);
        }
    }
}
