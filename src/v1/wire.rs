//! Bot API 1.0 request parsing.

use serde::Deserialize;

use super::ButtonId;
use crate::event::{ChatId, InboundEvent, InboundMessage, ProtocolError, event_name, kind};

#[derive(Debug, Deserialize)]
struct RawUpdate {
    event: Option<String>,
    chat: Option<RawChat>,
    kind: Option<String>,
    response: Option<RawResponse>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: Option<ChatId>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    button: Option<RawButton>,
}

#[derive(Debug, Deserialize)]
struct RawButton {
    id: Option<ButtonId>,
}

/// Converts a decoded API 1.0 update into an [`InboundEvent`].
///
/// # Errors
///
/// Returns [`ProtocolError`] if fields have the wrong type or a field
/// required by the event is missing.
pub fn parse_update(update: serde_json::Value) -> Result<InboundEvent<ButtonId>, ProtocolError> {
    let raw: RawUpdate = serde_json::from_value(update)?;
    let event = raw.event.ok_or(ProtocolError::MissingField("event"))?;
    let chat_id = raw.chat.and_then(|chat| chat.id);

    match event.as_str() {
        event_name::NEW_CHAT => Ok(InboundEvent::NewChat {
            chat_id: chat_id.ok_or(ProtocolError::MissingField("chat.id"))?,
        }),
        event_name::NEW_MESSAGE => {
            let chat_id = chat_id.ok_or(ProtocolError::MissingField("chat.id"))?;
            let message_kind = raw.kind.ok_or(ProtocolError::MissingField("kind"))?;
            let message = match message_kind.as_str() {
                kind::KEYBOARD_RESPONSE => InboundMessage::KeyboardResponse {
                    button_id: raw
                        .response
                        .and_then(|response| response.button)
                        .and_then(|button| button.id)
                        .ok_or(ProtocolError::MissingField("response.button.id"))?,
                },
                kind::VISITOR => InboundMessage::Visitor { text: raw.text },
                kind::FILE_VISITOR => InboundMessage::FileVisitor { file: None },
                _ => InboundMessage::Unknown { kind: message_kind },
            };
            Ok(InboundEvent::NewMessage { chat_id, message })
        }
        _ => Ok(InboundEvent::Other { event, chat_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_chat_ignores_extra_fields() {
        let event = parse_update(json!({
            "event": "new_chat",
            "chat": {"id": "c1"},
            "visitor": {"id": "v1"},
            "messages": [{"kind": "visitor", "text": "Hello"}],
        }))
        .unwrap();

        assert_eq!(event, InboundEvent::NewChat { chat_id: "c1".into() });
    }

    #[test]
    fn keyboard_response_with_unknown_button() {
        let event = parse_update(json!({
            "event": "new_message",
            "chat": {"id": "c1"},
            "kind": "keyboard_response",
            "response": {"button": {"id": "unknown", "text": "Unknown button"}},
        }))
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::NewMessage {
                chat_id: "c1".into(),
                message: InboundMessage::KeyboardResponse {
                    button_id: ButtonId::Unrecognized("unknown".to_string()),
                },
            }
        );
    }

    #[test]
    fn unknown_event_needs_no_chat() {
        let event = parse_update(json!({"event": "unknown"})).unwrap();

        assert_eq!(
            event,
            InboundEvent::Other {
                event: "unknown".to_string(),
                chat_id: None,
            }
        );
    }

    #[test]
    fn missing_event_is_rejected() {
        let err = parse_update(json!({"chat": {"id": "c1"}})).unwrap_err();

        assert!(matches!(err, ProtocolError::MissingField("event")));
    }

    #[test]
    fn new_message_without_chat_is_rejected() {
        let err = parse_update(json!({"event": "new_message", "kind": "visitor"})).unwrap_err();

        assert!(matches!(err, ProtocolError::MissingField("chat.id")));
    }

    #[test]
    fn keyboard_response_without_button_is_rejected() {
        let err = parse_update(json!({
            "event": "new_message",
            "chat": {"id": "c1"},
            "kind": "keyboard_response",
        }))
        .unwrap_err();

        assert!(matches!(err, ProtocolError::MissingField("response.button.id")));
    }

    #[test]
    fn wrong_field_type_is_invalid_json() {
        let err = parse_update(json!({"event": 5})).unwrap_err();

        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }
}
