//! Bot API 2.0 wire formats: inbound updates, vendor requests and the ack.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ButtonId;
use crate::event::{ChatId, InboundEvent, InboundMessage, ProtocolError, event_name, kind};
use crate::message::OutboundMessage;

#[derive(Debug, Deserialize)]
struct RawUpdate {
    event: Option<String>,
    chat: Option<RawChat>,
    chat_id: Option<ChatId>,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: Option<ChatId>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    kind: Option<String>,
    text: Option<String>,
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawButtonData {
    button: Option<RawButton>,
}

#[derive(Debug, Deserialize)]
struct RawButton {
    id: Option<ButtonId>,
}

/// Converts a decoded API 2.0 update into an [`InboundEvent`].
///
/// `new_chat` carries the chat in `chat.id`, `new_message` in `chat_id`;
/// either location is accepted for both events.
///
/// # Errors
///
/// Returns [`ProtocolError`] if fields have the wrong type or a field
/// required by the event is missing.
pub fn parse_update(update: serde_json::Value) -> Result<InboundEvent<ButtonId>, ProtocolError> {
    let raw: RawUpdate = serde_json::from_value(update)?;
    let event = raw.event.ok_or(ProtocolError::MissingField("event"))?;
    let nested_id = raw.chat.and_then(|chat| chat.id);

    match event.as_str() {
        event_name::NEW_CHAT => Ok(InboundEvent::NewChat {
            chat_id: nested_id
                .or(raw.chat_id)
                .ok_or(ProtocolError::MissingField("chat.id"))?,
        }),
        event_name::NEW_MESSAGE => {
            let chat_id = raw
                .chat_id
                .or(nested_id)
                .ok_or(ProtocolError::MissingField("chat_id"))?;
            let message = raw.message.ok_or(ProtocolError::MissingField("message"))?;
            Ok(InboundEvent::NewMessage {
                chat_id,
                message: parse_message(message)?,
            })
        }
        _ => Ok(InboundEvent::Other {
            event,
            chat_id: raw.chat_id.or(nested_id),
        }),
    }
}

fn parse_message(message: RawMessage) -> Result<InboundMessage<ButtonId>, ProtocolError> {
    let message_kind = message
        .kind
        .ok_or(ProtocolError::MissingField("message.kind"))?;

    Ok(match message_kind.as_str() {
        kind::KEYBOARD_RESPONSE => {
            let data: RawButtonData = serde_json::from_value(
                message
                    .data
                    .ok_or(ProtocolError::MissingField("message.data"))?,
            )?;
            InboundMessage::KeyboardResponse {
                button_id: data
                    .button
                    .and_then(|button| button.id)
                    .ok_or(ProtocolError::MissingField("message.data.button.id"))?,
            }
        }
        kind::FILE_VISITOR => InboundMessage::FileVisitor { file: message.data },
        kind::VISITOR => InboundMessage::Visitor { text: message.text },
        _ => InboundMessage::Unknown { kind: message_kind },
    })
}

/// Immediate reply to every accepted API 2.0 webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ack {
    result: &'static str,
}

impl Ack {
    /// The `{"result": "ok"}` acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { result: "ok" }
    }
}

/// Where a chat is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ForwardTarget {
    /// A specific agent.
    Agent {
        /// Agent id
        operator_id: u64,
    },
    /// A department queue.
    Department {
        /// Department key
        dep_key: String,
    },
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent { operator_id } => write!(f, "agent {operator_id}"),
            Self::Department { dep_key } => write!(f, "department {dep_key:?}"),
        }
    }
}

/// Body of `send_message`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    /// Target chat
    pub chat_id: &'a ChatId,
    /// Message envelope
    pub message: OutboundMessage<'a, ButtonId>,
}

/// Body of `close_chat`.
#[derive(Debug, Serialize)]
pub struct CloseChatRequest<'a> {
    /// Chat to close
    pub chat_id: &'a ChatId,
}

/// Body of `redirect_chat`.
#[derive(Debug, Serialize)]
pub struct RedirectChatRequest<'a> {
    /// Chat to redirect
    pub chat_id: &'a ChatId,
    /// Exactly one of `operator_id` or `dep_key`
    #[serde(flatten)]
    pub target: &'a ForwardTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_chat_reads_nested_chat_id() {
        let event = parse_update(json!({"event": "new_chat", "chat": {"id": "c1"}})).unwrap();

        assert_eq!(event, InboundEvent::NewChat { chat_id: "c1".into() });
    }

    #[test]
    fn new_message_keyboard_response() {
        let event = parse_update(json!({
            "event": "new_message",
            "chat_id": "c1",
            "message": {
                "kind": "keyboard_response",
                "data": {"button": {"id": "close_chat", "text": "Close chat"}},
            },
        }))
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::NewMessage {
                chat_id: "c1".into(),
                message: InboundMessage::KeyboardResponse {
                    button_id: ButtonId::CloseChat,
                },
            }
        );
    }

    #[test]
    fn numeric_chat_id_is_preserved() {
        let event = parse_update(json!({
            "event": "new_message",
            "chat_id": 42,
            "message": {"kind": "visitor", "text": "hello"},
        }))
        .unwrap();

        assert_eq!(event.chat_id(), Some(&ChatId::from(42)));
    }

    #[test]
    fn out_of_range_and_fractional_chat_ids_are_echoed_unchanged() {
        for id in [json!(18_446_744_073_709_551_615_u64), json!(1.5)] {
            let event = parse_update(json!({
                "event": "new_message",
                "chat_id": id,
                "message": {"kind": "visitor", "text": "hello"},
            }))
            .unwrap();

            let echoed = serde_json::to_value(event.chat_id().unwrap()).unwrap();
            assert_eq!(echoed, id);
        }
    }

    #[test]
    fn file_visitor_keeps_file_data() {
        let event = parse_update(json!({
            "event": "new_message",
            "chat_id": "c1",
            "message": {"kind": "file_visitor", "data": {"name": "cat.png"}},
        }))
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::NewMessage {
                chat_id: "c1".into(),
                message: InboundMessage::FileVisitor {
                    file: Some(json!({"name": "cat.png"})),
                },
            }
        );
    }

    #[test]
    fn other_event_keeps_chat_id() {
        let event = parse_update(json!({"event": "chat_closed", "chat_id": "c1"})).unwrap();

        assert_eq!(
            event,
            InboundEvent::Other {
                event: "chat_closed".to_string(),
                chat_id: Some("c1".into()),
            }
        );
    }

    #[test]
    fn keyboard_response_without_button_is_rejected() {
        let err = parse_update(json!({
            "event": "new_message",
            "chat_id": "c1",
            "message": {"kind": "keyboard_response", "data": {}},
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            ProtocolError::MissingField("message.data.button.id")
        ));
    }

    #[test]
    fn new_message_without_message_is_rejected() {
        let err = parse_update(json!({"event": "new_message", "chat_id": "c1"})).unwrap_err();

        assert!(matches!(err, ProtocolError::MissingField("message")));
    }

    #[test]
    fn redirect_request_flattens_target() {
        let chat_id = ChatId::from("c1");
        let agent = ForwardTarget::Agent { operator_id: 7 };
        let department = ForwardTarget::Department {
            dep_key: "sales".to_string(),
        };

        assert_eq!(
            serde_json::to_value(RedirectChatRequest {
                chat_id: &chat_id,
                target: &agent,
            })
            .unwrap(),
            json!({"chat_id": "c1", "operator_id": 7})
        );
        assert_eq!(
            serde_json::to_value(RedirectChatRequest {
                chat_id: &chat_id,
                target: &department,
            })
            .unwrap(),
            json!({"chat_id": "c1", "dep_key": "sales"})
        );
    }

    #[test]
    fn ack_body() {
        assert_eq!(serde_json::to_value(Ack::ok()).unwrap(), json!({"result": "ok"}));
    }
}
