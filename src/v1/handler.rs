//! Bot API 1.0 handler.
//!
//! API 1.0 is the legacy dialect: the reply to the webhook request *is* the
//! bot's answer, so the handler is a pure function of the inbound event and
//! never calls the vendor API.

use serde::Serialize;

use super::buttons::{DEFAULT_CUSTOM_BUTTON_TEXT, default_keyboard};
use super::{ButtonId, wire};
use crate::event::{InboundEvent, InboundMessage, ProtocolError};
use crate::json::pretty_json;
use crate::keyboard::{Button, Keyboard};
use crate::message::OutboundMessage;

/// Fixed answers of the API 1.0 bot.
pub mod text {
    /// Reply to a new chat and to "Say hi".
    pub const GREETING: &str = "Hi! I am External API 1.0 sample bot. What should I do?";
    /// Reply to "Say bye".
    pub const FAREWELL: &str = "Bye! In case you come back, here is what I can do:";
    /// Reply to anything the bot cannot handle.
    pub const UNEXPECTED_UPDATE: &str = "Oops, I couldn't understand you. Here is what I can do:";
    /// Reply to free text from the visitor.
    pub const DO_NOT_UNDERSTAND: &str =
        "I don't understand natural languages yet... But you can use my buttons:";
    /// Reply to the custom button when no response is configured.
    pub const DEFAULT_CUSTOM_BUTTON_RESPONSE: &str =
        "Wow, you clicked my custom button. What should I do next?";
}

/// Optional extra button appended to the API 1.0 keyboard.
///
/// The button is shown when either field is set; the other falls back
/// to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomButton {
    /// Button caption
    pub text: Option<String>,
    /// Text sent when the button is pressed
    pub response: Option<String>,
}

impl CustomButton {
    /// Returns true if neither the caption nor the response is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.response.is_none()
    }
}

/// Reply body of an API 1.0 webhook.
///
/// `messages` is omitted entirely when `has_answer` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply<'a> {
    /// Whether the bot answers at all
    pub has_answer: bool,
    /// Operator text followed by the keyboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<[OutboundMessage<'a, ButtonId>; 2]>,
}

impl Reply<'_> {
    /// The reply that passes the chat to the agent queue.
    #[must_use]
    pub const fn no_answer() -> Self {
        Self {
            has_answer: false,
            messages: None,
        }
    }
}

/// The API 1.0 bot.
#[derive(Debug, Clone)]
pub struct ApiV1Bot {
    keyboard: Keyboard<ButtonId>,
    custom_response: String,
}

impl Default for ApiV1Bot {
    fn default() -> Self {
        Self::new(&CustomButton::default())
    }
}

impl ApiV1Bot {
    /// Creates the bot, appending the custom button row if configured.
    #[must_use]
    pub fn new(custom: &CustomButton) -> Self {
        let mut keyboard = default_keyboard();

        if !custom.is_empty() {
            let caption = custom
                .text
                .clone()
                .unwrap_or_else(|| DEFAULT_CUSTOM_BUTTON_TEXT.to_string());
            keyboard = keyboard.with_row(vec![Button::new(ButtonId::Custom, caption)]);
        }

        Self {
            keyboard,
            custom_response: custom
                .response
                .clone()
                .unwrap_or_else(|| text::DEFAULT_CUSTOM_BUTTON_RESPONSE.to_string()),
        }
    }

    /// Returns the keyboard sent with every answer.
    #[must_use]
    pub const fn keyboard(&self) -> &Keyboard<ButtonId> {
        &self.keyboard
    }

    /// Handles a raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the body is not a valid API 1.0 update.
    pub fn webhook(&self, body: &[u8]) -> Result<Reply<'_>, ProtocolError> {
        let update: serde_json::Value = serde_json::from_slice(body)?;
        tracing::debug!("API v1 received update:\n{}", pretty_json(&update));

        let event = wire::parse_update(update)?;
        let reply = self.handle(&event);

        tracing::debug!("API v1 sending response:\n{}", pretty_json(&reply));
        Ok(reply)
    }

    /// Computes the reply to an event.
    #[must_use]
    pub fn handle(&self, event: &InboundEvent<ButtonId>) -> Reply<'_> {
        match event {
            InboundEvent::NewChat { chat_id } => {
                tracing::info!("New chat {chat_id}");
                self.text_and_keyboard(text::GREETING)
            }
            InboundEvent::NewMessage { chat_id, message } => {
                tracing::info!("New message in chat {chat_id}");
                self.handle_message(message)
            }
            InboundEvent::Other { event, .. } => {
                tracing::warn!("Unsupported event {event:?}");
                self.text_and_keyboard(text::UNEXPECTED_UPDATE)
            }
        }
    }

    fn handle_message(&self, message: &InboundMessage<ButtonId>) -> Reply<'_> {
        match message {
            InboundMessage::KeyboardResponse { button_id } => self.handle_button(button_id),
            InboundMessage::Visitor { .. } => self.text_and_keyboard(text::DO_NOT_UNDERSTAND),
            InboundMessage::FileVisitor { .. } => {
                tracing::warn!("Unsupported message kind \"file_visitor\"");
                self.text_and_keyboard(text::UNEXPECTED_UPDATE)
            }
            InboundMessage::Unknown { kind } => {
                tracing::warn!("Unsupported message kind {kind:?}");
                self.text_and_keyboard(text::UNEXPECTED_UPDATE)
            }
        }
    }

    fn handle_button(&self, button_id: &ButtonId) -> Reply<'_> {
        match button_id {
            ButtonId::SayHi => self.text_and_keyboard(text::GREETING),
            ButtonId::SayBye => self.text_and_keyboard(text::FAREWELL),
            ButtonId::ForwardToQueue => Reply::no_answer(),
            ButtonId::Custom => self.text_and_keyboard(&self.custom_response),
            ButtonId::Unrecognized(id) => {
                tracing::warn!("Unexpected button id {id:?}");
                self.text_and_keyboard(text::UNEXPECTED_UPDATE)
            }
        }
    }

    fn text_and_keyboard<'a>(&'a self, text: &'a str) -> Reply<'a> {
        Reply {
            has_answer: true,
            messages: Some([
                OutboundMessage::Operator { text },
                OutboundMessage::Keyboard {
                    buttons: &self.keyboard,
                },
            ]),
        }
    }
}
