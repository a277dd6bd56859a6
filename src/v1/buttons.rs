//! Button ids and the default layout of the Bot API 1.0 dialect.

use serde::{Deserialize, Serialize, Serializer};

use crate::keyboard::{Button, Keyboard};

/// Button ids understood by the API 1.0 bot.
///
/// Ids the bot does not know are kept verbatim in [`ButtonId::Unrecognized`]
/// so parsing never fails on them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ButtonId {
    /// Greet the visitor again.
    SayHi,
    /// Say goodbye.
    SayBye,
    /// Hand the chat to the live agent queue.
    ForwardToQueue,
    /// Optional button with configurable text and response.
    Custom,
    /// Any other id.
    Unrecognized(String),
}

impl ButtonId {
    /// Returns the id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SayHi => "say_hi",
            Self::SayBye => "say_bye",
            Self::ForwardToQueue => "forward_to_queue",
            Self::Custom => "custom",
            Self::Unrecognized(id) => id,
        }
    }
}

impl From<String> for ButtonId {
    fn from(id: String) -> Self {
        match id.as_str() {
            "say_hi" => Self::SayHi,
            "say_bye" => Self::SayBye,
            "forward_to_queue" => Self::ForwardToQueue,
            "custom" => Self::Custom,
            _ => Self::Unrecognized(id),
        }
    }
}

impl Serialize for ButtonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Caption of the custom button when only its response is configured.
pub const DEFAULT_CUSTOM_BUTTON_TEXT: &str = "Custom button";

/// Returns the two default rows: greeting/farewell, then the queue button.
#[must_use]
pub fn default_keyboard() -> Keyboard<ButtonId> {
    Keyboard::new(vec![
        vec![
            Button::new(ButtonId::SayHi, "Say hi"),
            Button::new(ButtonId::SayBye, "Say bye"),
        ],
        vec![Button::new(ButtonId::ForwardToQueue, "Forward to queue")],
    ])
}
