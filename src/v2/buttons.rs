//! Button ids and keyboard layout of the Bot API 2.0 dialect.

use serde::{Deserialize, Serialize, Serializer};

use crate::keyboard::{Button, Keyboard};

/// Button ids understood by the API 2.0 bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ButtonId {
    /// Greet the visitor again.
    SayHi,
    /// Say goodbye and close the chat.
    CloseChat,
    /// Send the sample image.
    SendImage,
    /// Send the sample document.
    SendDocument,
    /// Redirect the chat to the configured agent.
    ForwardToAgent,
    /// Redirect the chat to the configured department.
    ForwardToDepartment,
    /// Any other id.
    Unrecognized(String),
}

impl ButtonId {
    /// Returns the id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SayHi => "say_hi",
            Self::CloseChat => "close_chat",
            Self::SendImage => "send_image",
            Self::SendDocument => "send_document",
            Self::ForwardToAgent => "forward_to_agent",
            Self::ForwardToDepartment => "forward_to_department",
            Self::Unrecognized(id) => id,
        }
    }
}

impl From<String> for ButtonId {
    fn from(id: String) -> Self {
        match id.as_str() {
            "say_hi" => Self::SayHi,
            "close_chat" => Self::CloseChat,
            "send_image" => Self::SendImage,
            "send_document" => Self::SendDocument,
            "forward_to_agent" => Self::ForwardToAgent,
            "forward_to_department" => Self::ForwardToDepartment,
            _ => Self::Unrecognized(id),
        }
    }
}

impl Serialize for ButtonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Builds the API 2.0 keyboard.
///
/// The two default rows are always present. A single forward row follows
/// when at least one forward target is enabled, agent button first.
#[must_use]
pub fn build_keyboard(forward_to_agent: bool, forward_to_department: bool) -> Keyboard<ButtonId> {
    let mut forward_row = Vec::new();
    if forward_to_agent {
        forward_row.push(Button::new(ButtonId::ForwardToAgent, "Forward to agent"));
    }
    if forward_to_department {
        forward_row.push(Button::new(
            ButtonId::ForwardToDepartment,
            "Forward to department",
        ));
    }

    Keyboard::new(vec![
        vec![
            Button::new(ButtonId::SayHi, "Say hi"),
            Button::new(ButtonId::CloseChat, "Close chat"),
        ],
        vec![
            Button::new(ButtonId::SendImage, "Send image"),
            Button::new(ButtonId::SendDocument, "Send document"),
        ],
    ])
    .with_row(forward_row)
}
